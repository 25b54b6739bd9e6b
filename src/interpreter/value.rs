//! Runtime value representation
//!
//! This module defines the [`Value`] enum, the four kinds of value a script can
//! produce: numbers, strings, booleans and `chintan` (null).
//!
//! # Conversions
//!
//! Values convert between kinds the way a browser console would show them:
//! - [`Value::to_number`]: booleans become 1/0, null becomes 0, strings are
//!   parsed after trimming (empty is 0, anything unparsable is NaN)
//! - [`Value::is_truthy`]: `false`, `0`, `NaN`, `""` and null are falsy
//! - `Display`: integral numbers print without a fraction, see [`format_number`]

use crate::parser::ast::Literal;
use std::cmp::Ordering;
use std::fmt;

/// Runtime values in the sandbox
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    #[default]
    Null,
}

impl Value {
    pub fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Number(n) => Value::Number(*n),
            Literal::Str(s) => Value::Str(s.clone()),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Null => Value::Null,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Bool(b) => *b,
            Value::Null => false,
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Value::Number(n) => *n,
            Value::Str(s) => parse_numeric(s),
            Value::Bool(true) => 1.0,
            Value::Bool(false) | Value::Null => 0.0,
        }
    }

    /// `==`: same-kind values compare directly, null only equals null,
    /// everything else compares numerically.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            _ => self.to_number() == other.to_number(),
        }
    }

    /// `===`: kinds must match
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }

    /// Ordering for `<`, `>`, `<=`, `>=`. Two strings compare by characters,
    /// anything else numerically; `None` when either side is NaN.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            _ => self.to_number().partial_cmp(&other.to_number()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => f.write_str("null"),
        }
    }
}

/// Render a number the way the log shows it: `5` not `5.0`, `NaN`,
/// `Infinity`, exponent form outside `[1e-6, 1e21)`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // covers -0
        return "0".to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{}", n);
    }

    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

fn parse_numeric(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    // f64::from_str also accepts "inf" and "nan"; those are not numbers here.
    let numeric_chars = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !numeric_chars {
        return f64::NAN;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(10.5), "10.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(123456789012.0), "123456789012");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Str("hi".to_string()).to_string(), "hi");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(Value::Str("0".to_string()).is_truthy());
        assert!(Value::Number(-1.0).is_truthy());
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(Value::Str(" 42 ".to_string()).to_number(), 42.0);
        assert_eq!(Value::Str("".to_string()).to_number(), 0.0);
        assert_eq!(Value::Str("0x10".to_string()).to_number(), 16.0);
        assert!(Value::Str("abc".to_string()).to_number().is_nan());
        assert!(Value::Str("inf".to_string()).to_number().is_nan());
        assert_eq!(Value::Str("-Infinity".to_string()).to_number(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_equality() {
        let five = Value::Number(5.0);
        let five_str = Value::Str("5".to_string());
        assert!(five.loose_eq(&five_str));
        assert!(!five.strict_eq(&five_str));
        assert!(Value::Bool(true).loose_eq(&Value::Number(1.0)));
        assert!(!Value::Null.loose_eq(&Value::Number(0.0)));
        assert!(Value::Null.loose_eq(&Value::Null));
        assert!(!Value::Number(f64::NAN).loose_eq(&Value::Number(f64::NAN)));
    }

    #[test]
    fn test_compare() {
        let a = Value::Str("apple".to_string());
        let b = Value::Str("banana".to_string());
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(
            Value::Str("10".to_string()).compare(&Value::Number(9.0)),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::Number(f64::NAN).compare(&Value::Number(1.0)), None);
    }
}
