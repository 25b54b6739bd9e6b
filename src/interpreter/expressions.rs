//! Expression evaluation
//!
//! Adds `impl Sandbox` methods that reduce an [`Expr`] to a [`Value`].
//! `&&` and `||` short-circuit and yield the operand that decided the result;
//! every other binary operator evaluates both sides, left first.

use crate::interpreter::engine::Sandbox;
use crate::interpreter::errors::RuntimeFault;
use crate::interpreter::value::Value;
use crate::parser::ast::{BinOp, Expr, UnOp, UpdateOp};
use std::cmp::Ordering;

impl Sandbox {
    pub(crate) fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeFault> {
        match expr {
            Expr::Literal(literal) => Ok(Value::from_literal(literal)),

            Expr::Identifier(name) => self.env.get(name).cloned(),

            Expr::Unary { op, operand } => {
                let value = self.evaluate(operand)?;
                Ok(match op {
                    UnOp::Neg => Value::Number(-value.to_number()),
                    UnOp::Plus => Value::Number(value.to_number()),
                    UnOp::Not => Value::Bool(!value.is_truthy()),
                })
            }

            Expr::Binary {
                op: BinOp::And,
                left,
                right,
            } => {
                let left = self.evaluate(left)?;
                if left.is_truthy() {
                    self.evaluate(right)
                } else {
                    Ok(left)
                }
            }

            Expr::Binary {
                op: BinOp::Or,
                left,
                right,
            } => {
                let left = self.evaluate(left)?;
                if left.is_truthy() {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Binary { op, left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                Ok(apply_binary(*op, &left, &right))
            }

            Expr::Assign { name, op, value } => {
                let rhs = self.evaluate(value)?;
                let new_value = match op {
                    Some(op) => {
                        let current = self.env.get(name)?.clone();
                        apply_binary(*op, &current, &rhs)
                    }
                    None => rhs,
                };
                self.env.assign(name, new_value.clone())?;
                Ok(new_value)
            }

            Expr::Update { name, op, prefix } => {
                let old = self.env.get(name)?.to_number();
                let new = match op {
                    UpdateOp::Increment => old + 1.0,
                    UpdateOp::Decrement => old - 1.0,
                };
                self.env.assign(name, Value::Number(new))?;
                Ok(Value::Number(if *prefix { new } else { old }))
            }
        }
    }
}

/// Evaluate a non-short-circuiting binary operator
pub(crate) fn apply_binary(op: BinOp, left: &Value, right: &Value) -> Value {
    match op {
        BinOp::Add => {
            if left.is_string() || right.is_string() {
                Value::Str(format!("{}{}", left, right))
            } else {
                Value::Number(left.to_number() + right.to_number())
            }
        }
        BinOp::Sub => Value::Number(left.to_number() - right.to_number()),
        BinOp::Mul => Value::Number(left.to_number() * right.to_number()),
        // IEEE results: a zero divisor gives Infinity, -Infinity or NaN
        BinOp::Div => Value::Number(left.to_number() / right.to_number()),
        BinOp::Mod => Value::Number(left.to_number() % right.to_number()),
        BinOp::Eq => Value::Bool(left.loose_eq(right)),
        BinOp::Ne => Value::Bool(!left.loose_eq(right)),
        BinOp::StrictEq => Value::Bool(left.strict_eq(right)),
        BinOp::StrictNe => Value::Bool(!left.strict_eq(right)),
        BinOp::Lt => Value::Bool(left.compare(right) == Some(Ordering::Less)),
        BinOp::Gt => Value::Bool(left.compare(right) == Some(Ordering::Greater)),
        BinOp::Le => Value::Bool(matches!(
            left.compare(right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        BinOp::Ge => Value::Bool(matches!(
            left.compare(right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        // Short-circuit forms are handled before both sides are evaluated.
        BinOp::And => {
            if left.is_truthy() {
                right.clone()
            } else {
                left.clone()
            }
        }
        BinOp::Or => {
            if left.is_truthy() {
                left.clone()
            } else {
                right.clone()
            }
        }
    }
}
