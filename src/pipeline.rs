//! Compile and run entry points
//!
//! ```text
//! source ─ tokenize ─▶ tokens ─ parse ─▶ Program ─ translate ─▶ Script ─ execute ─▶ log
//! ```
//!
//! Every call builds its own lexer, parser, translator and sandbox. No state
//! is shared between calls, so these functions can be used from any number
//! of threads at once.

use crate::interpreter::Sandbox;
use crate::parser::lexer::{tokenize, LexError};
use crate::parser::parse::{parse, ParseError};
use crate::translator::{translate, Script};
use log::debug;
use thiserror::Error;

/// Failure to turn source text into a [`Script`]. Displays as the one-line
/// diagnostics text a caller shows in place of a log.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("Tokenization Error: {0} ({ctx})", ctx = .0.context)]
    Lex(#[from] LexError),

    #[error("Parse Error: {0} ({ctx})", ctx = .0.context)]
    Parse(#[from] ParseError),
}

impl CompileError {
    /// The diagnostics line
    pub fn diagnostics(&self) -> String {
        self.to_string()
    }

    /// The error's kind tag, e.g. `UNTERMINATED_STRING` or `MISSING_END_KEYWORD`
    pub fn tag(&self) -> String {
        match self {
            CompileError::Lex(e) => e.kind.to_string(),
            CompileError::Parse(e) => e.kind.to_string(),
        }
    }
}

/// Tokenize, parse and translate `source`.
pub fn compile(source: &str) -> Result<Script, CompileError> {
    let tokens = tokenize(source)?;
    debug!("tokenized {} chars into {} tokens", source.chars().count(), tokens.len());

    let program = parse(tokens)?;
    debug!("parsed {} top-level statements", program.body.len());

    let script = translate(&program)?;
    debug!("translated script with {} loop guards", script.guard_names().len());

    Ok(script)
}

/// Run a compiled script and return its newline-joined log.
pub fn execute(script: &Script) -> String {
    Sandbox::execute(script)
}

/// Compile and execute. A compile failure returns the diagnostics line as the log.
pub fn run(source: &str) -> String {
    match compile(source) {
        Ok(script) => execute(&script),
        Err(err) => {
            debug!("compile failed: {}", err.tag());
            err.diagnostics()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_program() {
        let output = run("arambha systummm ghoshit_kar a = 10; prakashit_kar(a * 2); bihari_sramik");
        assert_eq!(output, "20");
    }

    #[test]
    fn test_lex_diagnostics() {
        let err = compile("arambha systummm ghoshit_kar a = 10.5.2; bihari_sramik").unwrap_err();
        assert_eq!(err.tag(), "INVALID_NUMBER_FORMAT");
        let line = err.diagnostics();
        assert!(line.starts_with("Tokenization Error: "));
        assert!(line.contains("line 1"));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_parse_diagnostics() {
        let output = run("arambha systummm prakashit_kar(1);");
        assert!(output.starts_with("Parse Error: Program must end with 'bihari_sramik' keyword ("));
        assert!(output.ends_with(')'));
    }

    #[test]
    fn test_translation_error_is_parse_error() {
        let err = compile("arambha systummm viram; bihari_sramik").unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
        assert_eq!(err.tag(), "WRONG_SYNTAX");
    }

    #[test]
    fn test_execute_twice_is_identical() {
        let script = compile("arambha systummm yatha (satya) { } bihari_sramik").unwrap();
        assert_eq!(execute(&script), execute(&script));
    }
}
