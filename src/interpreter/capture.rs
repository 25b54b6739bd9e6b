//! Output capture for a single run
//!
//! [`OutputLog`] collects the lines a script produces, in order. A fresh log is
//! created for each run and returned as newline-joined text.

use crate::interpreter::errors::RuntimeFault;
use crate::interpreter::value::Value;

/// Ordered log of output lines
#[derive(Debug, Clone, Default)]
pub struct OutputLog {
    lines: Vec<String>,
}

impl OutputLog {
    pub fn new() -> Self {
        OutputLog::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Record the outcome of a capture call. The values are stringified and
    /// joined with one space. A fault is logged as `Error: <message>` and does
    /// not propagate.
    pub fn capture(&mut self, outcome: Result<Vec<Value>, RuntimeFault>) {
        match outcome {
            Ok(values) => {
                let parts: Vec<String> = values.iter().map(Value::to_string).collect();
                self.push(parts.join(" "));
            }
            Err(fault) => self.push(format!("Error: {}", fault)),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_text(self) -> String {
        self.lines.join("\n")
    }
}
