//! Runtime fault types for the script sandbox
//!
//! This module defines [`RuntimeFault`], which represents every failure that can
//! occur while a [`Script`](crate::translator::Script) runs (as opposed to lex or
//! parse errors, which stop a program before it starts).
//!
//! Whether a fault is recovered depends on where it happens, not on its kind:
//! inside a capture call it becomes an `Error: <message>` log line, anywhere
//! else it ends the run with a final `Execution Error: <class>: <message>` line.

use thiserror::Error;

/// Runtime faults that can occur during execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeFault {
    /// Read or assignment of a name with no binding in any enclosing scope
    #[error("{name} is not defined")]
    UndefinedVariable { name: String },

    /// Second declaration of a name in the same scope
    #[error("Identifier '{name}' has already been declared")]
    Redeclaration { name: String },

    /// Assignment to a `nishchit_kar` binding
    #[error("Assignment to constant variable.")]
    ConstAssignment { name: String },

    /// A loop guard went past its ceiling
    #[error("Loop iteration limit exceeded: more than {limit} iterations")]
    IterationLimit { guard: String, limit: usize },
}

impl RuntimeFault {
    /// Error class shown in front of a fatal fault, e.g. `ReferenceError`
    pub fn class(&self) -> &'static str {
        match self {
            RuntimeFault::UndefinedVariable { .. } => "ReferenceError",
            RuntimeFault::Redeclaration { .. } => "SyntaxError",
            RuntimeFault::ConstAssignment { .. } => "TypeError",
            RuntimeFault::IterationLimit { .. } => "Error",
        }
    }
}
