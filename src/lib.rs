//! # Introduction
//!
//! Vishwaguru is a small scripting language with Hindi-flavoured keywords.
//! This crate tokenizes and parses its source text, lowers the program to a
//! guarded script and runs that script in a sandbox that captures every print
//! into a log.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Parser → Program → Translator → Script → Sandbox → log
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds a [`parser::ast::Program`].
//! 2. [`translator`]: rewrites the program into a [`translator::Script`],
//!    arming every loop with its own iteration guard.
//! 3. [`interpreter`]: executes a script against a fresh scope stack and
//!    returns the captured output.
//! 4. [`pipeline`]: the `compile` / `execute` / `run` entry points.
//! 5. [`samples`]: the built-in sample gallery.
//! 6. [`ui`]: ratatui-based playground; not part of the stable library API.
//!
//! ## A first program
//!
//! ```
//! let log = vishwaguru::run("arambha systummm prakashit_kar(\"Namaste\", 1 + 1); bihari_sramik");
//! assert_eq!(log, "Namaste 2");
//! ```

pub mod interpreter;
pub mod parser;
pub mod pipeline;
pub mod samples;
pub mod translator;
pub mod ui;

pub use pipeline::{compile, execute, run, CompileError};
