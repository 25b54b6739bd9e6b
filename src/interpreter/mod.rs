//! Script execution sandbox
//!
//! This module provides the tree-walking interpreter for translated scripts:
//! - [`engine`]: [`Sandbox`] and statement execution
//! - [`value`]: runtime values and their conversions
//! - [`environment`]: the lexical scope stack
//! - [`capture`]: the per-run output log and the capture contract
//! - [`errors`]: runtime fault types
//! - [`constants`]: engine limits
//!
//! # Execution Model
//!
//! The sandbox walks the lowered [`Script`](crate::translator::Script) against a
//! fresh scope stack. Printing is the only effect; it appends to the run's own
//! log. A fault inside a print is logged and execution continues, any other
//! fault ends the run. Loops are bounded by their guards, so every run
//! terminates.

pub mod capture;
pub mod constants;
pub mod engine;
pub mod environment;
pub mod errors;
mod expressions;
mod loops;
pub mod value;

pub use engine::Sandbox;
