//! Script source parser
//!
//! This module turns source text into a statement tree:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser struct, error types and the program skeleton
//! - `statements`: statement dispatch, blocks and conditions
//! - [`expressions`]: expression trees built from raw token slices
//! - [`ast`]: statement and expression node definitions
//!
//! # Language shape
//!
//! A program is framed by `arambha systummm` and `bihari_sramik`. Statements
//! are declarations (`ghoshit_kar`, `nishchit_kar`), assignments, output
//! (`prakashit_kar`), `yadi`/`anyatha_yadi`/`anyatha` chains, `yatha` and
//! `prati_ghatak` loops, and `viram`/`agla_ghaatak`.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent. Values and conditions are stored as raw
//! token slices in the statement tree; the translator parses them into
//! [`ast::Expr`] trees with [`expressions::parse_expression`].

pub mod ast;
pub mod expressions;
pub mod lexer;
pub mod parse;
mod statements;
