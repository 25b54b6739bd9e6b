//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the program-skeleton check.
//!
//! # Parser Architecture
//!
//! - This module: Parser struct, token queue helpers, `arambha systummm ...
//!   bihari_sramik` framing
//! - `statements`: statement dispatch, blocks, conditions, loops
//! - `expressions`: precedence climbing over token slices (used by the
//!   translator)
//!
//! Tokens live in a queue that is consumed from the front and never re-read.
//! The first error aborts the whole parse; no partial tree is returned.

use crate::parser::ast::*;
use crate::parser::lexer::{Keyword, Operator, Symbol, Token};
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// Tag identifying the class of a syntax failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnexpectedEndOfInput,
    UnexpectedToken,
    MissingIdentifier,
    MissingValue,
    EmptyPrint,
    MissingRightParen,
    MissingClosingBrace,
    MissingEndKeyword,
    MultipleDeclarations,
    WrongSyntax,
    ConditionError,
    SyntaxError,
    InvalidExpression,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ParseErrorKind::UnexpectedEndOfInput => "UNEXPECTED_END_OF_INPUT",
            ParseErrorKind::UnexpectedToken => "UNEXPECTED_TOKEN",
            ParseErrorKind::MissingIdentifier => "MISSING_IDENTIFIER",
            ParseErrorKind::MissingValue => "MISSING_VALUE",
            ParseErrorKind::EmptyPrint => "EMPTY_PRINT",
            ParseErrorKind::MissingRightParen => "MISSING_RIGHT_PAREN",
            ParseErrorKind::MissingClosingBrace => "MISSING_CLOSING_BRACE",
            ParseErrorKind::MissingEndKeyword => "MISSING_END_KEYWORD",
            ParseErrorKind::MultipleDeclarations => "MULTIPLE_DECLARATIONS",
            ParseErrorKind::WrongSyntax => "WRONG_SYNTAX",
            ParseErrorKind::ConditionError => "ConditionError",
            ParseErrorKind::SyntaxError => "SyntaxError",
            ParseErrorKind::InvalidExpression => "INVALID_EXPRESSION",
        };
        f.write_str(tag)
    }
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub context: String,
    pub location: Option<SourceLocation>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, context: impl Into<String>) -> Self {
        ParseError {
            kind,
            message: message.into(),
            context: context.into(),
            location: None,
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }
}

/// Parse a token sequence into a [`Program`].
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}

/// Recursive descent parser over a destructively consumed token queue
pub struct Parser {
    pub(crate) tokens: VecDeque<Token>,
    pub(crate) last_location: SourceLocation,
    /// Number of blocks currently open
    pub(crate) depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
            last_location: SourceLocation::default(),
            depth: 0,
        }
    }

    /// Parse the whole program, consuming the parser.
    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        self.expect_keyword(Keyword::Start)
            .map_err(|e| e.with_context("Program must start with 'arambha' keyword"))?;
        self.expect_keyword(Keyword::Main)
            .map_err(|e| e.with_context("Program must have 'systummm' keyword after 'arambha'"))?;

        match self.tokens.back() {
            None => {
                return Err(ParseError::new(
                    ParseErrorKind::MissingEndKeyword,
                    "Program must end with 'bihari_sramik' keyword",
                    "Every program must be properly terminated with 'bihari_sramik'",
                )
                .at(self.last_location));
            }
            Some(last) if !last.is_keyword(Keyword::End) => {
                return Err(ParseError::new(
                    ParseErrorKind::MissingEndKeyword,
                    "Program must end with 'bihari_sramik' keyword",
                    format!("Program ends with {} instead of 'bihari_sramik'", last),
                )
                .at(last.location));
            }
            Some(_) => {}
        }

        // The end keyword is checked and dropped before any statement is
        // parsed, so statement dispatch never sees it.
        self.tokens.pop_back();

        let mut program = Program::new();
        while !self.is_at_end() {
            if let Some(statement) = self.parse_statement()? {
                program.body.push(statement);
            }
        }

        Ok(program)
    }

    // ===== Helper methods =====

    pub(crate) fn is_at_end(&self) -> bool {
        self.tokens.is_empty()
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.front()
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(n)
    }

    pub(crate) fn consume(&mut self) -> Option<Token> {
        let token = self.tokens.pop_front()?;
        self.last_location = token.location;
        Some(token)
    }

    pub(crate) fn check_symbol(&self, symbol: Symbol) -> bool {
        self.peek().is_some_and(|t| t.is_symbol(symbol))
    }

    pub(crate) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(keyword))
    }

    /// Consume the front token if `matches` accepts it; otherwise report
    /// what was expected without consuming anything.
    fn expect_with(
        &mut self,
        description: &str,
        matches: impl Fn(&Token) -> bool,
    ) -> Result<Token, ParseError> {
        let Some(token) = self.peek() else {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedEndOfInput,
                format!("Expected {} but reached end of input", description),
                format!("Parser was expecting {}", description),
            )
            .at(self.last_location));
        };

        if !matches(token) {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedToken,
                format!("Expected {}, found {}", description, token),
                format!("Expected {} but found '{}' instead", description, token.lexeme()),
            )
            .at(token.location));
        }

        self.consume().ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::UnexpectedEndOfInput,
                format!("Expected {} but reached end of input", description),
                format!("Parser was expecting {}", description),
            )
        })
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token, ParseError> {
        self.expect_with(&format!("keyword '{}'", keyword.lexeme()), |t| t.is_keyword(keyword))
    }

    pub(crate) fn expect_symbol(&mut self, symbol: Symbol) -> Result<Token, ParseError> {
        self.expect_with(&format!("symbol '{}'", symbol.as_char()), |t| t.is_symbol(symbol))
    }

    pub(crate) fn expect_operator(&mut self, op: Operator) -> Result<Token, ParseError> {
        self.expect_with(&format!("operator '{}'", op.lexeme()), |t| t.is_operator(op))
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Some(name) = self.peek().and_then(|t| t.identifier()).map(str::to_string) {
            self.consume();
            return Ok(name);
        }

        let (found, location) = match self.peek() {
            Some(token) => (format!(", found {}", token), token.location),
            None => (String::new(), self.last_location),
        };
        Err(ParseError::new(
            ParseErrorKind::MissingIdentifier,
            format!("Expected an identifier{}", found),
            "Identifier expected for variable declaration",
        )
        .at(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn parse_source(source: &str) -> Result<Program, ParseError> {
        parse(tokenize(source).unwrap())
    }

    #[test]
    fn test_parse_empty_program() {
        let program = parse_source("arambha systummm bihari_sramik").unwrap();
        assert!(program.body.is_empty());
    }

    #[test]
    fn test_missing_end_keyword() {
        let err = parse_source("arambha systummm ghoshit_kar a = 1;").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingEndKeyword);
        assert!(err.context.contains("';'"));
    }

    #[test]
    fn test_missing_end_keyword_with_nothing_after_header() {
        let err = parse_source("arambha systummm").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingEndKeyword);
    }

    #[test]
    fn test_missing_start_keyword() {
        let err = parse_source("systummm bihari_sramik").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert_eq!(err.context, "Program must start with 'arambha' keyword");
    }

    #[test]
    fn test_empty_input() {
        let err = parse_source("").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEndOfInput);
    }

    #[test]
    fn test_missing_main_keyword() {
        let err = parse_source("arambha bihari_sramik").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert!(err.context.contains("systummm"));
    }

    #[test]
    fn test_error_kind_tags() {
        assert_eq!(ParseErrorKind::MissingClosingBrace.to_string(), "MISSING_CLOSING_BRACE");
        assert_eq!(ParseErrorKind::ConditionError.to_string(), "ConditionError");
    }
}
