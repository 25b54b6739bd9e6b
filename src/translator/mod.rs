//! Statement tree to [`Script`] translation
//!
//! The translator walks a parsed [`Program`], parses every raw token slice
//! into an expression tree and lowers each statement:
//!
//! - declarations and assignments keep their shape
//! - `prakashit_kar(...)` becomes a [`Stmt::Capture`] over the argument list
//! - `yatha` and `prati_ghatak` become [`GuardedLoop`]s, each with a freshly
//!   named [`LoopGuard`]
//!
//! Guard names are numbered per [`Translator`], and a translator is built for
//! each compile call, so two calls never share a counter.

pub mod script;

pub use script::{GuardedLoop, LoopGuard, LoopKind, Mutability, Script, ScriptBranch, Stmt};

use crate::interpreter::constants::{GUARD_PREFIX, LOOP_ITERATION_LIMIT};
use crate::parser::ast::{Expr, Program, SourceLocation, Statement};
use crate::parser::expressions::{parse_expression, parse_expression_list};
use crate::parser::lexer::{Keyword, Operator, Token};
use crate::parser::parse::{ParseError, ParseErrorKind};
use log::trace;

/// Translate a program with a fresh translator.
pub fn translate(program: &Program) -> Result<Script, ParseError> {
    Translator::new().translate(program)
}

#[derive(Debug, Default)]
pub struct Translator {
    next_guard: usize,
    loop_depth: usize,
}

impl Translator {
    pub fn new() -> Self {
        Translator::default()
    }

    pub fn translate(mut self, program: &Program) -> Result<Script, ParseError> {
        let body = self.lower_block(&program.body)?;
        Ok(Script { body })
    }

    fn lower_block(&mut self, body: &[Statement]) -> Result<Vec<Stmt>, ParseError> {
        body.iter().map(|s| self.lower_statement(s)).collect()
    }

    fn lower_statement(&mut self, statement: &Statement) -> Result<Stmt, ParseError> {
        match statement {
            Statement::VarDecl {
                name,
                value,
                location,
            } => Ok(Stmt::Declare {
                name: name.clone(),
                mutability: Mutability::Mutable,
                init: parse_expression(value)?,
                location: *location,
            }),
            Statement::ConstDecl {
                name,
                value,
                location,
            } => Ok(Stmt::Declare {
                name: name.clone(),
                mutability: Mutability::Constant,
                init: parse_expression(value)?,
                location: *location,
            }),
            Statement::Assignment {
                name,
                value,
                location,
            } => Ok(Stmt::Assign {
                name: name.clone(),
                value: parse_expression(value)?,
                location: *location,
            }),
            Statement::Output { value, location } => Ok(Stmt::Capture {
                args: parse_expression_list(value)?,
                location: *location,
            }),
            Statement::If {
                branches,
                else_body,
                location,
            } => {
                let branches = branches
                    .iter()
                    .map(|branch| {
                        Ok(ScriptBranch {
                            condition: parse_expression(&branch.condition)?,
                            body: self.lower_block(&branch.body)?,
                        })
                    })
                    .collect::<Result<Vec<_>, ParseError>>()?;
                let otherwise = match else_body {
                    Some(body) => Some(self.lower_block(body)?),
                    None => None,
                };
                Ok(Stmt::If {
                    branches,
                    otherwise,
                    location: *location,
                })
            }
            Statement::While {
                condition,
                body,
                location,
            } => {
                let guard = self.next_guard();
                let condition = Some(parse_expression(condition)?);
                let body = self.lower_loop_body(body)?;
                Ok(Stmt::Loop(GuardedLoop {
                    kind: LoopKind::While,
                    guard,
                    init: None,
                    condition,
                    increment: None,
                    body,
                    location: *location,
                }))
            }
            Statement::For {
                init,
                condition,
                increment,
                body,
                location,
            } => {
                let guard = self.next_guard();
                let init = self.lower_for_init(init, *location)?;
                let condition = optional_expression(condition)?;
                let increment = optional_expression(increment)?;
                let body = self.lower_loop_body(body)?;
                Ok(Stmt::Loop(GuardedLoop {
                    kind: LoopKind::For,
                    guard,
                    init,
                    condition,
                    increment,
                    body,
                    location: *location,
                }))
            }
            Statement::Break { location } => self.loop_control(Keyword::Break, *location, Stmt::Break),
            Statement::Continue { location } => {
                self.loop_control(Keyword::Continue, *location, Stmt::Continue)
            }
        }
    }

    fn lower_loop_body(&mut self, body: &[Statement]) -> Result<Vec<Stmt>, ParseError> {
        self.loop_depth += 1;
        let lowered = self.lower_block(body);
        self.loop_depth -= 1;
        lowered
    }

    fn loop_control(
        &self,
        keyword: Keyword,
        location: SourceLocation,
        stmt: Stmt,
    ) -> Result<Stmt, ParseError> {
        if self.loop_depth == 0 {
            return Err(ParseError::new(
                ParseErrorKind::WrongSyntax,
                format!("Invalid syntax for '{}'", keyword.lexeme()),
                format!("'{}' can only be used inside a loop body", keyword.lexeme()),
            )
            .at(location));
        }
        Ok(stmt)
    }

    /// `ghoshit_kar i = 0`, `nishchit_kar i = 0`, a plain expression, or nothing
    fn lower_for_init(
        &self,
        init: &[Token],
        location: SourceLocation,
    ) -> Result<Option<Box<Stmt>>, ParseError> {
        let Some(first) = init.first() else {
            return Ok(None);
        };

        let mutability = if first.is_keyword(Keyword::Let) {
            Mutability::Mutable
        } else if first.is_keyword(Keyword::Const) {
            Mutability::Constant
        } else {
            return Ok(Some(Box::new(Stmt::Eval {
                expr: parse_expression(init)?,
                location: first.location,
            })));
        };

        let name = init.get(1).and_then(|t| t.identifier()).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::MissingIdentifier,
                "Expected an identifier in 'prati_ghatak' initializer",
                "Identifier expected for variable declaration",
            )
            .at(first.location)
        })?;

        if !init.get(2).is_some_and(|t| t.is_operator(Operator::Assign)) || init.len() < 4 {
            return Err(ParseError::new(
                ParseErrorKind::MissingValue,
                format!("Expected value after '=' in declaration of '{}'", name),
                "The 'prati_ghatak' initializer must be written as 'ghoshit_kar name = value'",
            )
            .at(location));
        }

        Ok(Some(Box::new(Stmt::Declare {
            name: name.to_string(),
            mutability,
            init: parse_expression(&init[3..])?,
            location: first.location,
        })))
    }

    fn next_guard(&mut self) -> LoopGuard {
        let name = format!("{}{}", GUARD_PREFIX, self.next_guard);
        self.next_guard += 1;
        trace!("created loop guard {} (limit {})", name, LOOP_ITERATION_LIMIT);
        LoopGuard {
            name,
            limit: LOOP_ITERATION_LIMIT,
        }
    }
}

fn optional_expression(tokens: &[Token]) -> Result<Option<Expr>, ParseError> {
    if tokens.is_empty() {
        return Ok(None);
    }
    parse_expression(tokens).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{BinOp, Literal};
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::parse;

    fn translate_body(body: &str) -> Result<Script, ParseError> {
        let source = format!("arambha systummm\n{}\nbihari_sramik", body);
        translate(&parse(tokenize(&source).unwrap()).unwrap())
    }

    #[test]
    fn test_declaration_lowering() {
        let script = translate_body("nishchit_kar x = 1 + 2;").unwrap();
        assert_eq!(
            script.body[0],
            Stmt::Declare {
                name: "x".to_string(),
                mutability: Mutability::Constant,
                init: Expr::Binary {
                    op: BinOp::Add,
                    left: Box::new(Expr::Literal(Literal::Number(1.0))),
                    right: Box::new(Expr::Literal(Literal::Number(2.0))),
                },
                location: SourceLocation::new(17, 2, 1),
            }
        );
    }

    #[test]
    fn test_print_becomes_capture_list() {
        let script = translate_body("prakashit_kar(\"a\", 1, satya);").unwrap();
        match &script.body[0] {
            Stmt::Capture { args, .. } => assert_eq!(args.len(), 3),
            other => panic!("Expected Capture, got {:?}", other),
        }
    }

    #[test]
    fn test_guard_names_are_sequential_per_translation() {
        let body = "yatha (satya) { prati_ghatak (;;) { viram; } viram; } yatha (asatya) { }";
        let script = translate_body(body).unwrap();
        assert_eq!(
            script.guard_names(),
            vec!["__loop_guard_0", "__loop_guard_1", "__loop_guard_2"]
        );

        // A second translation starts again from zero.
        let again = translate_body(body).unwrap();
        assert_eq!(again.guard_names()[0], "__loop_guard_0");
    }

    #[test]
    fn test_guard_limit() {
        let script = translate_body("yatha (satya) { }").unwrap();
        match &script.body[0] {
            Stmt::Loop(lp) => assert_eq!(lp.guard.limit, 10_000),
            other => panic!("Expected Loop, got {:?}", other),
        }
    }

    #[test]
    fn test_for_header_parts() {
        let script = translate_body("prati_ghatak (ghoshit_kar i = 0; i < 3; i++) { }").unwrap();
        match &script.body[0] {
            Stmt::Loop(lp) => {
                assert_eq!(lp.kind, LoopKind::For);
                assert!(matches!(
                    lp.init.as_deref(),
                    Some(Stmt::Declare { name, mutability: Mutability::Mutable, .. }) if name == "i"
                ));
                assert!(lp.condition.is_some());
                assert!(matches!(lp.increment, Some(Expr::Update { .. })));
            }
            other => panic!("Expected Loop, got {:?}", other),
        }

        let script = translate_body("prati_ghatak (;;) { viram; }").unwrap();
        match &script.body[0] {
            Stmt::Loop(lp) => {
                assert!(lp.init.is_none());
                assert!(lp.condition.is_none());
                assert!(lp.increment.is_none());
            }
            other => panic!("Expected Loop, got {:?}", other),
        }
    }

    #[test]
    fn test_for_init_expression() {
        let script = translate_body("ghoshit_kar i = 9; prati_ghatak (i = 0; i < 3; i += 1) { }").unwrap();
        match &script.body[1] {
            Stmt::Loop(lp) => assert!(matches!(lp.init.as_deref(), Some(Stmt::Eval { .. }))),
            other => panic!("Expected Loop, got {:?}", other),
        }
    }

    #[test]
    fn test_for_init_declaration_without_value() {
        let err = translate_body("prati_ghatak (ghoshit_kar i; i < 3; i++) { }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingValue);
    }

    #[test]
    fn test_loop_control_outside_loop() {
        let err = translate_body("viram;").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::WrongSyntax);
        let err = translate_body("yadi (satya) { agla_ghaatak; }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::WrongSyntax);
        assert!(err.context.contains("loop"));
    }

    #[test]
    fn test_loop_control_inside_nested_if() {
        assert!(translate_body("yatha (satya) { yadi (satya) { viram; } }").is_ok());
    }

    #[test]
    fn test_invalid_expression_in_condition() {
        let err = translate_body("yadi (a +) { }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidExpression);
    }

    #[test]
    fn test_listing_shows_capture_and_guard() {
        let script = translate_body(
            "ghoshit_kar i = 0; yatha (i < 2) { prakashit_kar(\"i\", i); i = i + 1; }",
        )
        .unwrap();
        let listing = script.to_string();
        let expected = "\
let i = 0;
let __loop_guard_0 = 0;
while ((i < 2)) {
  if (++__loop_guard_0 > 10000) throw new Error(\"Loop iteration limit exceeded: more than 10000 iterations\");
  __capture(() => [\"i\", i]);
  i = (i + 1);
}
";
        assert_eq!(listing, expected);
    }

    #[test]
    fn test_listing_if_chain() {
        let script = translate_body(
            "yadi (na x) { prakashit_kar(1); } anyatha_yadi (x == chintan) { prakashit_kar(2.5); } anyatha { prakashit_kar(satya); }",
        )
        .unwrap();
        let expected = "\
if (!x) {
  __capture(() => [1]);
} else if ((x == null)) {
  __capture(() => [2.5]);
} else {
  __capture(() => [true]);
}
";
        assert_eq!(script.to_string(), expected);
    }
}
