//! Statement parsing implementation
//!
//! # Grammar
//!
//! ```text
//! statement ::= decl | assign | print | if | while | for | break | continue
//! decl      ::= (ghoshit_kar | nishchit_kar) IDENT '=' exprTokens ';'?
//! assign    ::= IDENT '=' exprTokens ';'?
//! print     ::= prakashit_kar '(' exprTokens ')'
//! if        ::= yadi '(' exprTokens ')' block
//!               (anyatha_yadi '(' exprTokens ')' block)* (anyatha block)?
//! while     ::= yatha '(' exprTokens ')' block
//! for       ::= prati_ghatak '(' exprTokens ';' exprTokens ';' exprTokens ')' block
//! block     ::= '{' statement* '}'
//! ```
//!
//! Values and conditions are kept as raw token slices. Tokens that cannot
//! start a statement (stray `;`, operators, literals) and identifiers that
//! are not followed by `=` are skipped without an error.

use crate::interpreter::constants::MAX_NESTING_DEPTH;
use crate::parser::ast::*;
use crate::parser::lexer::{Keyword, Operator, Symbol, Token, TokenKind};
use crate::parser::parse::{ParseError, ParseErrorKind, Parser};

impl Parser {
    /// Parse one statement. `Ok(None)` means the leading token was skipped.
    pub(crate) fn parse_statement(&mut self) -> Result<Option<Statement>, ParseError> {
        let Some(token) = self.peek() else {
            return Ok(None);
        };
        let location = token.location;

        match token.kind.clone() {
            TokenKind::Keyword(keyword) => match keyword {
                Keyword::Let | Keyword::Const => self.parse_declaration(keyword).map(Some),
                Keyword::Print => self.parse_print().map(Some),
                Keyword::While => self.parse_while().map(Some),
                Keyword::For => self.parse_for().map(Some),
                Keyword::If => self.parse_if().map(Some),
                Keyword::Break => {
                    self.consume();
                    Ok(Some(Statement::Break { location }))
                }
                Keyword::Continue => {
                    self.consume();
                    Ok(Some(Statement::Continue { location }))
                }
                Keyword::Start | Keyword::Main | Keyword::End => Err(ParseError::new(
                    ParseErrorKind::MultipleDeclarations,
                    format!("Multiple declarations of '{}' are not allowed", keyword.lexeme()),
                    "Only one declaration of each type is allowed in a program",
                )
                .at(location)),
                Keyword::ElseIf | Keyword::Else => Err(ParseError::new(
                    ParseErrorKind::WrongSyntax,
                    format!("Invalid syntax for '{}'", keyword.lexeme()),
                    "Cannot use 'anyatha_yadi' or 'anyatha' without a 'yadi' block",
                )
                .at(location)),
            },
            TokenKind::Identifier(_) => self.parse_assignment(),
            _ => {
                self.consume();
                Ok(None)
            }
        }
    }

    /// Parse `ghoshit_kar name = value` or `nishchit_kar name = value`
    fn parse_declaration(&mut self, keyword: Keyword) -> Result<Statement, ParseError> {
        let location = self.consume().map(|t| t.location).unwrap_or(self.last_location);
        let name = self.expect_identifier()?;

        self.expect_operator(Operator::Assign).map_err(|e| {
            e.with_context(format!(
                "Variable declaration '{}' requires '=' assignment operator",
                name
            ))
        })?;

        let value = self.expression_run();
        if value.is_empty() {
            return Err(self.missing_value(&name, "declaration"));
        }

        Ok(match keyword {
            Keyword::Const => Statement::ConstDecl {
                name,
                value,
                location,
            },
            _ => Statement::VarDecl {
                name,
                value,
                location,
            },
        })
    }

    /// Parse `name = value`. An identifier that is not followed by `=` is
    /// dropped and parsing resumes at the next token.
    fn parse_assignment(&mut self) -> Result<Option<Statement>, ParseError> {
        let assigns = self
            .peek_nth(1)
            .is_some_and(|t| t.is_operator(Operator::Assign));

        let Some(ident) = self.consume() else {
            return Ok(None);
        };
        if !assigns {
            return Ok(None);
        }
        self.consume(); // '='

        let name = ident.identifier().unwrap_or_default().to_string();
        let value = self.expression_run();
        if value.is_empty() {
            return Err(self.missing_value(&name, "assignment"));
        }

        Ok(Some(Statement::Assignment {
            name,
            value,
            location: ident.location,
        }))
    }

    /// Parse `prakashit_kar(...)`
    fn parse_print(&mut self) -> Result<Statement, ParseError> {
        let location = self.consume().map(|t| t.location).unwrap_or(self.last_location);
        self.expect_symbol(Symbol::LParen)?;

        let value = self.parenthesized_content().ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::MissingRightParen,
                "Unmatched '(' in 'prakashit_kar' arguments",
                "Ensure all opening parentheses are properly closed",
            )
            .at(location)
        })?;

        if value.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::EmptyPrint,
                "Print statement cannot be empty",
                "Provide at least one expression inside 'prakashit_kar(...)'",
            )
            .at(location));
        }

        Ok(Statement::Output { value, location })
    }

    /// Parse `yatha (condition) { body }`
    fn parse_while(&mut self) -> Result<Statement, ParseError> {
        let location = self.consume().map(|t| t.location).unwrap_or(self.last_location);
        self.expect_symbol(Symbol::LParen)?;

        let condition = self.parenthesized_content().ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::ConditionError,
                "Expression is not valid",
                "Ensure all opening parentheses and expressions are properly written",
            )
            .at(location)
        })?;

        if condition.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::ConditionError,
                "Condition cannot be empty",
                "Provide at least one expression inside 'yatha(...)'",
            )
            .at(location));
        }

        let body = self.parse_block()?;

        Ok(Statement::While {
            condition,
            body,
            location,
        })
    }

    /// Parse `prati_ghatak (init; condition; increment) { body }`
    fn parse_for(&mut self) -> Result<Statement, ParseError> {
        let location = self.consume().map(|t| t.location).unwrap_or(self.last_location);
        self.expect_symbol(Symbol::LParen)?;

        let header = self.parenthesized_content().ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::ConditionError,
                "Expression is not valid",
                "Ensure all opening parentheses and expressions are properly written",
            )
            .at(location)
        })?;

        // Every ';' in the header counts, whatever its paren depth.
        let separators: Vec<usize> = header
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_symbol(Symbol::Semicolon))
            .map(|(i, _)| i)
            .collect();

        let [first, second] = separators[..] else {
            return Err(ParseError::new(
                ParseErrorKind::SyntaxError,
                "Invalid 'prati_ghatak' loop syntax",
                format!(
                    "Expected two semicolons separating init, condition, and increment, found {}",
                    separators.len()
                ),
            )
            .at(location));
        };

        let body = self.parse_block()?;

        Ok(Statement::For {
            init: header[..first].to_vec(),
            condition: header[first + 1..second].to_vec(),
            increment: header[second + 1..].to_vec(),
            body,
            location,
        })
    }

    /// Parse `yadi (c) {..} anyatha_yadi (c) {..}* anyatha {..}?`
    fn parse_if(&mut self) -> Result<Statement, ParseError> {
        let location = self.consume().map(|t| t.location).unwrap_or(self.last_location);
        let mut branches = vec![self.parse_branch("yadi", location)?];

        while self.check_keyword(Keyword::ElseIf) {
            let branch_location = self.consume().map(|t| t.location).unwrap_or(self.last_location);
            branches.push(self.parse_branch("anyatha_yadi", branch_location)?);
        }

        let else_body = if self.check_keyword(Keyword::Else) {
            self.consume();
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Statement::If {
            branches,
            else_body,
            location,
        })
    }

    /// Parse the `(condition) { body }` part of an if / else-if arm
    fn parse_branch(&mut self, keyword: &str, location: SourceLocation) -> Result<Branch, ParseError> {
        self.expect_symbol(Symbol::LParen)?;

        let condition = self.parenthesized_content().ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::ConditionError,
                format!("Invalid '{}' condition expression", keyword),
                "Unmatched parentheses or malformed condition",
            )
            .at(location)
        })?;

        if condition.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::ConditionError,
                "Condition cannot be empty",
                format!("Provide at least one expression inside '{}(...)'", keyword),
            )
            .at(location));
        }

        let body = self.parse_block()?;
        Ok(Branch { condition, body })
    }

    /// Parse `{ statement* }`. The opening brace must come next.
    pub(crate) fn parse_block(&mut self) -> Result<Vec<Statement>, ParseError> {
        let open = self.expect_symbol(Symbol::LBrace)?;
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::new(
                ParseErrorKind::WrongSyntax,
                "Blocks are nested too deeply",
                format!(
                    "At most {} blocks may be open at once; move inner code into a separate loop or branch",
                    MAX_NESTING_DEPTH
                ),
            )
            .at(open.location));
        }
        self.depth += 1;
        let mut body = Vec::new();

        while !self.is_at_end() && !self.check_symbol(Symbol::RBrace) {
            if let Some(statement) = self.parse_statement()? {
                body.push(statement);
            }
        }

        if !self.check_symbol(Symbol::RBrace) {
            return Err(ParseError::new(
                ParseErrorKind::MissingClosingBrace,
                "Expected '}' at end of block",
                format!(
                    "Check that the '{{' opened at line {}, column {} has a matching '}}'",
                    open.location.line, open.location.column
                ),
            )
            .at(self.last_location));
        }
        self.consume();
        self.depth -= 1;

        Ok(body)
    }

    /// Collect tokens up to the matching `)`; the opening `(` has already
    /// been consumed. `None` means the parentheses never balanced.
    pub(crate) fn parenthesized_content(&mut self) -> Option<Vec<Token>> {
        let mut content = Vec::new();
        let mut depth = 1usize;

        while let Some(token) = self.consume() {
            if token.is_symbol(Symbol::LParen) {
                depth += 1;
            } else if token.is_symbol(Symbol::RParen) {
                depth -= 1;
                if depth == 0 {
                    return Some(content);
                }
            }
            content.push(token);
        }

        None
    }

    /// Collect a value run: everything up to the next keyword or `;`, or up
    /// to an `identifier =` pair that starts the following assignment.
    pub(crate) fn expression_run(&mut self) -> Vec<Token> {
        let mut run = Vec::new();

        while let Some(token) = self.peek() {
            if token.is_any_keyword() || token.is_symbol(Symbol::Semicolon) {
                break;
            }
            let starts_assignment = token.identifier().is_some()
                && self
                    .peek_nth(1)
                    .is_some_and(|t| t.is_operator(Operator::Assign));
            if starts_assignment {
                break;
            }
            if let Some(token) = self.consume() {
                run.push(token);
            }
        }

        run
    }

    fn missing_value(&self, name: &str, construct: &str) -> ParseError {
        ParseError::new(
            ParseErrorKind::MissingValue,
            format!("Expected value after '=' in {} of '{}'", construct, name),
            format!("Variable {} requires a value after the assignment operator", construct),
        )
        .at(self.last_location)
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::constants::MAX_NESTING_DEPTH;
    use crate::parser::ast::Statement;
    use crate::parser::lexer::{tokenize, TokenKind};
    use crate::parser::parse::{parse, ParseError, ParseErrorKind};
    use crate::parser::ast::Program;

    fn parse_body(body: &str) -> Result<Program, ParseError> {
        let source = format!("arambha systummm\n{}\nbihari_sramik", body);
        parse(tokenize(&source).unwrap())
    }

    fn lexemes(tokens: &[crate::parser::lexer::Token]) -> Vec<String> {
        tokens.iter().map(|t| t.lexeme()).collect()
    }

    #[test]
    fn test_declarations_keep_raw_tokens() {
        let program = parse_body("ghoshit_kar a = 1 + 2; nishchit_kar b = \"x\";").unwrap();
        assert_eq!(program.body.len(), 2);
        match &program.body[0] {
            Statement::VarDecl { name, value, .. } => {
                assert_eq!(name, "a");
                assert_eq!(lexemes(value), vec!["1", "+", "2"]);
            }
            other => panic!("Expected VarDecl, got {:?}", other),
        }
        assert!(matches!(&program.body[1], Statement::ConstDecl { name, .. } if name == "b"));
    }

    #[test]
    fn test_value_run_stops_before_next_assignment() {
        let program = parse_body("a = 1 b = 2").unwrap();
        assert_eq!(program.body.len(), 2);
        match &program.body[0] {
            Statement::Assignment { name, value, .. } => {
                assert_eq!(name, "a");
                assert_eq!(lexemes(value), vec!["1"]);
            }
            other => panic!("Expected Assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_print_collects_nested_parentheses() {
        let program = parse_body("prakashit_kar((1 + 2) * 3, \"x\");").unwrap();
        match &program.body[0] {
            Statement::Output { value, .. } => {
                assert_eq!(lexemes(value), vec!["(", "1", "+", "2", ")", "*", "3", ",", "\"x\""]);
            }
            other => panic!("Expected Output, got {:?}", other),
        }
    }

    #[test]
    fn test_unmatched_paren_in_print() {
        let err = parse_body("prakashit_kar((1 + 2);").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingRightParen);
        assert!(err.message.contains("prakashit_kar"));
        assert!(!err.context.is_empty());
    }

    #[test]
    fn test_empty_print() {
        let err = parse_body("prakashit_kar();").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyPrint);
    }

    #[test]
    fn test_missing_closing_brace() {
        let err = parse_body("yadi (satya) { prakashit_kar(1);").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingClosingBrace);
        assert!(err.context.contains("line 2"));
    }

    #[test]
    fn test_value_run_swallows_closing_brace_without_semicolon() {
        let err = parse_body("yatha (satya) { a = 5 }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingClosingBrace);
    }

    #[test]
    fn test_if_chain_branches() {
        let program = parse_body(
            "yadi (a > b) { prakashit_kar(1); } anyatha_yadi (a == b) { prakashit_kar(2); } anyatha { prakashit_kar(3); }",
        )
        .unwrap();
        match &program.body[0] {
            Statement::If {
                branches,
                else_body,
                ..
            } => {
                assert_eq!(branches.len(), 2);
                assert_eq!(lexemes(&branches[1].condition), vec!["a", "==", "b"]);
                assert_eq!(else_body.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("Expected If, got {:?}", other),
        }
    }

    #[test]
    fn test_else_without_if() {
        let err = parse_body("anyatha { prakashit_kar(1); }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::WrongSyntax);
    }

    #[test]
    fn test_repeated_skeleton_keyword() {
        let err = parse_body("arambha").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MultipleDeclarations);
        let err = parse_body("bihari_sramik").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MultipleDeclarations);
    }

    #[test]
    fn test_for_header_slices() {
        let program = parse_body("prati_ghatak (ghoshit_kar i = 0; i < 5; i = i + 1) { viram; }").unwrap();
        match &program.body[0] {
            Statement::For {
                init,
                condition,
                increment,
                body,
                ..
            } => {
                assert_eq!(lexemes(init), vec!["ghoshit_kar", "i", "=", "0"]);
                assert_eq!(lexemes(condition), vec!["i", "<", "5"]);
                assert_eq!(lexemes(increment), vec!["i", "=", "i", "+", "1"]);
                assert!(matches!(body[0], Statement::Break { .. }));
            }
            other => panic!("Expected For, got {:?}", other),
        }
    }

    #[test]
    fn test_for_header_needs_two_semicolons() {
        let err = parse_body("prati_ghatak (i = 0; i < 5) { }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::SyntaxError);
        let err = parse_body("prati_ghatak (;;;) { }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::SyntaxError);
    }

    #[test]
    fn test_while_condition_errors() {
        let err = parse_body("yatha () { }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ConditionError);
        let err = parse_body("yatha ((a < b) { }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ConditionError);
    }

    #[test]
    fn test_if_condition_errors() {
        let err = parse_body("yadi () { }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ConditionError);
        assert!(err.context.contains("yadi(...)"));

        let err = parse_body("yadi (1) { } anyatha_yadi () { }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ConditionError);
        assert!(err.context.contains("anyatha_yadi(...)"));

        let err = parse_body("yadi ((a > b) { }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ConditionError);
        assert!(!err.context.is_empty());
    }

    #[test]
    fn test_for_header_with_unbalanced_parens() {
        let err = parse_body("prati_ghatak ((i = 0; i < 1; i++) { }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ConditionError);
        assert_eq!(err.message, "Expression is not valid");
        assert!(!err.context.is_empty());
    }

    #[test]
    fn test_block_nesting_ceiling() {
        let nested = |levels: usize| {
            format!(
                "{}prakashit_kar(1);{}",
                "yadi (satya) { ".repeat(levels),
                " }".repeat(levels)
            )
        };

        assert!(parse_body(&nested(MAX_NESTING_DEPTH)).is_ok());

        let err = parse_body(&nested(MAX_NESTING_DEPTH + 1)).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::WrongSyntax);
        assert!(err.context.contains(&MAX_NESTING_DEPTH.to_string()));

        // Far past the ceiling the parser still returns instead of recursing.
        let err = parse_body(&nested(50_000)).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::WrongSyntax);
    }

    #[test]
    fn test_depth_resets_between_sibling_blocks() {
        let sibling = format!(
            "{}{}",
            "yadi (satya) { ".repeat(MAX_NESTING_DEPTH),
            " }".repeat(MAX_NESTING_DEPTH)
        );
        let program = parse_body(&format!("{} {}", sibling, sibling)).unwrap();
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn test_block_requires_opening_brace() {
        let err = parse_body("yatha (satya) prakashit_kar(1);").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_declaration_errors() {
        let err = parse_body("ghoshit_kar = 5;").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingIdentifier);

        let err = parse_body("ghoshit_kar a 5;").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedToken);
        assert!(err.context.contains("'a'"));

        let err = parse_body("ghoshit_kar a = ;").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MissingValue);
    }

    #[test]
    fn test_lenient_skipping() {
        // A bare identifier, a stray operator run and extra semicolons are
        // dropped without error.
        let program = parse_body("x; i + + ;; 42 ghoshit_kar a = 1;").unwrap();
        assert_eq!(program.body.len(), 1);
        assert!(matches!(&program.body[0], Statement::VarDecl { name, .. } if name == "a"));
    }

    #[test]
    fn test_first_error_aborts_parse() {
        let err = parse_body("prakashit_kar(); anyatha { }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyPrint);
    }

    #[test]
    fn test_string_brace_does_not_close_block() {
        let program = parse_body("yadi (satya) { prakashit_kar(\"}\"); }").unwrap();
        match &program.body[0] {
            Statement::If { branches, .. } => match &branches[0].body[0] {
                Statement::Output { value, .. } => {
                    assert_eq!(value[0].kind, TokenKind::Str("}".to_string()));
                }
                other => panic!("Expected Output, got {:?}", other),
            },
            other => panic!("Expected If, got {:?}", other),
        }
    }
}
