//! Expression parsing implementation
//!
//! Statements keep their values and conditions as raw token slices. This
//! module turns one such slice into an [`Expr`] tree using recursive descent
//! with one function per precedence level.
//!
//! # Operator fusion
//!
//! The lexicon only knows single-character arithmetic operators, so `i++`
//! arrives as two `+` tokens and `x += 1` as `+` followed by `=`. Every run
//! of adjacent operator tokens is glued back into one string and split again
//! by longest match, which gives `++`, `--`, compound assignments and the
//! strict comparisons `===` / `!==`. Word operators take part in the run
//! through their symbolic spelling (`na` is `!`, `ca` is `&&`, `va` is `||`).
//!
//! # Precedence (lowest to highest)
//!
//! ```text
//! assignment  =  +=  -=  *=  /=  %=      (right-assoc, identifier target)
//! or          ||  va
//! and         &&  ca
//! equality    ==  !=  ===  !==
//! relational  <  >  <=  >=
//! additive    +  -
//! term        *  /  %
//! unary       !  na  -  +  ++x  --x
//! postfix     x++  x--
//! primary     literal | identifier | ( expr )
//! ```
//!
//! Nesting of groups and unary operators is capped at
//! [`MAX_NESTING_DEPTH`], and no tree grows taller than
//! [`MAX_EXPRESSION_DEPTH`], so evaluation never recurses without bound.

use crate::interpreter::constants::{MAX_EXPRESSION_DEPTH, MAX_NESTING_DEPTH};
use crate::parser::ast::*;
use crate::parser::lexer::{Operator, Symbol, Token, TokenKind};
use crate::parser::parse::{ParseError, ParseErrorKind};

/// Operators after fusion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Punct {
    StrictEq,
    StrictNe,
    EqEq,
    NotEq,
    Le,
    Ge,
    AndAnd,
    OrOr,
    PlusPlus,
    MinusMinus,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    Assign,
    Lt,
    Gt,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
}

// Longest spellings first.
const PUNCTS: [(&str, Punct); 24] = [
    ("===", Punct::StrictEq),
    ("!==", Punct::StrictNe),
    ("==", Punct::EqEq),
    ("!=", Punct::NotEq),
    ("<=", Punct::Le),
    (">=", Punct::Ge),
    ("&&", Punct::AndAnd),
    ("||", Punct::OrOr),
    ("++", Punct::PlusPlus),
    ("--", Punct::MinusMinus),
    ("+=", Punct::PlusEq),
    ("-=", Punct::MinusEq),
    ("*=", Punct::StarEq),
    ("/=", Punct::SlashEq),
    ("%=", Punct::PercentEq),
    ("=", Punct::Assign),
    ("<", Punct::Lt),
    (">", Punct::Gt),
    ("+", Punct::Plus),
    ("-", Punct::Minus),
    ("*", Punct::Star),
    ("/", Punct::Slash),
    ("%", Punct::Percent),
    ("!", Punct::Bang),
];

impl Punct {
    fn spelling(self) -> &'static str {
        PUNCTS
            .iter()
            .find(|(_, p)| *p == self)
            .map(|(s, _)| *s)
            .unwrap_or("?")
    }

    fn compound(self) -> Option<BinOp> {
        match self {
            Punct::PlusEq => Some(BinOp::Add),
            Punct::MinusEq => Some(BinOp::Sub),
            Punct::StarEq => Some(BinOp::Mul),
            Punct::SlashEq => Some(BinOp::Div),
            Punct::PercentEq => Some(BinOp::Mod),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Value(Literal),
    Ident(String),
    Punct(Punct),
    Open,
    Close,
    Comma,
    /// Anything that cannot appear inside an expression (keywords, braces, `;`)
    Stray(String),
}

#[derive(Debug, Clone)]
struct Lexeme {
    piece: Piece,
    location: SourceLocation,
}

/// Parse a whole slice as a single expression.
pub fn parse_expression(tokens: &[Token]) -> Result<Expr, ParseError> {
    let mut parser = ExprParser::new(tokens)?;
    let node = parser.expression()?;
    parser.finish()?;
    Ok(node.expr)
}

/// Parse a comma-separated list of expressions (print arguments). A single
/// trailing comma is accepted.
pub fn parse_expression_list(tokens: &[Token]) -> Result<Vec<Expr>, ParseError> {
    let mut parser = ExprParser::new(tokens)?;
    let mut items = vec![parser.expression()?.expr];

    while parser.eat(&Piece::Comma) {
        if parser.at_end() {
            break;
        }
        items.push(parser.expression()?.expr);
    }

    parser.finish()?;
    Ok(items)
}

/// An expression and the height of its tree
struct Node {
    expr: Expr,
    depth: usize,
}

impl Node {
    fn leaf(expr: Expr) -> Self {
        Node { expr, depth: 1 }
    }
}

struct ExprParser {
    pieces: Vec<Lexeme>,
    pos: usize,
    end: SourceLocation,
    /// Open groups, unary operators and assignments on the call stack
    nesting: usize,
}

impl ExprParser {
    fn new(tokens: &[Token]) -> Result<Self, ParseError> {
        let end = tokens.last().map(|t| t.location).unwrap_or_default();
        Ok(ExprParser {
            pieces: fuse(tokens)?,
            pos: 0,
            end,
            nesting: 0,
        })
    }

    fn expression(&mut self) -> Result<Node, ParseError> {
        self.assignment()
    }

    /// IDENT (= | op=) assignment | or
    fn assignment(&mut self) -> Result<Node, ParseError> {
        if let (Some(Piece::Ident(name)), Some(Piece::Punct(p))) = (self.peek(), self.peek_nth(1)) {
            let op = match p {
                Punct::Assign => Some(None),
                other => other.compound().map(Some),
            };
            if let Some(op) = op {
                let name = name.clone();
                self.pos += 2;
                self.enter()?;
                let value = self.assignment()?;
                self.nesting -= 1;
                let depth = self.checked_depth(value.depth + 1)?;
                return Ok(Node {
                    expr: Expr::Assign {
                        name,
                        op,
                        value: Box::new(value.expr),
                    },
                    depth,
                });
            }
        }

        self.logical_or()
    }

    fn logical_or(&mut self) -> Result<Node, ParseError> {
        let mut left = self.logical_and()?;
        while self.eat_punct(Punct::OrOr) {
            let right = self.logical_and()?;
            left = self.join(BinOp::Or, left, right)?;
        }
        Ok(left)
    }

    fn logical_and(&mut self) -> Result<Node, ParseError> {
        let mut left = self.equality()?;
        while self.eat_punct(Punct::AndAnd) {
            let right = self.equality()?;
            left = self.join(BinOp::And, left, right)?;
        }
        Ok(left)
    }

    fn equality(&mut self) -> Result<Node, ParseError> {
        let mut left = self.relational()?;
        loop {
            let op = match self.peek() {
                Some(Piece::Punct(Punct::EqEq)) => BinOp::Eq,
                Some(Piece::Punct(Punct::NotEq)) => BinOp::Ne,
                Some(Piece::Punct(Punct::StrictEq)) => BinOp::StrictEq,
                Some(Piece::Punct(Punct::StrictNe)) => BinOp::StrictNe,
                _ => break,
            };
            self.pos += 1;
            let right = self.relational()?;
            left = self.join(op, left, right)?;
        }
        Ok(left)
    }

    fn relational(&mut self) -> Result<Node, ParseError> {
        let mut left = self.additive()?;
        loop {
            let op = match self.peek() {
                Some(Piece::Punct(Punct::Lt)) => BinOp::Lt,
                Some(Piece::Punct(Punct::Le)) => BinOp::Le,
                Some(Piece::Punct(Punct::Gt)) => BinOp::Gt,
                Some(Piece::Punct(Punct::Ge)) => BinOp::Ge,
                _ => break,
            };
            self.pos += 1;
            let right = self.additive()?;
            left = self.join(op, left, right)?;
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<Node, ParseError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Piece::Punct(Punct::Plus)) => BinOp::Add,
                Some(Piece::Punct(Punct::Minus)) => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let right = self.term()?;
            left = self.join(op, left, right)?;
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Node, ParseError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Piece::Punct(Punct::Star)) => BinOp::Mul,
                Some(Piece::Punct(Punct::Slash)) => BinOp::Div,
                Some(Piece::Punct(Punct::Percent)) => BinOp::Mod,
                _ => break,
            };
            self.pos += 1;
            let right = self.unary()?;
            left = self.join(op, left, right)?;
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Node, ParseError> {
        let op = match self.peek() {
            Some(Piece::Punct(Punct::Bang)) => Some(UnOp::Not),
            Some(Piece::Punct(Punct::Minus)) => Some(UnOp::Neg),
            Some(Piece::Punct(Punct::Plus)) => Some(UnOp::Plus),
            Some(Piece::Punct(p @ (Punct::PlusPlus | Punct::MinusMinus))) => {
                let p = *p;
                self.pos += 1;
                let name = self.update_target(p)?;
                let op = update_op(p);
                return Ok(Node::leaf(Expr::Update {
                    name,
                    op,
                    prefix: true,
                }));
            }
            _ => None,
        };

        if let Some(op) = op {
            self.pos += 1;
            self.enter()?;
            let operand = self.unary()?;
            self.nesting -= 1;
            let depth = self.checked_depth(operand.depth + 1)?;
            return Ok(Node {
                expr: Expr::Unary {
                    op,
                    operand: Box::new(operand.expr),
                },
                depth,
            });
        }

        self.postfix()
    }

    fn postfix(&mut self) -> Result<Node, ParseError> {
        let node = self.primary()?;

        if let Some(Piece::Punct(p @ (Punct::PlusPlus | Punct::MinusMinus))) = self.peek() {
            let p = *p;
            let Expr::Identifier(name) = node.expr else {
                return Err(self.error_here(format!(
                    "Invalid operand for postfix '{}'",
                    p.spelling()
                )));
            };
            self.pos += 1;
            return Ok(Node::leaf(Expr::Update {
                name,
                op: update_op(p),
                prefix: false,
            }));
        }

        Ok(node)
    }

    fn primary(&mut self) -> Result<Node, ParseError> {
        let Some(lexeme) = self.pieces.get(self.pos).cloned() else {
            return Err(ParseError::new(
                ParseErrorKind::InvalidExpression,
                "Unexpected end of expression",
                "An operand is missing at the end of the expression",
            )
            .at(self.end));
        };
        self.pos += 1;

        match lexeme.piece {
            Piece::Value(literal) => Ok(Node::leaf(Expr::Literal(literal))),
            Piece::Ident(name) => Ok(Node::leaf(Expr::Identifier(name))),
            Piece::Open => {
                self.enter()?;
                let inner = self.expression()?;
                self.nesting -= 1;
                if !self.eat(&Piece::Close) {
                    return Err(self.error_here("Expected ')' to close the group".to_string()));
                }
                Ok(inner)
            }
            other => Err(ParseError::new(
                ParseErrorKind::InvalidExpression,
                format!("Unexpected {} in expression", describe(&other)),
                "Expected a value, a variable name or '('",
            )
            .at(lexeme.location)),
        }
    }

    fn update_target(&mut self, p: Punct) -> Result<String, ParseError> {
        if let Some(Piece::Ident(name)) = self.peek() {
            let name = name.clone();
            self.pos += 1;
            return Ok(name);
        }
        Err(self.error_here(format!("Invalid operand for prefix '{}'", p.spelling())))
    }

    /// Step one level further into the call stack.
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.nesting >= MAX_NESTING_DEPTH {
            return Err(self.too_deep(format!(
                "Groups and unary operators may be nested at most {} levels deep",
                MAX_NESTING_DEPTH
            )));
        }
        self.nesting += 1;
        Ok(())
    }

    fn join(&self, op: BinOp, left: Node, right: Node) -> Result<Node, ParseError> {
        let depth = self.checked_depth(left.depth.max(right.depth) + 1)?;
        Ok(Node {
            expr: binary(op, left.expr, right.expr),
            depth,
        })
    }

    fn checked_depth(&self, depth: usize) -> Result<usize, ParseError> {
        if depth > MAX_EXPRESSION_DEPTH {
            return Err(self.too_deep(format!(
                "Expression trees may be at most {} levels deep; split it over several statements",
                MAX_EXPRESSION_DEPTH
            )));
        }
        Ok(depth)
    }

    fn too_deep(&self, context: String) -> ParseError {
        let location = self
            .pieces
            .get(self.pos.saturating_sub(1))
            .map(|l| l.location)
            .unwrap_or(self.end);
        ParseError::new(
            ParseErrorKind::InvalidExpression,
            "Expression is nested too deeply",
            context,
        )
        .at(location)
    }

    fn finish(&self) -> Result<(), ParseError> {
        match self.pieces.get(self.pos) {
            None => Ok(()),
            Some(lexeme) => Err(ParseError::new(
                ParseErrorKind::InvalidExpression,
                format!("Unexpected {} in expression", describe(&lexeme.piece)),
                "The expression continues past a complete value; check for a missing operator",
            )
            .at(lexeme.location)),
        }
    }

    fn error_here(&self, message: String) -> ParseError {
        let location = self
            .pieces
            .get(self.pos)
            .map(|l| l.location)
            .unwrap_or(self.end);
        ParseError::new(ParseErrorKind::InvalidExpression, message, "Malformed expression").at(location)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.pieces.len()
    }

    fn peek(&self) -> Option<&Piece> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<&Piece> {
        self.pieces.get(self.pos + n).map(|l| &l.piece)
    }

    fn eat(&mut self, piece: &Piece) -> bool {
        if self.peek() == Some(piece) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_punct(&mut self, p: Punct) -> bool {
        self.eat(&Piece::Punct(p))
    }
}

fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn update_op(p: Punct) -> UpdateOp {
    if p == Punct::PlusPlus {
        UpdateOp::Increment
    } else {
        UpdateOp::Decrement
    }
}

fn describe(piece: &Piece) -> String {
    match piece {
        Piece::Value(Literal::Number(n)) => format!("number '{}'", n),
        Piece::Value(Literal::Str(s)) => format!("string {:?}", s),
        Piece::Value(Literal::Bool(b)) => format!("literal '{}'", if *b { "satya" } else { "asatya" }),
        Piece::Value(Literal::Null) => "literal 'chintan'".to_string(),
        Piece::Ident(name) => format!("identifier '{}'", name),
        Piece::Punct(p) => format!("operator '{}'", p.spelling()),
        Piece::Open => "'('".to_string(),
        Piece::Close => "')'".to_string(),
        Piece::Comma => "','".to_string(),
        Piece::Stray(text) => format!("'{}'", text),
    }
}

/// Symbolic spelling used when an operator token joins a fused run.
fn operator_spelling(op: Operator) -> Option<&'static str> {
    match op {
        Operator::And => Some("&&"),
        Operator::Or => Some("||"),
        Operator::Not => Some("!"),
        Operator::True | Operator::False | Operator::Null => None,
        other => Some(other.lexeme()),
    }
}

/// Convert a token slice into pieces, fusing runs of adjacent operators.
fn fuse(tokens: &[Token]) -> Result<Vec<Lexeme>, ParseError> {
    let mut pieces = Vec::with_capacity(tokens.len());
    let mut run = String::new();
    let mut run_start = SourceLocation::default();

    for token in tokens {
        if let TokenKind::Operator(op) = &token.kind {
            if let Some(spelling) = operator_spelling(*op) {
                if run.is_empty() {
                    run_start = token.location;
                }
                run.push_str(spelling);
                continue;
            }
        }

        flush_run(&mut run, run_start, &mut pieces)?;

        let piece = match &token.kind {
            TokenKind::Integer(n) => Piece::Value(Literal::Number(*n as f64)),
            TokenKind::Float(n) => Piece::Value(Literal::Number(*n)),
            TokenKind::Str(s) => Piece::Value(Literal::Str(s.clone())),
            TokenKind::Identifier(name) => Piece::Ident(name.clone()),
            TokenKind::Operator(Operator::True) => Piece::Value(Literal::Bool(true)),
            TokenKind::Operator(Operator::False) => Piece::Value(Literal::Bool(false)),
            // only chintan is left once the fusable operators are taken
            TokenKind::Operator(_) => Piece::Value(Literal::Null),
            TokenKind::Symbol(Symbol::LParen) => Piece::Open,
            TokenKind::Symbol(Symbol::RParen) => Piece::Close,
            TokenKind::Symbol(Symbol::Comma) => Piece::Comma,
            TokenKind::Symbol(_) | TokenKind::Keyword(_) => Piece::Stray(token.lexeme()),
        };
        pieces.push(Lexeme {
            piece,
            location: token.location,
        });
    }

    flush_run(&mut run, run_start, &mut pieces)?;
    Ok(pieces)
}

fn flush_run(run: &mut String, location: SourceLocation, pieces: &mut Vec<Lexeme>) -> Result<(), ParseError> {
    let mut rest = run.as_str();

    while !rest.is_empty() {
        let Some((spelling, punct)) = PUNCTS.iter().find(|(s, _)| rest.starts_with(s)) else {
            return Err(ParseError::new(
                ParseErrorKind::InvalidExpression,
                format!("Unknown operator sequence '{}'", rest),
                "Operators written next to each other must form a valid operator",
            )
            .at(location));
        };
        pieces.push(Lexeme {
            piece: Piece::Punct(*punct),
            location,
        });
        rest = &rest[spelling.len()..];
    }

    run.clear();
    Ok(())
}
