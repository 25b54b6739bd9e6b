//! Lexer (tokenizer) for Vishwaguru source text
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! The scan is a single left-to-right pass with no backtracking; the first
//! lexical problem aborts the whole scan with a [`LexError`].
//!
//! At each position the rules are tried in this order: whitespace, `//` line
//! comment, `/* */` block comment, quoted string, numeric literal, operator
//! lexicon, single-character symbol, identifier or keyword.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// Reserved words of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `arambha`, first word of every program
    Start,
    /// `systummm`, second word of every program
    Main,
    /// `bihari_sramik`, last word of every program
    End,
    Let,
    Const,
    Print,
    If,
    ElseIf,
    Else,
    While,
    For,
    Break,
    Continue,
}

impl Keyword {
    pub const ALL: [Keyword; 13] = [
        Keyword::Start,
        Keyword::Main,
        Keyword::End,
        Keyword::Let,
        Keyword::Const,
        Keyword::If,
        Keyword::ElseIf,
        Keyword::Else,
        Keyword::For,
        Keyword::While,
        Keyword::Break,
        Keyword::Continue,
        Keyword::Print,
    ];

    pub fn lexeme(self) -> &'static str {
        match self {
            Keyword::Start => "arambha",
            Keyword::Main => "systummm",
            Keyword::End => "bihari_sramik",
            Keyword::Let => "ghoshit_kar",
            Keyword::Const => "nishchit_kar",
            Keyword::Print => "prakashit_kar",
            Keyword::If => "yadi",
            Keyword::ElseIf => "anyatha_yadi",
            Keyword::Else => "anyatha",
            Keyword::While => "yatha",
            Keyword::For => "prati_ghatak",
            Keyword::Break => "viram",
            Keyword::Continue => "agla_ghaatak",
        }
    }

    pub fn from_word(word: &str) -> Option<Keyword> {
        Keyword::ALL.iter().copied().find(|kw| kw.lexeme() == word)
    }

    /// The three words that frame a program and may appear only once.
    pub fn is_skeleton(self) -> bool {
        matches!(self, Keyword::Start | Keyword::Main | Keyword::End)
    }
}

/// Operators, both symbolic and word-shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    EqEq,   // ==
    NotEq,  // !=
    Le,     // <=
    Ge,     // >=
    AndAnd, // &&
    And,    // ca
    Or,     // va
    Not,    // na
    True,   // satya
    False,  // asatya
    Null,   // chintan
    OrOr,   // ||
    Assign, // =
    Lt,     // <
    Gt,     // >
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang, // !
}

/// The operator lexicon in match order. The first entry that matches at the
/// current position wins, so two-character operators must stay ahead of
/// their one-character prefixes.
pub const OPERATORS: [(&str, Operator); 21] = [
    ("==", Operator::EqEq),
    ("!=", Operator::NotEq),
    ("<=", Operator::Le),
    (">=", Operator::Ge),
    ("&&", Operator::AndAnd),
    ("ca", Operator::And),
    ("va", Operator::Or),
    ("na", Operator::Not),
    ("satya", Operator::True),
    ("asatya", Operator::False),
    ("chintan", Operator::Null),
    ("||", Operator::OrOr),
    ("=", Operator::Assign),
    ("<", Operator::Lt),
    (">", Operator::Gt),
    ("+", Operator::Plus),
    ("-", Operator::Minus),
    ("*", Operator::Star),
    ("/", Operator::Slash),
    ("%", Operator::Percent),
    ("!", Operator::Bang),
];

impl Operator {
    pub fn lexeme(self) -> &'static str {
        OPERATORS
            .iter()
            .find(|(_, op)| *op == self)
            .map(|(text, _)| *text)
            .unwrap_or("?")
    }

    /// Word operators only match when they are not the prefix of a longer word.
    pub fn is_word(self) -> bool {
        matches!(
            self,
            Operator::And
                | Operator::Or
                | Operator::Not
                | Operator::True
                | Operator::False
                | Operator::Null
        )
    }
}

/// Grouping and statement punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
}

impl Symbol {
    pub fn from_char(ch: char) -> Option<Symbol> {
        match ch {
            '(' => Some(Symbol::LParen),
            ')' => Some(Symbol::RParen),
            '{' => Some(Symbol::LBrace),
            '}' => Some(Symbol::RBrace),
            ',' => Some(Symbol::Comma),
            ';' => Some(Symbol::Semicolon),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::LParen => '(',
            Symbol::RParen => ')',
            Symbol::LBrace => '{',
            Symbol::RBrace => '}',
            Symbol::Comma => ',',
            Symbol::Semicolon => ';',
        }
    }
}

/// What a token is, together with its literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier(String),
    Integer(i64),
    Float(f64),
    Str(String),
    Operator(Operator),
    Symbol(Symbol),
}

/// A lexical unit and where it starts in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, location: SourceLocation) -> Self {
        Token { kind, location }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        self.kind == TokenKind::Symbol(symbol)
    }

    pub fn is_operator(&self, op: Operator) -> bool {
        self.kind == TokenKind::Operator(op)
    }

    pub fn is_any_keyword(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword(_))
    }

    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// The token's source-like text, with strings re-quoted.
    pub fn lexeme(&self) -> String {
        match &self.kind {
            TokenKind::Keyword(kw) => kw.lexeme().to_string(),
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Integer(n) => n.to_string(),
            TokenKind::Float(x) => x.to_string(),
            TokenKind::Str(s) => format!("{:?}", s),
            TokenKind::Operator(op) => op.lexeme().to_string(),
            TokenKind::Symbol(sym) => sym.as_char().to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Keyword(kw) => write!(f, "keyword '{}'", kw.lexeme()),
            TokenKind::Identifier(name) => write!(f, "identifier '{}'", name),
            TokenKind::Integer(n) => write!(f, "number {}", n),
            TokenKind::Float(x) => write!(f, "float {}", x),
            TokenKind::Str(s) => write!(f, "string {:?}", s),
            TokenKind::Operator(op) => write!(f, "operator '{}'", op.lexeme()),
            TokenKind::Symbol(sym) => write!(f, "symbol '{}'", sym.as_char()),
        }
    }
}

/// Tag identifying the class of a lexical failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    UnterminatedComment,
    UnterminatedString,
    InvalidNumberFormat,
    InvalidDecimalFormat,
    UnknownCharacter,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            LexErrorKind::UnterminatedComment => "UNTERMINATED_COMMENT",
            LexErrorKind::UnterminatedString => "UNTERMINATED_STRING",
            LexErrorKind::InvalidNumberFormat => "INVALID_NUMBER_FORMAT",
            LexErrorKind::InvalidDecimalFormat => "INVALID_DECIMAL_FORMAT",
            LexErrorKind::UnknownCharacter => "UNKNOWN_CHARACTER",
        };
        f.write_str(tag)
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at line {}, column {}", .location.line, .location.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub message: String,
    pub context: String,
    pub location: SourceLocation,
}

/// Tokenize `source` in one pass.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Lexer for Vishwaguru source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Scan one token starting at the current (non-blank) position.
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Err(self.error(LexErrorKind::UnknownCharacter, "Unexpected end of input", "", loc)),
        };

        if ch == '"' || ch == '\'' {
            return self.string_literal(ch);
        }

        if ch.is_ascii_digit() || (ch == '.' && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit())) {
            return self.number_literal();
        }

        if let Some(op) = self.match_operator() {
            for _ in 0..op.lexeme().chars().count() {
                self.advance();
            }
            return Ok(Token::new(TokenKind::Operator(op), loc));
        }

        if let Some(symbol) = Symbol::from_char(ch) {
            self.advance();
            return Ok(Token::new(TokenKind::Symbol(symbol), loc));
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            return Ok(self.identifier_or_keyword());
        }

        Err(self.error(
            LexErrorKind::UnknownCharacter,
            "Encountered unknown character",
            &format!("Character '{}' (code {}) is not recognized", ch, ch as u32),
            loc,
        ))
    }

    /// Find the first lexicon entry that matches at the current position.
    fn match_operator(&self) -> Option<Operator> {
        OPERATORS.iter().find_map(|(text, op)| {
            let len = text.chars().count();
            let matches = text
                .chars()
                .enumerate()
                .all(|(i, c)| self.peek_ahead(i) == Some(c));
            if !matches {
                return None;
            }
            if op.is_word() && self.peek_ahead(len).is_some_and(is_identifier_char) {
                return None;
            }
            Some(*op)
        })
    }

    /// Parse a single- or double-quoted string literal.
    fn string_literal(&mut self, quote: char) -> Result<Token, LexError> {
        let loc = self.current_location();
        self.advance(); // opening quote
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            if ch == quote {
                self.advance(); // closing quote
                return Ok(Token::new(TokenKind::Str(string), loc));
            }

            if ch == '\\' && self.peek_ahead(1).is_some() {
                self.advance();
                if let Some(escaped) = self.advance() {
                    string.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                }
            } else {
                string.push(ch);
                self.advance();
            }
        }

        Err(self.error(
            LexErrorKind::UnterminatedString,
            "Unterminated string literal",
            &format!("String started with {} but never closed", quote),
            loc,
        ))
    }

    /// Parse an integer or float literal. At most one decimal point is
    /// allowed and it must be followed by a digit.
    fn number_literal(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let mut text = String::new();
        let mut has_decimal = false;

        if self.peek() == Some('.') {
            text.push('.');
            has_decimal = true;
            self.advance();
        }

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
            } else if ch == '.' {
                if has_decimal {
                    return Err(self.error(
                        LexErrorKind::InvalidNumberFormat,
                        "Number contains multiple decimal points",
                        &format!("Invalid number '{}.' - multiple decimal points not allowed", text),
                        loc,
                    ));
                }
                if !self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) {
                    return Err(self.error(
                        LexErrorKind::InvalidDecimalFormat,
                        "Decimal point must be followed by digits",
                        &format!("Number '{}.' is incomplete", text),
                        self.current_location(),
                    ));
                }
                text.push(ch);
                has_decimal = true;
            } else {
                break;
            }
            self.advance();
        }

        let kind = if has_decimal {
            text.parse::<f64>().map(TokenKind::Float).ok()
        } else {
            text.parse::<i64>().map(TokenKind::Integer).ok()
        };

        kind.map(|kind| Token::new(kind, loc)).ok_or_else(|| {
            self.error(
                LexErrorKind::InvalidNumberFormat,
                "Number literal is out of range",
                &format!("Invalid number '{}'", text),
                loc,
            )
        })
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self) -> Token {
        let loc = self.current_location();
        let mut ident = String::new();

        while let Some(ch) = self.peek() {
            if is_identifier_char(ch) {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match Keyword::from_word(&ident) {
            Some(kw) => Token::new(TokenKind::Keyword(kw), loc),
            None => Token::new(TokenKind::Identifier(ident), loc),
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...), leaving the newline in place
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(self.error(
            LexErrorKind::UnterminatedComment,
            "Unterminated multi-line comment",
            "Comment started with '/*' but never closed with '*/'",
            start_loc,
        ))
    }

    fn error(&self, kind: LexErrorKind, message: &str, context: &str, location: SourceLocation) -> LexError {
        LexError {
            kind,
            message: message.to_string(),
            context: context.to_string(),
            location,
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.position, self.line, self.column)
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
