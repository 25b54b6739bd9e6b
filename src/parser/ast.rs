// Statement tree and expression node definitions

use super::lexer::Token;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// Character offset from the start of the source
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

/// A verbatim, contiguous run of tokens taken from the source. Values and
/// conditions stay in this form until translation.
pub type TokenSlice = Vec<Token>;

/// One `condition { body }` arm of an if / else-if chain
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub condition: TokenSlice,
    pub body: Vec<Statement>,
}

/// Statement nodes produced by the parser
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    VarDecl {
        name: String,
        value: TokenSlice,
        location: SourceLocation,
    },
    ConstDecl {
        name: String,
        value: TokenSlice,
        location: SourceLocation,
    },
    Assignment {
        name: String,
        value: TokenSlice,
        location: SourceLocation,
    },
    Output {
        value: TokenSlice,
        location: SourceLocation,
    },
    If {
        branches: Vec<Branch>,
        else_body: Option<Vec<Statement>>,
        location: SourceLocation,
    },
    While {
        condition: TokenSlice,
        body: Vec<Statement>,
        location: SourceLocation,
    },
    For {
        init: TokenSlice,
        condition: TokenSlice,
        increment: TokenSlice,
        body: Vec<Statement>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
}

impl Statement {
    /// Get the source location of this statement's leading token
    pub fn location(&self) -> &SourceLocation {
        match self {
            Statement::VarDecl { location, .. }
            | Statement::ConstDecl { location, .. }
            | Statement::Assignment { location, .. }
            | Statement::Output { location, .. }
            | Statement::If { location, .. }
            | Statement::While { location, .. }
            | Statement::For { location, .. }
            | Statement::Break { location }
            | Statement::Continue { location } => location,
        }
    }
}

/// Top-level program structure: the statements between `arambha systummm`
/// and `bihari_sramik`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub body: Vec<Statement>,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }
}

/// Literal values that can appear in an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::StrictEq => "===",
            BinOp::StrictNe => "!==",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,  // -x
    Plus, // +x
    Not,  // !x, na x
}

/// Increment / decrement of a named variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

/// Expression nodes built from a token slice during translation
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Identifier(String),
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `name = value`, or `name op= value` when `op` is set
    Assign {
        name: String,
        op: Option<BinOp>,
        value: Box<Expr>,
    },
    Update {
        name: String,
        op: UpdateOp,
        prefix: bool,
    },
}
