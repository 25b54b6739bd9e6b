//! Lowered program form executed by the sandbox
//!
//! A [`Script`] is what the translator produces from a statement tree:
//! expressions are parsed, print statements become capture calls over a
//! deferred argument list, and every loop carries its own [`LoopGuard`].
//!
//! The `Display` impl renders a deterministic listing used by `--emit` and
//! the playground. The listing is never executed.

use crate::interpreter::constants::CAPTURE_NAME;
use crate::interpreter::value::format_number;
use crate::parser::ast::{Expr, Literal, SourceLocation, UnOp, UpdateOp};
use std::fmt;

/// Whether a declared binding may be reassigned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    Mutable,
    Constant,
}

impl Mutability {
    pub fn keyword(self) -> &'static str {
        match self {
            Mutability::Mutable => "let",
            Mutability::Constant => "const",
        }
    }
}

/// Per-loop iteration ceiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopGuard {
    pub name: String,
    pub limit: usize,
}

/// Source form a loop was lowered from; only affects the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    While,
    For,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuardedLoop {
    pub kind: LoopKind,
    pub guard: LoopGuard,
    /// `Declare` or `Eval`, run once inside the loop's own scope
    pub init: Option<Box<Stmt>>,
    /// `None` is always true
    pub condition: Option<Expr>,
    pub increment: Option<Expr>,
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptBranch {
    pub condition: Expr,
    pub body: Vec<Stmt>,
}

/// Lowered statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Declare {
        name: String,
        mutability: Mutability,
        init: Expr,
        location: SourceLocation,
    },
    Assign {
        name: String,
        value: Expr,
        location: SourceLocation,
    },
    /// Deferred argument list handed to the capture log
    Capture {
        args: Vec<Expr>,
        location: SourceLocation,
    },
    If {
        branches: Vec<ScriptBranch>,
        otherwise: Option<Vec<Stmt>>,
        location: SourceLocation,
    },
    Loop(GuardedLoop),
    Break,
    Continue,
    Eval {
        expr: Expr,
        location: SourceLocation,
    },
}

impl Stmt {
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            Stmt::Declare { location, .. }
            | Stmt::Assign { location, .. }
            | Stmt::Capture { location, .. }
            | Stmt::If { location, .. }
            | Stmt::Eval { location, .. } => Some(*location),
            Stmt::Loop(lp) => Some(lp.location),
            Stmt::Break | Stmt::Continue => None,
        }
    }
}

/// Translated program
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub body: Vec<Stmt>,
}

impl Script {
    /// Names of every loop guard, in source order
    pub fn guard_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_guards(&self.body, &mut names);
        names
    }
}

fn collect_guards<'a>(body: &'a [Stmt], names: &mut Vec<&'a str>) {
    for stmt in body {
        match stmt {
            Stmt::Loop(lp) => {
                names.push(&lp.guard.name);
                collect_guards(&lp.body, names);
            }
            Stmt::If {
                branches,
                otherwise,
                ..
            } => {
                for branch in branches {
                    collect_guards(&branch.body, names);
                }
                if let Some(body) = otherwise {
                    collect_guards(body, names);
                }
            }
            _ => {}
        }
    }
}

// ===== Listing =====

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(Literal::Number(n)) => f.write_str(&format_number(*n)),
            Expr::Literal(Literal::Str(s)) => write!(f, "{:?}", s),
            Expr::Literal(Literal::Bool(b)) => write!(f, "{}", b),
            Expr::Literal(Literal::Null) => f.write_str("null"),
            Expr::Identifier(name) => f.write_str(name),
            Expr::Unary { op, operand } => {
                let symbol = match op {
                    UnOp::Neg => "-",
                    UnOp::Plus => "+",
                    UnOp::Not => "!",
                };
                write!(f, "{}{}", symbol, operand)
            }
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", left, op.symbol(), right),
            Expr::Assign { name, op, value } => match op {
                Some(op) => write!(f, "{} {}= {}", name, op.symbol(), value),
                None => write!(f, "{} = {}", name, value),
            },
            Expr::Update { name, op, prefix } => {
                let symbol = match op {
                    UpdateOp::Increment => "++",
                    UpdateOp::Decrement => "--",
                };
                if *prefix {
                    write!(f, "{}{}", symbol, name)
                } else {
                    write!(f, "{}{}", name, symbol)
                }
            }
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_block(f, &self.body, 0)
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, body: &[Stmt], depth: usize) -> fmt::Result {
    for stmt in body {
        write_stmt(f, stmt, depth)?;
    }
    Ok(())
}

fn write_stmt(f: &mut fmt::Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    match stmt {
        Stmt::Declare {
            name,
            mutability,
            init,
            ..
        } => writeln!(f, "{}{} {} = {};", pad, mutability.keyword(), name, init),
        Stmt::Assign { name, value, .. } => writeln!(f, "{}{} = {};", pad, name, value),
        Stmt::Capture { args, .. } => {
            let list: Vec<String> = args.iter().map(Expr::to_string).collect();
            writeln!(f, "{}{}(() => [{}]);", pad, CAPTURE_NAME, list.join(", "))
        }
        Stmt::If {
            branches,
            otherwise,
            ..
        } => {
            for (i, branch) in branches.iter().enumerate() {
                let keyword = if i == 0 { "if" } else { "} else if" };
                writeln!(f, "{}{} ({}) {{", pad, keyword, branch.condition)?;
                write_block(f, &branch.body, depth + 1)?;
            }
            if let Some(body) = otherwise {
                writeln!(f, "{}}} else {{", pad)?;
                write_block(f, body, depth + 1)?;
            }
            writeln!(f, "{}}}", pad)
        }
        Stmt::Loop(lp) => write_loop(f, lp, depth),
        Stmt::Break => writeln!(f, "{}break;", pad),
        Stmt::Continue => writeln!(f, "{}continue;", pad),
        Stmt::Eval { expr, .. } => writeln!(f, "{}{};", pad, expr),
    }
}

fn write_loop(f: &mut fmt::Formatter<'_>, lp: &GuardedLoop, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    let guard = &lp.guard.name;

    writeln!(f, "{}let {} = 0;", pad, guard)?;
    let condition = lp
        .condition
        .as_ref()
        .map(Expr::to_string)
        .unwrap_or_default();

    match lp.kind {
        LoopKind::While => writeln!(f, "{}while ({}) {{", pad, condition)?,
        LoopKind::For => {
            let init = match lp.init.as_deref() {
                Some(Stmt::Declare {
                    name,
                    mutability,
                    init,
                    ..
                }) => format!("{} {} = {}", mutability.keyword(), name, init),
                Some(Stmt::Eval { expr, .. }) => expr.to_string(),
                _ => String::new(),
            };
            let increment = lp
                .increment
                .as_ref()
                .map(Expr::to_string)
                .unwrap_or_default();
            writeln!(f, "{}for ({}; {}; {}) {{", pad, init, condition, increment)?;
        }
    }

    writeln!(
        f,
        "{}  if (++{} > {}) throw new Error(\"Loop iteration limit exceeded: more than {} iterations\");",
        pad, guard, lp.guard.limit, lp.guard.limit
    )?;
    write_block(f, &lp.body, depth + 1)?;
    writeln!(f, "{}}}", pad)
}
