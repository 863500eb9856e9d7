// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression nodes.

use std::fmt;

use crate::stmt::Block;
use crate::{NodeId, Span};

/// An expression in the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Identifier
    Ident(String),
    /// Integer literal
    Int(i64),
    /// String literal
    String(String),
    /// Boolean literal
    Bool(bool),
    /// Prefix operation (`!x`, `-x`)
    Prefix {
        op: PrefixOp,
        operand: Box<Expr>,
    },
    /// Binary operation
    Infix {
        op: InfixOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `if (cond) { ... } else { ... }`
    If {
        condition: Box<Expr>,
        consequence: Block,
        alternative: Option<Block>,
    },
    /// Function literal
    Function {
        params: Vec<String>,
        body: Block,
    },
    /// Function call
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// Array literal
    Array(Vec<Expr>),
    /// Index access
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    /// Assignment. The target is checked at runtime.
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixOp {
    Not,
    Neg,
}

impl PrefixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Neg => "-",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Eq,
    Ne,
}

impl InfixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Lt => "<",
            InfixOp::Gt => ">",
            InfixOp::Eq => "==",
            InfixOp::Ne => "!=",
        }
    }
}

impl fmt::Display for PrefixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Expr {
    /// The source token that introduces this expression.
    pub fn token_literal(&self) -> String {
        match &self.kind {
            ExprKind::Ident(name) => name.clone(),
            ExprKind::Int(n) => n.to_string(),
            ExprKind::String(s) => s.clone(),
            ExprKind::Bool(b) => b.to_string(),
            ExprKind::Prefix { op, .. } => op.as_str().to_string(),
            ExprKind::Infix { op, .. } => op.as_str().to_string(),
            ExprKind::If { .. } => "if".to_string(),
            ExprKind::Function { .. } => "function".to_string(),
            ExprKind::Call { .. } => "(".to_string(),
            ExprKind::Assign { .. } => "=".to_string(),
            ExprKind::Array(_) | ExprKind::Index { .. } => "[".to_string(),
        }
    }
}

/// Writes `items` separated by `", "`.
fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\0' => f.write_str("\\0")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Ident(name) => f.write_str(name),
            ExprKind::Int(n) => write!(f, "{}", n),
            ExprKind::String(s) => write_quoted(f, s),
            ExprKind::Bool(b) => write!(f, "{}", b),
            ExprKind::Prefix { op, operand } => write!(f, "({}{})", op, operand),
            ExprKind::Infix { op, left, right } => write!(f, "({} {} {})", left, op, right),
            ExprKind::If { condition, consequence, alternative } => {
                write!(f, "if ({}) {}", condition, consequence.braced())?;
                if let Some(alt) = alternative {
                    write!(f, " else {}", alt.braced())?;
                }
                Ok(())
            }
            ExprKind::Function { params, body } => {
                f.write_str("function(")?;
                write_list(f, params)?;
                write!(f, ") {}", body.braced())
            }
            ExprKind::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                write_list(f, args)?;
                f.write_str(")")
            }
            ExprKind::Array(elements) => {
                f.write_str("[")?;
                write_list(f, elements)?;
                f.write_str("]")
            }
            ExprKind::Index { target, index } => write!(f, "({}[{}])", target, index),
            ExprKind::Assign { target, value } => write!(f, "{} = {}", target, value),
        }
    }
}
