//! Statement nodes.

use std::fmt;

use crate::expr::Expr;
use crate::{NodeId, Span};

/// Root of a parsed evaluation unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// A brace-delimited statement list.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// A statement in the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub id: NodeId,
    pub kind: StmtKind,
    pub span: Span,
}

/// The kind of statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `var name = value;`
    Var {
        name: String,
        value: Expr,
    },
    /// `return value;`
    Return(Expr),
    /// Expression statement
    Expr(Expr),
    /// `for (init; condition; post) body`
    For {
        init: Box<Stmt>,
        condition: Expr,
        post: Expr,
        body: Block,
    },
    /// Nested block
    Block(Block),
}

impl Stmt {
    /// The source token that introduces this statement.
    pub fn token_literal(&self) -> String {
        match &self.kind {
            StmtKind::Var { .. } => "var".to_string(),
            StmtKind::Return(_) => "return".to_string(),
            StmtKind::Expr(expr) => expr.token_literal(),
            StmtKind::For { .. } => "for".to_string(),
            StmtKind::Block(_) => "{".to_string(),
        }
    }
}

impl Program {
    pub fn token_literal(&self) -> String {
        self.statements.first().map(Stmt::token_literal).unwrap_or_default()
    }
}

impl Block {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Renders the block with its braces.
    pub fn braced(&self) -> Braced<'_> {
        Braced(self)
    }
}

/// `Display` adapter that wraps a block in `{ ... }`.
pub struct Braced<'a>(&'a Block);

impl fmt::Display for Braced<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("{}")
        } else {
            write!(f, "{{ {} }}", self.0)
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            StmtKind::Var { name, value } => write!(f, "var {} = {};", name, value),
            StmtKind::Return(value) => write!(f, "return {};", value),
            StmtKind::Expr(expr) => write!(f, "{}", expr),
            StmtKind::For { init, condition, post, body } => {
                write!(f, "for ({} {}; {}) {}", init, condition, post, body.braced())
            }
            StmtKind::Block(block) => write!(f, "{}", block.braced()),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}
