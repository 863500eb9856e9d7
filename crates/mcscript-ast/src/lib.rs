// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax tree types for McScript.
//!
//! This crate defines the nodes shared between the lexer, parser and
//! evaluator. Every node renders back to canonical source through
//! `Display`, which diagnostics and tests rely on.

pub mod span;
pub mod token;
pub mod expr;
pub mod stmt;

pub use span::{LineMap, Span};
pub use expr::{Expr, ExprKind, InfixOp, PrefixOp};
pub use stmt::{Block, Program, Stmt, StmtKind};

/// Unique identifier for syntax tree nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    pub const DUMMY: NodeId = NodeId(u32::MAX);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr(kind: ExprKind) -> Expr {
        Expr { id: NodeId::DUMMY, kind, span: Span::new(0, 0) }
    }

    fn int(n: i64) -> Expr {
        expr(ExprKind::Int(n))
    }

    fn ident(name: &str) -> Expr {
        expr(ExprKind::Ident(name.to_string()))
    }

    fn stmt(kind: StmtKind) -> Stmt {
        Stmt { id: NodeId::DUMMY, kind, span: Span::new(0, 0) }
    }

    #[test]
    fn infix_renders_fully_parenthesized() {
        let product = expr(ExprKind::Infix {
            op: InfixOp::Mul,
            left: Box::new(int(2)),
            right: Box::new(int(3)),
        });
        let sum = expr(ExprKind::Infix {
            op: InfixOp::Add,
            left: Box::new(int(1)),
            right: Box::new(product),
        });
        assert_eq!(sum.to_string(), "(1 + (2 * 3))");
    }

    #[test]
    fn var_statement_round_trip() {
        let program = Program {
            statements: vec![stmt(StmtKind::Var {
                name: "myVar".to_string(),
                value: ident("anotherVar"),
            })],
        };
        assert_eq!(program.to_string(), "var myVar = anotherVar;");
    }

    #[test]
    fn prefix_index_and_call() {
        let neg = expr(ExprKind::Prefix { op: PrefixOp::Neg, operand: Box::new(ident("a")) });
        assert_eq!(neg.to_string(), "(-a)");

        let index = expr(ExprKind::Index {
            target: Box::new(ident("arr")),
            index: Box::new(int(1)),
        });
        assert_eq!(index.to_string(), "(arr[1])");

        let call = expr(ExprKind::Call {
            callee: Box::new(ident("add")),
            args: vec![int(1), index],
        });
        assert_eq!(call.to_string(), "add(1, (arr[1]))");
    }

    #[test]
    fn string_literal_is_quoted_and_escaped() {
        let s = expr(ExprKind::String("say \"hi\"\n".to_string()));
        assert_eq!(s.to_string(), r#""say \"hi\"\n""#);
    }

    #[test]
    fn token_literals() {
        assert_eq!(int(42).token_literal(), "42");
        assert_eq!(expr(ExprKind::Bool(true)).token_literal(), "true");
        let ret = stmt(StmtKind::Return(int(1)));
        assert_eq!(ret.token_literal(), "return");
    }
}
