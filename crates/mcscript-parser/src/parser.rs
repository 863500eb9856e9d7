// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation using Pratt parsing for expressions.

use mcscript_ast::expr::{Expr, ExprKind, InfixOp, PrefixOp};
use mcscript_ast::stmt::{Block, Program, Stmt, StmtKind};
use mcscript_ast::token::{Token, TokenKind};
use mcscript_ast::{NodeId, Span};
use mcscript_stack::ensure_sufficient_stack;

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// Maximum nesting of blocks, operands and postfix chains.
///
/// Bounds the height of every tree the parser hands out, so rendering,
/// evaluating and dropping a tree stay within the host stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// The parser for McScript source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Collected errors during parsing
    errors: Vec<ParseError>,
    /// Counter for generating unique NodeIds
    next_node_id: u32,
    /// Current nesting level, checked against `MAX_NESTING_DEPTH`
    depth: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(Token { kind: TokenKind::Eof, .. })) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token { kind: TokenKind::Eof, span: Span::new(end, end) });
        }
        Self { tokens, pos: 0, errors: Vec::new(), next_node_id: 0, depth: 0 }
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Record error, return if should continue.
    fn record_error(&mut self, error: ParseError) -> bool {
        self.errors.push(error);
        self.errors.len() < MAX_ERRORS
    }

    /// Go one nesting level deeper. The caller restores the level.
    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(ParseError {
                span: self.current().span,
                message: format!("Nesting too deep (max depth: {})", MAX_NESTING_DEPTH),
                hint: Some("split the expression into smaller var statements".to_string()),
            });
        }
        Ok(())
    }

    /// Run `f` one nesting level deeper, restoring the level afterwards.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = self.depth;
        let result = self.enter().and_then(|()| ensure_sufficient_stack(|| f(self)));
        self.depth = saved;
        result
    }

    /// Skip to the start of the next statement after an error.
    fn synchronize(&mut self) {
        let mut brace_depth = 0usize;
        let start = self.pos;

        while !self.at_end() {
            match self.current_kind() {
                TokenKind::Semi if brace_depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::LBrace => brace_depth += 1,
                TokenKind::RBrace => {
                    if brace_depth <= 1 {
                        self.advance();
                        return;
                    }
                    brace_depth -= 1;
                }
                TokenKind::Var | TokenKind::Return | TokenKind::For
                    if brace_depth == 0 && self.pos > start =>
                {
                    return;
                }
                _ => {}
            }
            self.advance();
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        // `new` guarantees a trailing Eof, so the vector is never empty.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    /// End offset of the most recently consumed token.
    fn prev_end(&self) -> usize {
        match self.pos.checked_sub(1) {
            Some(i) => self.tokens[i].span.end,
            None => self.current().span.start,
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        if self.check(kind) {
            let span = self.current().span;
            self.advance();
            Ok(span)
        } else {
            Err(ParseError::expected(
                kind.display_name(),
                self.current_kind(),
                self.current().span,
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(ParseError::expected("a name", &other, self.current().span)),
        }
    }

    // =========================================================================
    // Top-Level Parsing
    // =========================================================================

    pub fn parse(&mut self) -> ParseResult {
        let mut statements = Vec::new();

        while !self.at_end() {
            self.depth = 0;
            match self.parse_stmt() {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize();
                }
            }
        }

        ParseResult {
            program: Program { statements },
            errors: std::mem::take(&mut self.errors),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.current().span.start;

        let kind = match self.current_kind() {
            TokenKind::Var => {
                let kind = self.parse_var_binding()?;
                self.match_token(&TokenKind::Semi);
                kind
            }
            TokenKind::Return => {
                self.advance();
                let value = self.parse_expr()?;
                self.match_token(&TokenKind::Semi);
                StmtKind::Return(value)
            }
            TokenKind::For => self.parse_for_stmt()?,
            TokenKind::LBrace => StmtKind::Block(self.parse_block()?),
            _ => {
                let expr = self.parse_expr()?;
                self.match_token(&TokenKind::Semi);
                StmtKind::Expr(expr)
            }
        };

        Ok(Stmt {
            id: self.next_id(),
            kind,
            span: Span::new(start, self.prev_end()),
        })
    }

    /// `var <name> = <expr>` without the terminator.
    fn parse_var_binding(&mut self) -> Result<StmtKind, ParseError> {
        self.expect(&TokenKind::Var)?;
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Eq)
            .map_err(|e| e.with_hint("variables are declared as: var name = value"))?;
        let value = self.parse_expr()?;
        Ok(StmtKind::Var { name, value })
    }

    /// `for (var i = 0; <cond>; <post>) { ... }`
    fn parse_for_stmt(&mut self) -> Result<StmtKind, ParseError> {
        self.expect(&TokenKind::For)?;
        self.expect(&TokenKind::LParen)?;

        let init_start = self.current().span.start;
        let init_kind = self.parse_var_binding().map_err(|e| {
            e.with_hint("a for loop starts with a var statement: for (var i = 0; ...)")
        })?;
        self.expect(&TokenKind::Semi)?;
        let init = Stmt {
            id: self.next_id(),
            kind: init_kind,
            span: Span::new(init_start, self.prev_end()),
        };

        let condition = self.parse_expr()?;
        self.expect(&TokenKind::Semi)?;
        let post = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block()?;

        Ok(StmtKind::For { init: Box::new(init), condition, post, body })
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.nested(Self::parse_block_inner)
    }

    fn parse_block_inner(&mut self) -> Result<Block, ParseError> {
        let start = self.expect(&TokenKind::LBrace)?.start;
        let mut statements = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            statements.push(self.parse_stmt()?);
        }

        self.expect(&TokenKind::RBrace)?;
        Ok(Block { statements, span: Span::new(start, self.prev_end()) })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        self.nested(|p| p.parse_expr_bp_inner(min_bp))
    }

    fn parse_expr_bp_inner(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let start = self.current().span.start;
        let mut lhs = self.parse_prefix()?;

        loop {
            if self.check(&TokenKind::LParen) || self.check(&TokenKind::LBracket) {
                if Self::POSTFIX_BP < min_bp { break; }
                self.enter()?;
                lhs = self.parse_postfix(lhs, start)?;
                continue;
            }

            if self.check(&TokenKind::Eq) {
                let (l_bp, r_bp) = Self::ASSIGN_BP;
                if l_bp < min_bp { break; }
                self.enter()?;
                self.advance();
                let value = self.parse_expr_bp(r_bp)?;
                lhs = Expr {
                    id: self.next_id(),
                    kind: ExprKind::Assign { target: Box::new(lhs), value: Box::new(value) },
                    span: Span::new(start, self.prev_end()),
                };
                continue;
            }

            if let Some((l_bp, r_bp)) = self.infix_bp() {
                if l_bp < min_bp { break; }
                self.enter()?;

                let op = self.parse_infix_op()?;
                let rhs = self.parse_expr_bp(r_bp)?;
                lhs = Expr {
                    id: self.next_id(),
                    kind: ExprKind::Infix { op, left: Box::new(lhs), right: Box::new(rhs) },
                    span: Span::new(start, self.prev_end()),
                };
                continue;
            }

            break;
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let start = self.current().span.start;

        let kind = match self.current_kind().clone() {
            TokenKind::Int(n) => {
                self.advance();
                ExprKind::Int(n)
            }
            TokenKind::String(s) => {
                self.advance();
                ExprKind::String(s)
            }
            TokenKind::Bool(b) => {
                self.advance();
                ExprKind::Bool(b)
            }
            TokenKind::Ident(name) => {
                self.advance();
                ExprKind::Ident(name)
            }
            TokenKind::Bang | TokenKind::Minus => {
                let op = if self.check(&TokenKind::Bang) { PrefixOp::Not } else { PrefixOp::Neg };
                self.advance();
                let operand = self.parse_expr_bp(Self::PREFIX_BP)?;
                ExprKind::Prefix { op, operand: Box::new(operand) }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                // Grouping only affects tree shape; keep the inner node.
                return Ok(inner);
            }
            TokenKind::If => return self.parse_if_expr(),
            TokenKind::Function => return self.parse_function_literal(),
            TokenKind::LBracket => {
                self.advance();
                let elements = self.parse_expr_list(&TokenKind::RBracket)?;
                ExprKind::Array(elements)
            }
            other => {
                return Err(ParseError::expected("expression", &other, self.current().span));
            }
        };

        Ok(Expr { id: self.next_id(), kind, span: Span::new(start, self.prev_end()) })
    }

    fn parse_postfix(&mut self, lhs: Expr, start: usize) -> Result<Expr, ParseError> {
        let kind = if self.match_token(&TokenKind::LParen) {
            let args = self.parse_expr_list(&TokenKind::RParen)?;
            ExprKind::Call { callee: Box::new(lhs), args }
        } else {
            self.expect(&TokenKind::LBracket)?;
            let index = self.parse_expr()?;
            self.expect(&TokenKind::RBracket)?;
            ExprKind::Index { target: Box::new(lhs), index: Box::new(index) }
        };

        Ok(Expr { id: self.next_id(), kind, span: Span::new(start, self.prev_end()) })
    }

    /// Comma-separated expressions up to and including `close`.
    fn parse_expr_list(&mut self, close: &TokenKind) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        if self.match_token(close) {
            return Ok(items);
        }

        loop {
            items.push(self.parse_expr()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(close)?;
        Ok(items)
    }

    fn parse_if_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&TokenKind::If)?.start;
        self.expect(&TokenKind::LParen)
            .map_err(|e| e.with_hint("conditions are written in parentheses: if (x) { ... }"))?;
        let condition = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let consequence = self.parse_block()?;

        let alternative = if self.match_token(&TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(Expr {
            id: self.next_id(),
            kind: ExprKind::If { condition: Box::new(condition), consequence, alternative },
            span: Span::new(start, self.prev_end()),
        })
    }

    fn parse_function_literal(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&TokenKind::Function)?.start;
        self.expect(&TokenKind::LParen)?;

        let mut params = Vec::new();
        if !self.match_token(&TokenKind::RParen) {
            loop {
                params.push(self.expect_ident()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RParen)?;
        }

        let body = self.parse_block()?;
        Ok(Expr {
            id: self.next_id(),
            kind: ExprKind::Function { params, body },
            span: Span::new(start, self.prev_end()),
        })
    }

    // =========================================================================
    // Binding Powers
    // =========================================================================

    const ASSIGN_BP: (u8, u8) = (2, 1);
    const PREFIX_BP: u8 = 11;
    const POSTFIX_BP: u8 = 13;

    fn infix_bp(&self) -> Option<(u8, u8)> {
        match self.current_kind() {
            TokenKind::EqEq | TokenKind::BangEq => Some((3, 4)),
            TokenKind::Lt | TokenKind::Gt => Some((5, 6)),
            TokenKind::Plus | TokenKind::Minus => Some((7, 8)),
            TokenKind::Star | TokenKind::Slash => Some((9, 10)),
            _ => None,
        }
    }

    fn parse_infix_op(&mut self) -> Result<InfixOp, ParseError> {
        let op = match self.current_kind() {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Sub,
            TokenKind::Star => InfixOp::Mul,
            TokenKind::Slash => InfixOp::Div,
            TokenKind::Lt => InfixOp::Lt,
            TokenKind::Gt => InfixOp::Gt,
            TokenKind::EqEq => InfixOp::Eq,
            TokenKind::BangEq => InfixOp::Ne,
            _ => return Err(ParseError::expected(
                "operator like '+' or '-'",
                self.current_kind(),
                self.current().span,
            )),
        };
        self.advance();
        Ok(op)
    }
}

/// Result of parsing: the program plus any errors found.
#[derive(Debug)]
pub struct ParseResult {
    pub program: Program,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Returns true if parsing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        let message = format_expected_message(expected, found);
        let hint = crate::hints::for_expected(expected, found).map(String::from);
        Self { span, message, hint }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Format a user-friendly "expected X, found Y" message.
fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    match expected {
        "'{'" => format!("Expected '{{' to start block, found {}", found.display_name()),
        "'}'" => {
            if matches!(found, TokenKind::Eof) {
                "Unclosed '{' - missing '}'".to_string()
            } else {
                format!("Expected '}}' to close block, found {}", found.display_name())
            }
        }
        "')'" => {
            if matches!(found, TokenKind::Eof) {
                "Unclosed '(' - missing ')'".to_string()
            } else {
                format!("Expected ')', found {}", found.display_name())
            }
        }
        "']'" => {
            if matches!(found, TokenKind::Eof) {
                "Unclosed '[' - missing ']'".to_string()
            } else {
                format!("Expected ']', found {}", found.display_name())
            }
        }
        "a name" => format!("Expected name, found {}", found.display_name()),
        "expression" => format!("Expected expression, found {}", found.display_name()),
        _ => format!("Expected {}, found {}", expected, found.display_name()),
    }
}
