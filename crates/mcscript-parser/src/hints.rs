// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.

use mcscript_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on context.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        // Block hints
        ("'{'", _) => Some("blocks start with '{'"),
        ("'}'", _) => Some("every '{' needs a matching '}'"),

        // Parentheses hints
        ("'('", _) => Some("function literals and calls need parentheses"),
        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("')'", _) => None,

        // Bracket hints
        ("']'", TokenKind::Eof) => Some("add ']' to close the bracket"),
        ("']'", _) => None,

        // Assignment
        ("'='", TokenKind::EqEq) => Some("use '=' to bind a value, '==' to compare"),

        // Operator hints
        ("operator like '+' or '-'", _) => Some("expected a binary operator"),

        // Expression hints
        ("expression", TokenKind::Eq) => Some("put the value after '='"),
        ("expression", TokenKind::Semi) => Some("statement is incomplete"),
        ("expression", TokenKind::Eof) => Some("input ended in the middle of an expression"),
        ("expression", _) => Some("try a value, variable, or function call"),

        // Name hints
        ("a name", TokenKind::Int(_)) => Some("names can't start with a number"),
        ("a name", TokenKind::Var | TokenKind::Function | TokenKind::If | TokenKind::Else
            | TokenKind::Return | TokenKind::For | TokenKind::Bool(_)) => {
            Some("keywords can't be used as names")
        }
        ("a name", _) => Some("names start with a letter or '_'"),

        // Statement terminator
        ("';'", _) => Some("separate the parts of a for loop with ';'"),

        _ => None,
    }
}
