// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI command implementations.

pub mod phase;
pub mod repl;
pub mod run;

use std::process;

use mcscript_ast::Program;
use mcscript_lexer::Lexer;
use mcscript_parser::Parser;

use crate::{output, show_error};

/// Read a script or exit with an error.
fn load(path: &str) -> String {
    match mcscript_interp::read_source(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: {}", output::error_label(), err);
            process::exit(1);
        }
    }
}

/// Lex and parse, showing every error against `source`.
///
/// Returns the error count on failure.
fn frontend(source: &str) -> Result<Program, usize> {
    let lexed = Lexer::new(source).tokenize();
    if !lexed.is_ok() {
        for error in &lexed.errors {
            show_error(source, error.span.start, &error.message, error.hint.as_deref());
        }
        return Err(lexed.errors.len());
    }

    let parsed = Parser::new(lexed.tokens).parse();
    if !parsed.is_ok() {
        for error in &parsed.errors {
            show_error(source, error.span.start, &error.message, error.hint.as_deref());
        }
        return Err(parsed.errors.len());
    }

    Ok(parsed.program)
}
