// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! McScript runtime: objects, environments, the evaluator and the
//! reference-counting collector.

pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod heap;
pub mod object;

use std::path::Path;

use mcscript_ast::Program;
use mcscript_lexer::Lexer;
use mcscript_parser::Parser;

pub use builtins::{BuiltinFn, Builtins};
pub use config::EvalConfig;
pub use env::Environment;
pub use error::{HeapError, RunError};
pub use eval::{Evaluator, Node, Unwind};
pub use heap::Heap;
pub use object::{Builtin, Function, Object, ObjectId, ObjectType};

/// Lex and parse `source`, failing on the first stage that reports errors.
pub fn parse_source(source: &str) -> Result<Program, RunError> {
    let lexed = Lexer::new(source).tokenize();
    if !lexed.is_ok() {
        return Err(RunError::Lex(lexed.errors));
    }
    let parsed = Parser::new(lexed.tokens).parse();
    if !parsed.is_ok() {
        return Err(RunError::Parse(parsed.errors));
    }
    Ok(parsed.program)
}

/// Read a script from disk.
pub fn read_source(path: impl AsRef<Path>) -> Result<String, RunError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| RunError::Io {
        path: path.to_path_buf(),
        source,
    })
}
