// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Host-level errors.
//!
//! Script failures are runtime values ([`Object::Error`](crate::Object::Error)),
//! not Rust errors. The types here cover what goes wrong around evaluation.

use std::path::PathBuf;

use mcscript_lexer::LexError;
use mcscript_parser::ParseError;
use thiserror::Error;

use crate::object::ObjectId;

/// Failure to turn source text into a program.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{} lex error(s)", .0.len())]
    Lex(Vec<LexError>),
    #[error("{} parse error(s)", .0.len())]
    Parse(Vec<ParseError>),
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Misuse of an object handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    #[error("object {0:?} has already been reclaimed")]
    Stale(ObjectId),
    #[error("object {0:?} is pinned and cannot be modified")]
    Immutable(ObjectId),
}
