// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The evaluator.
//!
//! A tree-walk evaluator over the syntax tree. Every value it produces is
//! allocated in the [`Heap`]; bindings and array slots keep reference
//! counts current so the collector can run between top-level statements.
//!
//! Errors and `return` both travel up the Rust stack as [`Unwind`]. A call
//! boundary stops a `return`; an error keeps going until the program level,
//! where it becomes the result.

mod call;
mod eval_expr;
mod exec_stmt;
mod operators;

use std::sync::{Arc, Mutex, PoisonError};

use indexmap::IndexMap;
use mcscript_ast::{Block, Expr, Program, Stmt};
use tracing::trace;

use crate::builtins::Builtins;
use crate::config::EvalConfig;
use crate::env::Environment;
use crate::error::RunError;
use crate::heap::Heap;
use crate::object::{Builtin, Object, ObjectId};

/// Control flow leaving an expression early.
///
/// Holds either an `Error` or a `ReturnValue` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unwind(pub ObjectId);

pub(crate) type EvalResult = Result<ObjectId, Unwind>;

/// Anything the evaluator can be pointed at.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Block(&'a Block),
    Statement(&'a Stmt),
    Expression(&'a Expr),
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(program: &'a Program) -> Self {
        Node::Program(program)
    }
}

impl<'a> From<&'a Block> for Node<'a> {
    fn from(block: &'a Block) -> Self {
        Node::Block(block)
    }
}

impl<'a> From<&'a Stmt> for Node<'a> {
    fn from(stmt: &'a Stmt) -> Self {
        Node::Statement(stmt)
    }
}

impl<'a> From<&'a Expr> for Node<'a> {
    fn from(expr: &'a Expr) -> Self {
        Node::Expression(expr)
    }
}

/// Evaluator state: the object heap, the built-in table and call bookkeeping.
pub struct Evaluator {
    heap: Heap,
    builtins: IndexMap<String, ObjectId>,
    config: EvalConfig,
    call_depth: usize,
    /// Optional output buffer for capturing `print` (used in tests).
    output_buffer: Option<Arc<Mutex<String>>>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self::with_builtins(config, Builtins::standard())
    }

    /// Create an evaluator with a custom built-in table.
    pub fn with_builtins(config: EvalConfig, table: Builtins) -> Self {
        let mut heap = Heap::new();
        let builtins = table
            .iter()
            .map(|(name, func)| {
                let id = heap.pin(Object::BuiltIn(Builtin { name: name.to_string(), func }));
                (name.to_string(), id)
            })
            .collect();
        Evaluator {
            heap,
            builtins,
            config,
            call_depth: 0,
            output_buffer: None,
        }
    }

    /// Send `print` output to a shared buffer instead of stdout.
    pub fn capture_output(&mut self) -> Arc<Mutex<String>> {
        let buffer = Arc::new(Mutex::new(String::new()));
        self.output_buffer = Some(Arc::clone(&buffer));
        buffer
    }

    pub fn with_captured_output(mut self) -> (Self, Arc<Mutex<String>>) {
        let buffer = self.capture_output();
        (self, buffer)
    }

    /// Write to the capture buffer if set, otherwise to stdout.
    pub fn write_output(&self, text: &str) {
        match &self.output_buffer {
            Some(buffer) => buffer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_str(text),
            None => print!("{}", text),
        }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    /// Track a new object.
    pub fn alloc(&mut self, object: Object) -> ObjectId {
        self.heap.track(object)
    }

    /// Track a new error object.
    pub fn new_error(&mut self, message: impl Into<String>) -> ObjectId {
        self.heap.track(Object::Error(message.into()))
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) -> Unwind {
        Unwind(self.new_error(message))
    }

    pub fn inspect(&self, id: ObjectId) -> String {
        self.heap.inspect(id)
    }

    /// Type name for error messages. Reclaimed objects read as `NULL`.
    pub fn type_name(&self, id: ObjectId) -> &'static str {
        self.heap.type_of(id).map_or("NULL", |ty| ty.name())
    }

    pub fn is_error(&self, id: ObjectId) -> bool {
        matches!(self.heap.get(id), Some(Object::Error(_)))
    }

    /// The pinned object for a built-in name.
    pub fn builtin(&self, name: &str) -> Option<ObjectId> {
        self.builtins.get(name).copied()
    }

    /// Evaluate a node in `env`.
    ///
    /// Script errors come back as an `Error` object, never as a Rust error.
    /// A `return` escaping the node yields its value.
    pub fn eval<'a>(&mut self, node: impl Into<Node<'a>>, env: &Environment) -> ObjectId {
        let outcome = match node.into() {
            Node::Program(program) => return self.eval_program(program, env),
            Node::Block(block) => self.exec_block(block, env),
            Node::Statement(stmt) => self.exec_stmt(stmt, env),
            Node::Expression(expr) => self.eval_expr(expr, env),
        };
        match outcome {
            Ok(id) | Err(Unwind(id)) => self.unwrap_return(id),
        }
    }

    /// Parse `source` and evaluate it as a program.
    pub fn run(&mut self, source: &str, env: &Environment) -> Result<ObjectId, RunError> {
        let program = crate::parse_source(source)?;
        Ok(self.eval(&program, env))
    }

    /// Collect if the tracked-object count exceeds the configured threshold.
    /// Returns the number of objects freed.
    pub fn maybe_collect(&mut self) -> usize {
        match self.config.gc_threshold {
            Some(threshold) if self.heap.num_objects() > threshold => {
                trace!(threshold, objects = self.heap.num_objects(), "gc threshold exceeded");
                self.heap.collect()
            }
            _ => 0,
        }
    }

    pub fn collect(&mut self) -> usize {
        self.heap.collect()
    }

    /// Free every tracked object. Call once when evaluation is finished.
    pub fn collect_all(&mut self) -> usize {
        self.heap.collect_all()
    }

    pub fn num_objects(&self) -> usize {
        self.heap.num_objects()
    }

    /// The value carried by a `ReturnValue`, or `id` itself.
    fn unwrap_return(&self, id: ObjectId) -> ObjectId {
        match self.heap.get(id) {
            Some(Object::ReturnValue(inner)) => *inner,
            _ => id,
        }
    }
}
