// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Built-in functions available to every script.

use indexmap::IndexMap;

use crate::eval::Evaluator;
use crate::heap::Heap;
use crate::object::{Object, ObjectId};

/// Signature of a native function.
///
/// Failures are reported by returning an error object, usually built with
/// [`Evaluator::new_error`].
pub type BuiltinFn = fn(&mut Evaluator, &[ObjectId]) -> ObjectId;

/// Name-to-function table consulted after the environment chain.
#[derive(Debug, Clone, Default)]
pub struct Builtins {
    table: IndexMap<String, BuiltinFn>,
}

impl Builtins {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// `len`, `push` and `print`.
    pub fn standard() -> Self {
        Builtins::new()
            .with("len", builtin_len)
            .with("push", builtin_push)
            .with("print", builtin_print)
    }

    pub fn with(mut self, name: impl Into<String>, func: BuiltinFn) -> Self {
        self.register(name, func);
        self
    }

    /// Add or replace a function.
    pub fn register(&mut self, name: impl Into<String>, func: BuiltinFn) {
        self.table.insert(name.into(), func);
    }

    pub fn get(&self, name: &str) -> Option<BuiltinFn> {
        self.table.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, BuiltinFn)> {
        self.table.iter().map(|(name, &func)| (name.as_str(), func))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn wrong_arity(eval: &mut Evaluator, got: usize, want: usize) -> ObjectId {
    eval.new_error(format!("wrong number of arguments. got={}, want={}", got, want))
}

/// `len(x)`: length of a string or array.
fn builtin_len(eval: &mut Evaluator, args: &[ObjectId]) -> ObjectId {
    let [arg] = args else {
        return wrong_arity(eval, args.len(), 1);
    };
    let length = match eval.heap().get(*arg) {
        Some(Object::String(s)) => s.chars().count(),
        Some(Object::Array(elements)) => elements.len(),
        _ => {
            let message = format!("argument to `len` not supported, got {}", eval.type_name(*arg));
            return eval.new_error(message);
        }
    };
    eval.alloc(Object::Integer(length as i64))
}

/// `push(arr, v)`: append in place and return the array.
fn builtin_push(eval: &mut Evaluator, args: &[ObjectId]) -> ObjectId {
    let &[array, value] = args else {
        return wrong_arity(eval, args.len(), 2);
    };
    let pushed = match eval.heap_mut().try_get_mut(array) {
        Ok(Object::Array(elements)) => {
            elements.push(value);
            true
        }
        _ => false,
    };
    if !pushed {
        let message = format!("argument to `push` must be ARRAY, got {}", eval.type_name(array));
        return eval.new_error(message);
    }
    eval.heap_mut().add_ref(value);
    array
}

/// `print(...)`: write the arguments separated by spaces, then a newline.
fn builtin_print(eval: &mut Evaluator, args: &[ObjectId]) -> ObjectId {
    let line = args
        .iter()
        .map(|&id| eval.heap().inspect(id))
        .collect::<Vec<_>>()
        .join(" ");
    eval.write_output(&format!("{}\n", line));
    Heap::NULL
}
