// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runtime values.
//!
//! Every value lives in the [`Heap`](crate::Heap) and is referred to by an
//! [`ObjectId`]. Arrays, functions and environments hold ids, never the
//! objects themselves, so the collector remains the single owner of all
//! object storage.

use std::fmt;
use std::rc::Rc;

use mcscript_ast::Block;

use crate::builtins::BuiltinFn;
use crate::env::Environment;

/// Handle to a heap object.
///
/// The generation distinguishes successive occupants of the same slot, so a
/// handle to a reclaimed object never resolves to whatever reuses its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// The type tag of an object. Never changes after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Integer,
    Boolean,
    Null,
    String,
    Array,
    Function,
    BuiltIn,
    ReturnValue,
    Error,
}

impl ObjectType {
    /// Name used in runtime error messages.
    pub fn name(self) -> &'static str {
        match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::Null => "NULL",
            ObjectType::String => "STRING",
            ObjectType::Array => "ARRAY",
            ObjectType::Function => "FUNCTION",
            ObjectType::BuiltIn => "BUILT_IN",
            ObjectType::ReturnValue => "RETURN_VALUE",
            ObjectType::Error => "ERROR",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    /// Only the two canonical singletons exist.
    Boolean(bool),
    /// Only the canonical singleton exists.
    Null,
    String(String),
    Array(Vec<ObjectId>),
    Function(Function),
    BuiltIn(Builtin),
    /// Transient wrapper carrying a `return` out of nested blocks.
    ReturnValue(ObjectId),
    Error(String),
}

impl Object {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Null => ObjectType::Null,
            Object::String(_) => ObjectType::String,
            Object::Array(_) => ObjectType::Array,
            Object::Function(_) => ObjectType::Function,
            Object::BuiltIn(_) => ObjectType::BuiltIn,
            Object::ReturnValue(_) => ObjectType::ReturnValue,
            Object::Error(_) => ObjectType::Error,
        }
    }
}

/// A user-defined function together with the scope it closes over.
#[derive(Debug, Clone)]
pub struct Function {
    pub params: Rc<[String]>,
    pub body: Rc<Block>,
    pub env: Environment,
}

impl Function {
    /// `function(x, y) {\n<body>\n}`
    pub fn inspect(&self) -> String {
        format!("function({}) {{\n{}\n}}", self.params.join(", "), self.body)
    }
}

/// A native function exposed to scripts.
#[derive(Debug, Clone)]
pub struct Builtin {
    pub name: String,
    pub func: BuiltinFn,
}
