//! Scope frames for variable bindings and closure capture.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::object::ObjectId;

/// A single scope frame.
#[derive(Debug, Default)]
struct Scope {
    bindings: IndexMap<String, ObjectId>,
    outer: Option<Environment>,
}

/// A shared handle to a scope frame and, through it, its enclosing frames.
///
/// Cloning the handle shares the frame. Functions keep a clone of the frame
/// they were created in; every inner frame keeps its outer frame alive.
#[derive(Debug, Clone, Default)]
pub struct Environment(Rc<RefCell<Scope>>);

impl Environment {
    /// Create a new top-level environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame enclosed by `outer`.
    pub fn new_child(outer: &Environment) -> Self {
        Environment(Rc::new(RefCell::new(Scope {
            bindings: IndexMap::new(),
            outer: Some(outer.clone()),
        })))
    }

    /// Look up a name, walking outward through enclosing frames.
    pub fn get(&self, name: &str) -> Option<ObjectId> {
        let mut current = self.clone();
        loop {
            let outer = {
                let scope = current.0.borrow();
                if let Some(&id) = scope.bindings.get(name) {
                    return Some(id);
                }
                scope.outer.clone()
            };
            current = outer?;
        }
    }

    /// Look up a name in this frame only.
    pub fn get_local(&self, name: &str) -> Option<ObjectId> {
        self.0.borrow().bindings.get(name).copied()
    }

    /// Bind `name` in this frame, returning the binding it replaced.
    ///
    /// Reference counts are the caller's responsibility.
    pub fn set(&self, name: &str, id: ObjectId) -> Option<ObjectId> {
        self.0.borrow_mut().bindings.insert(name.to_string(), id)
    }

    /// Remove and return every local binding, in declaration order.
    pub fn drain(&self) -> Vec<(String, ObjectId)> {
        self.0.borrow_mut().bindings.drain(..).collect()
    }

    pub fn outer(&self) -> Option<Environment> {
        self.0.borrow().outer.clone()
    }

    /// True when some other handle (a closure or an inner frame) still
    /// refers to this frame.
    pub fn is_shared(&self) -> bool {
        Rc::strong_count(&self.0) > 1
    }

    pub fn len(&self) -> usize {
        self.0.borrow().bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
