// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Object arena and reference-counting collector.
//!
//! The heap owns every runtime object. Counts record how many bindings
//! and array slots refer to an object. [`Heap::collect`] reclaims tracked
//! objects whose count is zero and repeats until nothing else becomes
//! unreferenced. Objects reachable only through a reference cycle stay
//! alive until [`Heap::collect_all`].
//!
//! `true`, `false`, `null` and pinned objects (built-in functions) are
//! exempt: they are never tracked, never counted and never freed.

use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::env::Environment;
use crate::error::HeapError;
use crate::object::{Object, ObjectId, ObjectType};

struct Entry {
    object: Object,
    refs: u32,
    pinned: bool,
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Arena of runtime objects addressed by [`ObjectId`].
pub struct Heap {
    slots: Vec<Slot>,
    free: Vec<u32>,
    tracked: IndexSet<ObjectId>,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    pub const TRUE: ObjectId = ObjectId { index: 0, generation: 0 };
    pub const FALSE: ObjectId = ObjectId { index: 1, generation: 0 };
    pub const NULL: ObjectId = ObjectId { index: 2, generation: 0 };

    pub fn new() -> Self {
        let mut heap = Heap {
            slots: Vec::new(),
            free: Vec::new(),
            tracked: IndexSet::new(),
        };
        heap.insert(Object::Boolean(true), true);
        heap.insert(Object::Boolean(false), true);
        heap.insert(Object::Null, true);
        heap
    }

    /// The canonical boolean singleton.
    pub fn boolean(value: bool) -> ObjectId {
        if value {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }

    /// Register a new object with the collector. Its count starts at zero.
    ///
    /// Booleans and null resolve to the singletons instead of allocating.
    pub fn track(&mut self, object: Object) -> ObjectId {
        match object {
            Object::Boolean(value) => Self::boolean(value),
            Object::Null => Self::NULL,
            object => {
                let id = self.insert(object, false);
                self.tracked.insert(id);
                id
            }
        }
    }

    /// Store an object that lives as long as the heap itself.
    pub fn pin(&mut self, object: Object) -> ObjectId {
        self.insert(object, true)
    }

    fn insert(&mut self, object: Object, pinned: bool) -> ObjectId {
        let entry = Entry { object, refs: 0, pinned };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                ObjectId { index, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, entry: Some(entry) });
                ObjectId { index, generation: 0 }
            }
        }
    }

    fn entry(&self, id: ObjectId) -> Option<&Entry> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    fn entry_mut(&mut self, id: ObjectId) -> Option<&mut Entry> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    /// Resolve a handle. `None` once the object has been reclaimed.
    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.entry(id).map(|entry| &entry.object)
    }

    pub fn try_get(&self, id: ObjectId) -> Result<&Object, HeapError> {
        self.get(id).ok_or(HeapError::Stale(id))
    }

    pub fn try_get_mut(&mut self, id: ObjectId) -> Result<&mut Object, HeapError> {
        match self.entry_mut(id) {
            Some(entry) if entry.pinned => Err(HeapError::Immutable(id)),
            Some(entry) => Ok(&mut entry.object),
            None => Err(HeapError::Stale(id)),
        }
    }

    pub fn type_of(&self, id: ObjectId) -> Option<ObjectType> {
        self.get(id).map(Object::object_type)
    }

    pub fn add_ref(&mut self, id: ObjectId) {
        if let Some(entry) = self.entry_mut(id) {
            if !entry.pinned {
                entry.refs = entry.refs.saturating_add(1);
            }
        }
    }

    /// Decrement a count. Never goes below zero.
    pub fn subtract_ref(&mut self, id: ObjectId) {
        if let Some(entry) = self.entry_mut(id) {
            if !entry.pinned {
                entry.refs = entry.refs.saturating_sub(1);
            }
        }
    }

    /// Current count, or `None` for exempt objects and stale handles.
    pub fn ref_count(&self, id: ObjectId) -> Option<u32> {
        self.entry(id).filter(|entry| !entry.pinned).map(|entry| entry.refs)
    }

    /// True for a live, tracked object that nothing refers to.
    pub fn is_not_referenced(&self, id: ObjectId) -> bool {
        self.entry(id).is_some_and(|entry| !entry.pinned && entry.refs == 0)
    }

    pub fn is_tracked(&self, id: ObjectId) -> bool {
        self.tracked.contains(&id)
    }

    /// Number of tracked objects. Singletons and pinned objects are not
    /// counted.
    pub fn num_objects(&self) -> usize {
        self.tracked.len()
    }

    /// Reclaim every unreferenced tracked object, repeating until a pass
    /// frees nothing. Returns the number of objects freed.
    pub fn collect(&mut self) -> usize {
        let mut freed = 0;
        loop {
            let mut dead: Vec<ObjectId> = self
                .tracked
                .iter()
                .copied()
                .filter(|&id| self.is_not_referenced(id))
                .collect();
            if dead.is_empty() {
                break;
            }
            // Elements dropping to zero join the worklist directly, so a
            // nested chain goes in one pass.
            while let Some(id) = dead.pop() {
                if !self.tracked.swap_remove(&id) {
                    continue;
                }
                if let Some(object) = self.free_slot(id) {
                    freed += 1;
                    self.release_contents(object, &mut dead);
                }
            }
        }
        debug!(freed, remaining = self.tracked.len(), "collected unreferenced objects");
        freed
    }

    /// Reclaim every tracked object regardless of its count, cycles
    /// included. Returns the number of objects freed.
    pub fn collect_all(&mut self) -> usize {
        let ids: Vec<ObjectId> = self.tracked.drain(..).collect();
        for &id in &ids {
            self.free_slot(id);
        }
        debug!(freed = ids.len(), "collected all objects");
        ids.len()
    }

    fn free_slot(&mut self, id: ObjectId) -> Option<Object> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(entry.object)
    }

    /// Drop the references a reclaimed object held.
    fn release_contents(&mut self, object: Object, dead: &mut Vec<ObjectId>) {
        match object {
            Object::Array(elements) => {
                for element in elements {
                    self.subtract_ref(element);
                    if self.is_not_referenced(element) {
                        dead.push(element);
                    }
                }
            }
            Object::Function(function) => self.release_scope(function.env),
            _ => {}
        }
    }

    /// Release the bindings of a scope that is going away.
    ///
    /// Walks outward for as long as each frame has no other owner. A frame
    /// still captured by a closure is left alone; its bindings are released
    /// when the last function holding it is reclaimed.
    pub fn release_scope(&mut self, env: Environment) {
        let mut current = Some(env);
        while let Some(frame) = current {
            if frame.is_shared() {
                trace!(bindings = frame.len(), "scope still captured; release deferred");
                break;
            }
            for (_, id) in frame.drain() {
                self.subtract_ref(id);
            }
            current = frame.outer();
        }
    }

    /// Render an object for display.
    ///
    /// Iterative, so arbitrarily deep array nesting renders without
    /// recursion. An array met again while it is still open renders as
    /// `[...]`.
    pub fn inspect(&self, id: ObjectId) -> String {
        let mut out = String::new();
        let mut open = IndexSet::new();
        let mut pending = vec![Render::Value(id)];

        while let Some(step) = pending.pop() {
            let id = match step {
                Render::Value(id) => id,
                Render::Separator => {
                    out.push_str(", ");
                    continue;
                }
                Render::Close(array) => {
                    out.push(']');
                    open.swap_remove(&array);
                    continue;
                }
            };
            let Some(object) = self.get(id) else {
                out.push_str("<freed>");
                continue;
            };
            match object {
                Object::Integer(value) => out.push_str(&value.to_string()),
                Object::Boolean(value) => out.push_str(if *value { "true" } else { "false" }),
                Object::Null => out.push_str("null"),
                Object::String(value) => out.push_str(value),
                Object::Array(_) if open.contains(&id) => out.push_str("[...]"),
                Object::Array(elements) => {
                    open.insert(id);
                    out.push('[');
                    pending.push(Render::Close(id));
                    for (i, &element) in elements.iter().enumerate().rev() {
                        pending.push(Render::Value(element));
                        if i > 0 {
                            pending.push(Render::Separator);
                        }
                    }
                }
                Object::Function(function) => out.push_str(&function.inspect()),
                Object::BuiltIn(_) => out.push_str("builtin function"),
                Object::ReturnValue(inner) => pending.push(Render::Value(*inner)),
                Object::Error(message) => {
                    out.push_str("ERROR: ");
                    out.push_str(message);
                }
            }
        }
        out
    }
}

/// Work left for `Heap::inspect`.
enum Render {
    Value(ObjectId),
    Separator,
    Close(ObjectId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_are_exempt() {
        let mut heap = Heap::new();
        assert_eq!(heap.track(Object::Boolean(true)), Heap::TRUE);
        assert_eq!(heap.track(Object::Null), Heap::NULL);
        heap.add_ref(Heap::TRUE);
        assert_eq!(heap.ref_count(Heap::TRUE), None);
        assert!(!heap.is_not_referenced(Heap::NULL));
        assert_eq!(heap.num_objects(), 0);
        assert_eq!(heap.collect(), 0);
        assert_eq!(heap.inspect(Heap::FALSE), "false");
    }

    #[test]
    fn counts_saturate_at_zero() {
        let mut heap = Heap::new();
        let id = heap.track(Object::Integer(7));
        heap.subtract_ref(id);
        assert_eq!(heap.ref_count(id), Some(0));
        heap.add_ref(id);
        heap.add_ref(id);
        heap.subtract_ref(id);
        assert_eq!(heap.ref_count(id), Some(1));
        assert!(!heap.is_not_referenced(id));
    }

    #[test]
    fn collect_frees_only_unreferenced_objects() {
        let mut heap = Heap::new();
        let kept = heap.track(Object::Integer(1));
        let dropped = heap.track(Object::Integer(2));
        heap.add_ref(kept);

        assert_eq!(heap.collect(), 1);
        assert!(heap.get(dropped).is_none());
        assert!(heap.is_tracked(kept));
        assert_eq!(heap.collect(), 0);
    }

    #[test]
    fn reclaimed_arrays_release_their_elements() {
        let mut heap = Heap::new();
        let element = heap.track(Object::Integer(1));
        heap.add_ref(element);
        let array = heap.track(Object::Array(vec![element]));

        assert_eq!(heap.collect(), 2);
        assert_eq!(heap.num_objects(), 0);
        assert!(heap.get(array).is_none());
    }

    #[test]
    fn stale_handles_do_not_resolve_after_reuse() {
        let mut heap = Heap::new();
        let old = heap.track(Object::Integer(1));
        heap.collect();
        let new = heap.track(Object::Integer(2));

        assert_eq!(old.index, new.index);
        assert!(heap.get(old).is_none());
        assert!(matches!(heap.try_get(old), Err(HeapError::Stale(_))));
        assert_eq!(heap.inspect(new), "2");
        heap.add_ref(old);
        assert_eq!(heap.ref_count(new), Some(0));
    }

    #[test]
    fn collect_all_frees_cycles() {
        let mut heap = Heap::new();
        let array = heap.track(Object::Array(Vec::new()));
        if let Ok(Object::Array(elements)) = heap.try_get_mut(array) {
            elements.push(array);
        }
        heap.add_ref(array);

        assert_eq!(heap.inspect(array), "[[...]]");
        assert_eq!(heap.collect(), 0);
        assert_eq!(heap.collect_all(), 1);
        assert_eq!(heap.num_objects(), 0);
    }

    #[test]
    fn release_scope_stops_at_captured_frames() {
        let mut heap = Heap::new();
        let global = Environment::new();
        let outer = Environment::new_child(&global);
        let inner = Environment::new_child(&outer);
        let captured = outer.clone();

        let a = heap.track(Object::Integer(1));
        let b = heap.track(Object::Integer(2));
        heap.add_ref(a);
        heap.add_ref(b);
        outer.set("a", a);
        inner.set("b", b);
        drop(outer);

        heap.release_scope(inner);
        assert_eq!(heap.ref_count(b), Some(0));
        assert_eq!(heap.ref_count(a), Some(1));
        assert_eq!(captured.len(), 1);
    }

    #[test]
    fn pinned_objects_are_immutable() {
        let mut heap = Heap::new();
        let id = heap.pin(Object::String("fixed".into()));
        assert!(matches!(heap.try_get_mut(id), Err(HeapError::Immutable(_))));
        assert_eq!(heap.num_objects(), 0);
    }
}
