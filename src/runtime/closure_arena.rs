use std::{collections::HashMap, rc::Rc};

use crate::runtime::{closure::Closure, leak_detector};

/// Keeps closures that were handed to native code alive and resolvable.
///
/// A closure reference word is the address of the closure's storage. The
/// arena owns one `Rc` per registered address, so the address stays valid
/// until [`ClosureArena::reset`] ends the computation scope. Words that were
/// never registered resolve to `None` instead of being dereferenced.
#[derive(Debug, Default)]
pub struct ClosureArena {
    live: HashMap<usize, Rc<Closure>>,
}

impl ClosureArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `closure` and returns its reference word.
    pub fn register(&mut self, closure: &Rc<Closure>) -> i64 {
        let address = Rc::as_ptr(closure) as usize;
        self.live.entry(address).or_insert_with(|| {
            leak_detector::record_arena_registration();
            Rc::clone(closure)
        });
        address as i64
    }

    pub fn resolve(&self, word: i64) -> Option<Rc<Closure>> {
        self.live.get(&(word as usize)).cloned()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drops every registration. Words handed out earlier become invalid.
    pub fn reset(&mut self) {
        self.live.clear();
    }
}
