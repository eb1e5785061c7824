//! Live view registry
//!
//! Shared by every view on a page. Tracks how many views exist, so the
//! first player can force an initial draw, and which containers are being
//! observed for intersection and size changes.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

#[derive(Default)]
pub struct ViewRegistry {
    next_key: Cell<u64>,
    views: RefCell<BTreeSet<u64>>,
    observed: RefCell<BTreeSet<String>>,
}

/// Membership token handed out by [`ViewRegistry::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryKey(u64);

impl ViewRegistry {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn add(&self) -> RegistryKey {
        let key = self.next_key.get();
        self.next_key.set(key + 1);
        self.views.borrow_mut().insert(key);
        RegistryKey(key)
    }

    pub fn remove(&self, key: RegistryKey) {
        self.views.borrow_mut().remove(&key.0);
    }

    pub fn size(&self) -> usize {
        self.views.borrow().len()
    }

    /// Start observing a container; repeated calls are no-ops
    pub fn observe(&self, container_id: &str) -> bool {
        self.observed.borrow_mut().insert(container_id.to_string())
    }

    pub fn unobserve(&self, container_id: &str) -> bool {
        self.observed.borrow_mut().remove(container_id)
    }

    pub fn is_observed(&self, container_id: &str) -> bool {
        self.observed.borrow().contains(container_id)
    }
}
