// Copyright 2023 the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! Bookkeeping that ties native item identifiers back to menu items.

use std::collections::{BTreeSet, HashMap};
use std::num::NonZeroU64;
use std::rc::{Rc, Weak};

use crate::backend::ItemId;

/// Hands out item identifiers, reusing freed ones.
pub(crate) struct IdSlots {
    next_fresh_id: NonZeroU64,
    free_slots: BTreeSet<ItemId>,
}

impl IdSlots {
    pub fn new() -> IdSlots {
        IdSlots {
            next_fresh_id: NonZeroU64::MIN,
            free_slots: Default::default(),
        }
    }

    /// The smallest free identifier.
    pub fn alloc(&mut self) -> ItemId {
        if let Some(first) = self.free_slots.pop_first() {
            first
        } else {
            let result = ItemId::from_nonzero(self.next_fresh_id);
            self.next_fresh_id = self.next_fresh_id.saturating_add(1);
            result
        }
    }

    pub fn free(&mut self, id: ItemId) {
        if self.next_fresh_id.get() == id.get() + 1 {
            self.next_fresh_id = id.as_nonzero();
            // keep the counter from rewinding past slots that are still free
            while let Some(&last) = self.free_slots.last() {
                if last.get() + 1 != self.next_fresh_id.get() {
                    break;
                }
                self.free_slots.pop_last();
                self.next_fresh_id = last.as_nonzero();
            }
        } else {
            self.free_slots.insert(id);
        }
    }
}

/// The identifier → object index of the native synchronization layer.
///
/// Entries are weak: the registry never keeps an item alive. An identifier is
/// only handed out again after [`remove`](Registry::remove) erased it.
pub(crate) struct Registry<T> {
    slots: IdSlots,
    entries: HashMap<ItemId, Weak<T>>,
}

impl<T> Registry<T> {
    pub fn new() -> Registry<T> {
        Registry {
            slots: IdSlots::new(),
            entries: HashMap::new(),
        }
    }

    /// Reserve an identifier for an object about to be created.
    pub fn alloc(&mut self) -> ItemId {
        self.slots.alloc()
    }

    /// Record the object named by `id`.
    pub fn insert(&mut self, id: ItemId, object: Weak<T>) {
        let previous = self.entries.insert(id, object);
        debug_assert!(previous.is_none(), "{id:?} registered twice");
    }

    /// Erase `id` and make it available again.
    pub fn remove(&mut self, id: ItemId) {
        if self.entries.remove(&id).is_some() {
            self.slots.free(id);
        } else {
            tracing::warn!("release of unregistered {id:?}");
        }
    }

    pub fn get(&self, id: ItemId) -> Option<Rc<T>> {
        self.entries.get(&id).and_then(Weak::upgrade)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.entries.contains_key(&id)
    }

    /// The number of registered identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
