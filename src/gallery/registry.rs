// SPDX-License-Identifier: MPL-2.0
//! Absolute-index registry of gallery items.
//!
//! Batches arrive independently and in any order. Each one writes its items
//! positionally into `[offset, offset + len)`; slots not yet covered by any
//! batch stay empty. Merging is last-writer-wins per slot, keyed on item id,
//! so the final contents do not depend on arrival order.

use crate::domain::gallery::Item;
use std::sync::Arc;

/// Sparse, append-friendly collection of items addressed by absolute index.
///
/// Slots are stored behind an [`Arc`] so snapshots can share them. A write
/// only happens when at least one slot actually changes; an identical
/// registration leaves the shared storage and the revision untouched.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    slots: Arc<Vec<Option<Item>>>,
    revision: u64,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `items` into slots starting at `start_index`.
    ///
    /// A slot is written when it is empty or holds a different id. The
    /// length becomes `max(len, start_index + items.len())`. An empty batch
    /// writes nothing.
    ///
    /// Returns `true` if anything changed.
    pub fn register(&mut self, items: &[Item], start_index: usize) -> bool {
        if items.is_empty() {
            return false;
        }

        let end = start_index + items.len();
        let grows = end > self.slots.len();
        let needs_write = grows
            || items
                .iter()
                .enumerate()
                .any(|(i, item)| !self.holds(start_index + i, item));

        if !needs_write {
            return false;
        }

        let slots = Arc::make_mut(&mut self.slots);
        if grows {
            slots.resize(end, None);
        }
        for (i, item) in items.iter().enumerate() {
            let slot = &mut slots[start_index + i];
            let replace = slot
                .as_ref()
                .is_none_or(|existing| !existing.same_identity(item));
            if replace {
                *slot = Some(item.clone());
            }
        }

        self.revision += 1;
        true
    }

    fn holds(&self, index: usize, item: &Item) -> bool {
        matches!(self.slots.get(index), Some(Some(existing)) if existing.same_identity(item))
    }

    /// Returns the item at `index`, or `None` for holes and out-of-range reads.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Returns true if `index` holds an item.
    #[must_use]
    pub fn is_populated(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Number of addressable slots, holes included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if nothing has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Length of the gap-free populated prefix.
    #[must_use]
    pub fn contiguous_len(&self) -> usize {
        self.slots
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.slots.len())
    }

    /// Returns true if no slot below `len` is empty.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.contiguous_len() == self.len()
    }

    /// Change counter, bumped once per effective registration.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Shared view of all slots.
    #[must_use]
    pub fn slots(&self) -> Arc<Vec<Option<Item>>> {
        Arc::clone(&self.slots)
    }
}
