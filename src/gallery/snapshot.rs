// SPDX-License-Identifier: MPL-2.0
//! Observable gallery state.

use crate::application::query::NavigationInfo;
use crate::domain::gallery::{Item, Selection};
use std::sync::Arc;

/// Immutable view of the gallery published after every effective change.
///
/// Snapshots are cheap to clone: the item slots are shared with the
/// registry until the next write.
#[derive(Debug, Clone, Default)]
pub struct GallerySnapshot {
    /// All registry slots; `None` marks a hole.
    pub items: Arc<Vec<Option<Item>>>,
    /// What the viewer shows.
    pub selection: Selection,
    /// Registry length, holes included.
    pub total_count: usize,
    /// Whether a load-more fetch is in flight.
    pub is_loading_more: bool,
    /// Whether a load-more succeeded during the current viewer session.
    pub has_loaded_more: bool,
    /// Whether a load-more supplier is installed.
    pub load_more_available: bool,
    /// Registry change counter the snapshot was taken at.
    pub registry_revision: u64,
    /// Publication counter, bumped for every published snapshot.
    pub revision: u64,
}

impl GallerySnapshot {
    /// Item at absolute `index`, if registered.
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index).and_then(Option::as_ref)
    }

    /// Item the viewer should display. `None` while closed or while the
    /// selected slot is still loading.
    #[must_use]
    pub fn current_item(&self) -> Option<&Item> {
        match &self.selection {
            Selection::Closed => None,
            Selection::OpenByIndex(index) => self.item(*index),
            Selection::OpenPinned { item, .. } => Some(item),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.selection.is_open()
    }

    /// Navigation flags for the viewer controls.
    #[must_use]
    pub fn navigation(&self) -> NavigationInfo {
        let index = self.selection.index();
        let next_populated = index.is_some_and(|i| self.item(i + 1).is_some());
        NavigationInfo::compute(
            index,
            next_populated,
            self.total_count,
            self.load_more_available,
            self.is_loading_more,
        )
    }

    /// True if both snapshots describe the same state, ignoring the
    /// publication counter.
    #[must_use]
    pub(crate) fn same_state(&self, other: &GallerySnapshot) -> bool {
        self.registry_revision == other.registry_revision
            && self.total_count == other.total_count
            && self.selection == other.selection
            && self.is_loading_more == other.is_loading_more
            && self.has_loaded_more == other.has_loaded_more
            && self.load_more_available == other.load_more_available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(ids: &[&str], selection: Selection) -> GallerySnapshot {
        let items: Vec<Option<Item>> = ids
            .iter()
            .map(|id| Some(Item::new(*id, *id, "test", "u")))
            .collect();
        GallerySnapshot {
            total_count: items.len(),
            items: Arc::new(items),
            selection,
            ..GallerySnapshot::default()
        }
    }

    #[test]
    fn current_item_prefers_pin() {
        let pinned = Item::new("x", "X", "test", "x.jpg");
        let snapshot = snapshot_with(
            &["a", "b"],
            Selection::OpenPinned {
                item: pinned.clone(),
                index: 1,
            },
        );
        assert_eq!(snapshot.current_item(), Some(&pinned));
    }

    #[test]
    fn navigation_reflects_last_index() {
        let snapshot = snapshot_with(&["a", "b"], Selection::OpenByIndex(1));
        let info = snapshot.navigation();
        assert!(info.is_last);
        assert!(!info.has_next);
        assert!(info.has_previous);
    }

    #[test]
    fn same_state_ignores_publication_counter() {
        let a = snapshot_with(&["a"], Selection::Closed);
        let b = GallerySnapshot {
            revision: 42,
            ..a.clone()
        };
        assert!(a.same_state(&b));
    }
}
