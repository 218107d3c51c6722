// SPDX-License-Identifier: MPL-2.0
//! Viewer selection state.

use super::item::Item;

/// What the full-screen viewer is currently showing.
///
/// `OpenPinned` carries the clicked item itself so the viewer can render it
/// before its slot has been registered. Item and index live in the same
/// variant, so they can only be set and cleared together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Viewer is closed.
    #[default]
    Closed,
    /// Viewer shows whatever the registry holds at `index`.
    OpenByIndex(usize),
    /// Viewer shows `item` regardless of the registry contents.
    OpenPinned {
        /// The item carried by the click.
        item: Item,
        /// Absolute index of the item.
        index: usize,
    },
}

impl Selection {
    /// Returns the selected absolute index, if the viewer is open.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            Selection::Closed => None,
            Selection::OpenByIndex(index) | Selection::OpenPinned { index, .. } => Some(*index),
        }
    }

    /// Returns true if the viewer is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, Selection::Closed)
    }

    /// Returns the pinned item, if any.
    #[must_use]
    pub fn pinned_item(&self) -> Option<&Item> {
        match self {
            Selection::OpenPinned { item, .. } => Some(item),
            _ => None,
        }
    }

    /// Returns true if the selection bypasses registry lookup.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        matches!(self, Selection::OpenPinned { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_has_no_index() {
        assert_eq!(Selection::Closed.index(), None);
        assert!(!Selection::Closed.is_open());
    }

    #[test]
    fn pinned_exposes_item_and_index() {
        let item = Item::new("x", "X", "test", "x.jpg");
        let selection = Selection::OpenPinned {
            item: item.clone(),
            index: 5,
        };
        assert_eq!(selection.index(), Some(5));
        assert_eq!(selection.pinned_item(), Some(&item));
        assert!(selection.is_pinned());
    }

    #[test]
    fn by_index_is_not_pinned() {
        let selection = Selection::OpenByIndex(2);
        assert_eq!(selection.index(), Some(2));
        assert!(selection.pinned_item().is_none());
        assert!(selection.is_open());
    }
}
