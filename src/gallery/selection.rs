// SPDX-License-Identifier: MPL-2.0
//! Viewer selection state machine.
//!
//! The controller owns a [`Selection`] and applies the viewer transitions to
//! it. It reads the [`Registry`] to decide whether forward navigation is
//! possible but never writes to it; load-more is requested by returning
//! [`NextStep::LoadMore`] and left to the caller.

use super::registry::Registry;
use crate::domain::gallery::{Item, Selection};

/// Outcome of a `go_next` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Moved to the given index.
    Advanced(usize),
    /// At the known end with a supplier available; the caller should fetch
    /// and advance from `from` once data lands.
    LoadMore {
        /// Index the viewer was on when the request was made.
        from: usize,
    },
    /// At the known end while a load-more is already in flight. Nothing
    /// changed; the viewer stays put.
    LoadPending,
    /// Nothing to move to: end of data, or the next slot never arrived.
    AtEnd,
    /// The viewer is closed.
    Closed,
}

/// Tracks what the full-screen viewer is showing.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selection: Selection,
}

impl SelectionController {
    /// Creates a controller in the `Closed` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Opens the viewer on whatever the registry holds at `index`.
    ///
    /// The slot may be unset; the viewer then shows a loading state.
    pub fn open_at_index(&mut self, index: usize) -> bool {
        self.replace(Selection::OpenByIndex(index))
    }

    /// Opens the viewer on `item`, bypassing registry lookup.
    pub fn open_explicit(&mut self, item: Item, index: usize) -> bool {
        self.replace(Selection::OpenPinned { item, index })
    }

    /// Moves forward by one.
    ///
    /// Advancing requires the next slot to be populated. When the viewer is
    /// on the last known index and `load_more_available` is set, the pin is
    /// dropped and [`NextStep::LoadMore`] is returned instead.
    pub fn go_next(&mut self, registry: &Registry, load_more_available: bool) -> NextStep {
        let Some(index) = self.selection.index() else {
            return NextStep::Closed;
        };
        let next = index + 1;

        if registry.is_populated(next) {
            self.selection = Selection::OpenByIndex(next);
            return NextStep::Advanced(next);
        }

        self.unpin();
        if next >= registry.len() && load_more_available {
            NextStep::LoadMore { from: index }
        } else {
            NextStep::AtEnd
        }
    }

    /// Moves back by one, stopping at index 0.
    pub fn go_previous(&mut self) -> bool {
        let Some(index) = self.selection.index() else {
            return false;
        };
        self.replace(Selection::OpenByIndex(index.saturating_sub(1)))
    }

    /// Closes the viewer. Returns true if it was open.
    pub fn close(&mut self) -> bool {
        self.replace(Selection::Closed)
    }

    /// Completes a deferred `go_next` once a load-more has landed.
    ///
    /// Only advances if the viewer is still on `from` and the next slot now
    /// holds an item.
    pub fn advance_after_load(&mut self, from: usize, registry: &Registry) -> bool {
        if self.selection.index() != Some(from) || !registry.is_populated(from + 1) {
            return false;
        }
        self.replace(Selection::OpenByIndex(from + 1))
    }

    /// Item the viewer should display: the pin if present, otherwise the
    /// registry slot.
    #[must_use]
    pub fn current_item<'a>(&'a self, registry: &'a Registry) -> Option<&'a Item> {
        match &self.selection {
            Selection::Closed => None,
            Selection::OpenByIndex(index) => registry.get(*index),
            Selection::OpenPinned { item, .. } => Some(item),
        }
    }

    fn unpin(&mut self) {
        if let Selection::OpenPinned { index, .. } = self.selection {
            self.selection = Selection::OpenByIndex(index);
        }
    }

    fn replace(&mut self, selection: Selection) -> bool {
        if self.selection == selection {
            return false;
        }
        self.selection = selection;
        true
    }
}
