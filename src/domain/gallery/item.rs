// SPDX-License-Identifier: MPL-2.0
//! Photo item value type.

use std::fmt;

/// Stable identity of a photo item.
///
/// Two items with the same id are considered the same photo, even if their
/// other fields differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One photo as shown in the gallery grid and the full-screen viewer.
///
/// Items are immutable once registered. Registering a different item at an
/// occupied slot replaces it; registering an item with the same id is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Stable identity.
    pub id: ItemId,
    /// Human readable title.
    pub title: String,
    /// Where the photo comes from (collection, photographer, feed).
    pub source: String,
    /// Reference to the image data.
    pub image_url: String,
}

impl Item {
    /// Creates a new item.
    #[must_use]
    pub fn new(
        id: impl Into<ItemId>,
        title: impl Into<String>,
        source: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            source: source.into(),
            image_url: image_url.into(),
        }
    }

    /// Returns true if `other` carries the same identity.
    #[must_use]
    pub fn same_identity(&self, other: &Item) -> bool {
        self.id == other.id
    }
}
