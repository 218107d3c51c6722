// SPDX-License-Identifier: MPL-2.0
//! Gallery domain types.
//!
//! Pure value types shared by the registry, the selection controller and
//! the batch boundary. Nothing here knows about async or channels.

pub mod item;
pub mod newtypes;
pub mod selection;

pub use item::{Item, ItemId};
pub use newtypes::{page_size_bounds, PageSize};
pub use selection::Selection;
