// SPDX-License-Identifier: MPL-2.0
//! Gallery registry and viewer navigation.
//!
//! This module owns the application-side state of a paginated photo
//! gallery: the registry of items keyed by absolute index, the viewer
//! selection, and the load-more pagination that extends the registry while
//! the viewer is open.
//!
//! # Architecture
//!
//! - [`registry`]: order-independent, idempotent batch merge
//! - [`selection`]: viewer open/close and next/previous transitions
//! - [`load_more`]: single-flight guard around the load-more supplier
//! - [`store`]: the store, its stable [`GalleryCommands`] handle and the
//!   published [`GallerySnapshot`]s
//! - [`batch`]: rendering fetched batches and scheduling their registration
//!
//! # Example
//!
//! ```
//! use gallery_lens::domain::gallery::Item;
//! use gallery_lens::gallery::GalleryStore;
//!
//! let store = GalleryStore::new();
//! let commands = store.commands();
//! commands.register(&[Item::new("a", "A", "demo", "a.jpg")], 0);
//! commands.open_at_index(0);
//!
//! let snapshot = store.snapshot();
//! assert_eq!(snapshot.current_item().map(|i| i.id.as_str()), Some("a"));
//! ```

pub mod batch;
pub mod load_more;
pub mod registry;
pub mod selection;
pub mod snapshot;
pub mod store;

pub use batch::{BatchLoader, BatchRenderer, ProducerSupplier, RenderedBatch};
pub use load_more::{LoadMoreCoordinator, LoadMoreTicket};
pub use registry::Registry;
pub use selection::{NextStep, SelectionController};
pub use snapshot::GallerySnapshot;
pub use store::{GalleryCommands, GalleryStore};
