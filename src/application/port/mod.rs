// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the gallery core remains
//! independent of where pages actually come from.
//!
//! # Available Ports
//!
//! - [`producer`]: Batch producers and load-more suppliers
//!
//! # Design Notes
//!
//! - Traits are `Send + Sync` so implementors can be shared with spawned tasks
//! - Futures are boxed and `'static`; implementors clone what they need up front

pub mod producer;

pub use producer::{
    producer_fn, supplier_fn, BatchProducer, FetchError, FetchResult, FnProducer, FnSupplier,
    LoadMoreSupplier, ModalCloseCallback,
};
