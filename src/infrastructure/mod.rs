// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`memory`]: Synthetic in-memory catalog (implements [`BatchProducer`])
//!
//! [`BatchProducer`]: crate::application::port::BatchProducer

pub mod memory;

pub use memory::InMemoryCatalog;
