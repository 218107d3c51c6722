// SPDX-License-Identifier: MPL-2.0
//! Application layer - ports and read-side queries.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`query`]: Query services (CQRS read-side)
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The gallery store consumes ports and publishes query types
//!
//! # Example
//!
//! ```ignore
//! use gallery_lens::application::port::{producer_fn, BatchProducer};
//!
//! let producer = producer_fn(|offset, limit| async move { fetch_page(offset, limit).await });
//! ```

pub mod port;
pub mod query;
