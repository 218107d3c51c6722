// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core types with ZERO external dependencies.
//!
//! Pure value types and newtypes. Nothing here depends on async runtimes,
//! channels or serialization, which keeps these types trivial to test.
//!
//! # Modules
//!
//! - [`diagnostics`]: Diagnostics types ([`BufferCapacity`](diagnostics::BufferCapacity))
//! - [`gallery`]: Gallery types ([`Item`](gallery::Item), [`Selection`](gallery::Selection),
//!   [`PageSize`](gallery::PageSize))

pub mod diagnostics;
pub mod gallery;
