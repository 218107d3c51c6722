// SPDX-License-Identifier: MPL-2.0
//! `gallery_lens` keeps the application-side state of a paginated photo
//! gallery with a full-screen viewer.
//!
//! Batches of items arrive from independent producers in any order and are
//! merged into a registry keyed by absolute index. A viewer walks that
//! registry with next/previous, and fetches further pages on demand when it
//! reaches the known end.
//!
//! Start with [`gallery::GalleryStore`].

#![doc(html_root_url = "https://docs.rs/gallery_lens/0.1.0")]

pub mod application;
pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod gallery;
pub mod infrastructure;
pub mod paths;
