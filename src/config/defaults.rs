// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for configuration constants.
//!
//! # Categories
//!
//! - **Pagination**: page size and the number of pages fetched on mount
//! - **Diagnostics**: event buffer sizing

// ==========================================================================
// Pagination Defaults
// ==========================================================================

/// Items requested per producer call.
pub const DEFAULT_PAGE_SIZE: usize = crate::domain::gallery::page_size_bounds::DEFAULT;

/// Minimum page size.
pub const MIN_PAGE_SIZE: usize = crate::domain::gallery::page_size_bounds::MIN;

/// Maximum page size.
pub const MAX_PAGE_SIZE: usize = crate::domain::gallery::page_size_bounds::MAX;

/// Pages fetched concurrently when the gallery mounts.
pub const DEFAULT_INITIAL_PAGES: usize = 3;

/// Upper bound on pages fetched on mount.
pub const MAX_INITIAL_PAGES: usize = 50;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Diagnostics are recorded unless turned off.
pub const DEFAULT_DIAGNOSTICS_ENABLED: bool = true;

/// Events kept in the diagnostics ring buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize =
    crate::domain::diagnostics::buffer_capacity_bounds::DEFAULT;
