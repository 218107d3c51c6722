// SPDX-License-Identifier: MPL-2.0
//! Gallery newtypes.
//!
//! This module provides type-safe wrappers for gallery values,
//! ensuring they are always within valid ranges.

// =============================================================================
// Page Size Bounds
// =============================================================================

/// Page size bounds (1 to 200 items per batch).
pub mod page_size_bounds {
    /// Minimum items per page.
    pub const MIN: usize = 1;
    /// Maximum items per page.
    pub const MAX: usize = 200;
    /// Default items per page.
    pub const DEFAULT: usize = 24;
}

// =============================================================================
// PageSize
// =============================================================================

/// Number of items requested per batch.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (1–200 items).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(usize);

impl PageSize {
    /// Creates a new page size, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(page_size_bounds::MIN, page_size_bounds::MAX))
    }

    /// Returns the value as usize.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }

    /// Returns the absolute offset of the given page.
    #[must_use]
    pub fn offset_of(self, page: usize) -> usize {
        page.saturating_mul(self.0)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(page_size_bounds::DEFAULT)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_clamps() {
        assert_eq!(PageSize::new(0).value(), page_size_bounds::MIN);
        assert_eq!(PageSize::new(10_000).value(), page_size_bounds::MAX);
    }

    #[test]
    fn page_size_accepts_valid_values() {
        assert_eq!(PageSize::new(3).value(), 3);
        assert_eq!(PageSize::new(50).value(), 50);
    }

    #[test]
    fn page_size_default() {
        assert_eq!(PageSize::default().value(), page_size_bounds::DEFAULT);
    }

    #[test]
    fn offset_of_multiplies_page_index() {
        let size = PageSize::new(3);
        assert_eq!(size.offset_of(0), 0);
        assert_eq!(size.offset_of(2), 6);
    }
}
