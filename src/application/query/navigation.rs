// SPDX-License-Identifier: MPL-2.0
//! Viewer navigation state for UI rendering.
//!
//! [`NavigationInfo`] is derived from a gallery snapshot and carries
//! everything a viewer needs to enable or disable its previous/next controls
//! without touching the registry.

/// Navigation state information for UI rendering.
///
/// `is_last` means "no populated slot after the current one": either the end
/// of the known data or a hole left by a batch that never arrived. `has_next`
/// is still true at the end when a load-more can be started.
// Allow excessive bools: read-only UI snapshot with orthogonal capability flags.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationInfo {
    /// Whether a next control should be enabled.
    pub has_next: bool,
    /// Whether a previous control should be enabled.
    pub has_previous: bool,
    /// Whether the viewer is on index 0.
    pub is_first: bool,
    /// Whether no populated slot follows the current index.
    pub is_last: bool,
    /// Whether `go_next` would start a load-more right now.
    pub can_load_more: bool,
    /// Whether a load-more is in flight.
    pub is_loading_more: bool,
    /// Selected absolute index, if the viewer is open.
    pub current_index: Option<usize>,
    /// Registry length, holes included.
    pub total_count: usize,
}

impl NavigationInfo {
    /// Computes navigation flags.
    ///
    /// * `current_index` - selected index, `None` when the viewer is closed
    /// * `next_populated` - whether the slot after `current_index` holds an item
    /// * `total_count` - registry length
    /// * `load_more_available` - whether a load-more supplier is installed
    /// * `is_loading_more` - whether a load-more is in flight
    #[must_use]
    pub fn compute(
        current_index: Option<usize>,
        next_populated: bool,
        total_count: usize,
        load_more_available: bool,
        is_loading_more: bool,
    ) -> Self {
        let Some(index) = current_index else {
            return Self {
                total_count,
                is_loading_more,
                ..Self::default()
            };
        };

        let is_last = !next_populated;
        let can_load_more =
            is_last && index + 1 >= total_count && load_more_available && !is_loading_more;

        Self {
            has_next: !is_last || can_load_more,
            has_previous: index > 0,
            is_first: index == 0,
            is_last,
            can_load_more,
            is_loading_more,
            current_index: Some(index),
            total_count,
        }
    }
}
