// SPDX-License-Identifier: MPL-2.0
//! Load-more coordinator.
//!
//! Holds the non-reactive half of on-demand pagination: the supplier
//! reference and the reentrancy guard. The reactive half (`is_loading_more`,
//! `has_loaded_more`) lives in the store state so that swapping the supplier
//! or flipping the guard never produces a snapshot on its own.
//!
//! The guard is taken with a compare-exchange before anything is awaited, so
//! any number of triggers evaluated in the same tick start at most one fetch.
//! It is released when the returned [`LoadMoreTicket`] is dropped.

use crate::application::port::{FetchResult, LoadMoreSupplier};
use futures_util::future::BoxFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Supplier reference plus reentrancy guard.
#[derive(Default)]
pub struct LoadMoreCoordinator {
    supplier: Mutex<Option<Arc<dyn LoadMoreSupplier>>>,
    in_flight: Arc<AtomicBool>,
}

impl LoadMoreCoordinator {
    /// Creates a coordinator with no supplier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs or removes the supplier.
    ///
    /// A fetch already in flight keeps the supplier it started with and its
    /// result is still merged. Returns true if supplier presence changed.
    pub fn set_supplier(&self, supplier: Option<Arc<dyn LoadMoreSupplier>>) -> bool {
        let mut slot = self.supplier.lock().unwrap_or_else(PoisonError::into_inner);
        let had_supplier = slot.is_some();
        let has_supplier = supplier.is_some();
        *slot = supplier;
        had_supplier != has_supplier
    }

    /// Returns true if a supplier is installed.
    #[must_use]
    pub fn has_supplier(&self) -> bool {
        self.supplier
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Returns true while a fetch holds the guard.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Trigger condition: viewer at or past the last known index, a supplier
    /// installed, and no fetch in flight.
    #[must_use]
    pub fn should_trigger(&self, index: usize, len: usize) -> bool {
        index + 1 >= len && !self.is_in_flight() && self.has_supplier()
    }

    /// Takes the guard and returns a ticket for one fetch.
    ///
    /// Returns `None` if no supplier is installed or a fetch is already in
    /// flight.
    pub fn try_begin(&self) -> Option<LoadMoreTicket> {
        let supplier = self
            .supplier
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()?;

        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;

        Some(LoadMoreTicket {
            supplier,
            guard: Arc::clone(&self.in_flight),
        })
    }
}

impl std::fmt::Debug for LoadMoreCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadMoreCoordinator")
            .field("has_supplier", &self.has_supplier())
            .field("in_flight", &self.is_in_flight())
            .finish()
    }
}

/// Permission to run exactly one load-more fetch.
///
/// Dropping the ticket releases the guard, whether the fetch succeeded,
/// failed, or the task was torn down.
pub struct LoadMoreTicket {
    supplier: Arc<dyn LoadMoreSupplier>,
    guard: Arc<AtomicBool>,
}

impl LoadMoreTicket {
    /// Starts the fetch on the supplier captured when the ticket was taken.
    #[must_use]
    pub fn fetch(&self) -> BoxFuture<'static, FetchResult> {
        self.supplier.next_page()
    }
}

impl Drop for LoadMoreTicket {
    fn drop(&mut self) {
        self.guard.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::supplier_fn;
    use crate::domain::gallery::Item;

    fn supplier() -> Arc<dyn LoadMoreSupplier> {
        Arc::new(supplier_fn(|| async {
            Ok(vec![Item::new("more-1", "More", "test", "more.jpg")])
        }))
    }

    #[test]
    fn no_ticket_without_supplier() {
        let coordinator = LoadMoreCoordinator::new();
        assert!(coordinator.try_begin().is_none());
        assert!(!coordinator.should_trigger(0, 1));
    }

    #[test]
    fn second_ticket_is_refused_while_first_is_alive() {
        let coordinator = LoadMoreCoordinator::new();
        coordinator.set_supplier(Some(supplier()));

        let first = coordinator.try_begin();
        assert!(first.is_some());
        assert!(coordinator.is_in_flight());
        assert!(coordinator.try_begin().is_none());
        assert!(!coordinator.should_trigger(8, 9));

        drop(first);
        assert!(!coordinator.is_in_flight());
        assert!(coordinator.try_begin().is_some());
    }

    #[test]
    fn trigger_requires_last_known_index() {
        let coordinator = LoadMoreCoordinator::new();
        coordinator.set_supplier(Some(supplier()));

        assert!(!coordinator.should_trigger(7, 9));
        assert!(coordinator.should_trigger(8, 9));
        assert!(coordinator.should_trigger(0, 0));
    }

    #[test]
    fn set_supplier_reports_presence_changes() {
        let coordinator = LoadMoreCoordinator::new();
        assert!(coordinator.set_supplier(Some(supplier())));
        assert!(!coordinator.set_supplier(Some(supplier())));
        assert!(coordinator.set_supplier(None));
        assert!(!coordinator.has_supplier());
    }

    #[tokio::test]
    async fn ticket_keeps_supplier_after_replacement() {
        let coordinator = LoadMoreCoordinator::new();
        coordinator.set_supplier(Some(supplier()));
        let ticket = coordinator.try_begin().expect("ticket should be granted");

        coordinator.set_supplier(None);
        let items = ticket.fetch().await.expect("stale supplier still answers");
        assert_eq!(items.len(), 1);
    }
}
