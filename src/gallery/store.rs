// SPDX-License-Identifier: MPL-2.0
//! Gallery store: the command surface and the observable surface.
//!
//! A [`GalleryStore`] is created when a gallery page mounts and dropped when
//! it unmounts. It splits its API in two:
//!
//! - [`GalleryCommands`]: a cloneable handle whose identity never changes,
//!   for consumers that only issue commands (batch renderers, click
//!   handlers). Holding it never subscribes to state.
//! - [`GallerySnapshot`]s published on a `tokio::sync::watch` channel, for
//!   consumers that render state.
//!
//! All mutation funnels through the commands. State sits behind a mutex that
//! is never held across an `.await`; load-more fetches run on a spawned task
//! and re-enter through the same lock when they resolve.
//!
//! Do not hold a `watch::Ref` from [`GalleryStore::subscribe`] while issuing
//! commands: publishing needs the channel's write lock.

use super::load_more::{LoadMoreCoordinator, LoadMoreTicket};
use super::registry::Registry;
use super::selection::{NextStep, SelectionController};
use super::snapshot::GallerySnapshot;
use crate::application::port::{FetchResult, LoadMoreSupplier, ModalCloseCallback};
use crate::diagnostics::{
    DiagnosticsHandle, ErrorEvent, ErrorType, GalleryOperation, UserAction, WarningEvent,
    WarningType,
};
use crate::domain::gallery::Item;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Mutable state guarded by the store lock.
#[derive(Debug, Default)]
struct GalleryState {
    registry: Registry,
    selection: SelectionController,
    is_loading_more: bool,
    has_loaded_more: bool,
    /// Index a `go_next` was issued from while its load-more is in flight.
    pending_advance: Option<usize>,
}

impl GalleryState {
    fn capture(&self, load_more_available: bool, revision: u64) -> GallerySnapshot {
        GallerySnapshot {
            items: self.registry.slots(),
            selection: self.selection.selection().clone(),
            total_count: self.registry.len(),
            is_loading_more: self.is_loading_more,
            has_loaded_more: self.has_loaded_more,
            load_more_available,
            registry_revision: self.registry.revision(),
            revision,
        }
    }
}

struct Shared {
    state: Mutex<GalleryState>,
    coordinator: LoadMoreCoordinator,
    on_close: Mutex<Option<ModalCloseCallback>>,
    snapshot_tx: watch::Sender<GallerySnapshot>,
    diagnostics: Option<DiagnosticsHandle>,
}

/// Owner of one gallery session's registry, selection and pagination state.
pub struct GalleryStore {
    commands: GalleryCommands,
    snapshot_rx: watch::Receiver<GallerySnapshot>,
}

impl GalleryStore {
    /// Creates an empty store without diagnostics.
    #[must_use]
    pub fn new() -> Self {
        Self::with_diagnostics(None)
    }

    /// Creates an empty store that records activity on `diagnostics`.
    #[must_use]
    pub fn with_diagnostics(diagnostics: Option<DiagnosticsHandle>) -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(GallerySnapshot::default());
        let shared = Shared {
            state: Mutex::new(GalleryState::default()),
            coordinator: LoadMoreCoordinator::new(),
            on_close: Mutex::new(None),
            snapshot_tx,
            diagnostics,
        };
        Self {
            commands: GalleryCommands {
                shared: Arc::new(shared),
            },
            snapshot_rx,
        }
    }

    /// Returns the stable command handle.
    #[must_use]
    pub fn commands(&self) -> GalleryCommands {
        self.commands.clone()
    }

    /// Subscribes to state snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GallerySnapshot> {
        self.snapshot_rx.clone()
    }

    /// Returns the latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> GallerySnapshot {
        self.snapshot_rx.borrow().clone()
    }
}

impl Default for GalleryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable command handle.
///
/// Clones share one store; [`same_as`](Self::same_as) stays true across any
/// number of state changes.
#[derive(Clone)]
pub struct GalleryCommands {
    shared: Arc<Shared>,
}

impl GalleryCommands {
    /// Returns true if both handles drive the same store.
    #[must_use]
    pub fn same_as(&self, other: &GalleryCommands) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Subscribes to state snapshots from a command handle.
    ///
    /// The published `total_count` always matches the registry, since every
    /// registry change publishes before the state lock is released.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GallerySnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    /// Merges a batch into the registry at `start_index`.
    ///
    /// Re-registering identical content publishes nothing. Returns true if
    /// the registry changed.
    pub fn register(&self, items: &[Item], start_index: usize) -> bool {
        let mut state = self.lock_state();
        let changed = state.registry.register(items, start_index);
        if changed {
            self.publish(&state);
        }
        changed
    }

    /// Opens the viewer on the registry slot at `index`.
    ///
    /// From `Closed` this starts a new session with `has_loaded_more` false.
    /// Re-opening while already open keeps the current session.
    pub fn open_at_index(&self, index: usize) {
        self.log_action(UserAction::OpenAtIndex { index });
        let mut state = self.lock_state();
        Self::begin_session(&mut state);
        state.selection.open_at_index(index);
        self.maybe_load_more(&mut state, None);
        self.publish(&state);
    }

    /// Opens the viewer on `item`, bypassing registry lookup.
    ///
    /// Click handlers use this so the viewer shows the clicked photo even if
    /// its batch has not been registered yet.
    pub fn open_explicit(&self, item: Item, index: usize) {
        self.log_action(UserAction::OpenExplicit { index });
        let mut state = self.lock_state();
        Self::begin_session(&mut state);
        state.selection.open_explicit(item, index);
        self.maybe_load_more(&mut state, None);
        self.publish(&state);
    }

    /// Moves to the next item, starting a load-more at the known end.
    ///
    /// Returns [`NextStep::LoadMore`] only when this call started a fetch.
    /// While a load-more is already in flight, a `go_next` at the end does
    /// nothing and returns [`NextStep::LoadPending`].
    pub fn go_next(&self) -> NextStep {
        self.log_action(UserAction::NavigateNext);
        let mut state = self.lock_state();
        let available = self.shared.coordinator.has_supplier();
        let state = &mut *state;
        let mut step = state.selection.go_next(&state.registry, available);

        match step {
            NextStep::Advanced(_) => {
                state.pending_advance = None;
                self.maybe_load_more(state, None);
            }
            NextStep::LoadMore { from } => {
                if self.shared.coordinator.is_in_flight() {
                    step = NextStep::LoadPending;
                } else if !self.maybe_load_more(state, Some(from)) {
                    step = NextStep::AtEnd;
                }
            }
            NextStep::LoadPending | NextStep::AtEnd | NextStep::Closed => {}
        }

        self.publish(state);
        step
    }

    /// Moves to the previous item, stopping at index 0.
    pub fn go_previous(&self) {
        self.log_action(UserAction::NavigatePrevious);
        let mut state = self.lock_state();
        if state.selection.go_previous() {
            state.pending_advance = None;
            self.maybe_load_more(&mut state, None);
            self.publish(&state);
        }
    }

    /// Closes the viewer and reports the session to the close callback.
    ///
    /// The registry is left untouched. `has_loaded_more` is reset for the
    /// next session.
    pub fn close(&self) {
        let has_loaded_more = {
            let mut state = self.lock_state();
            state.selection.close();
            state.pending_advance = None;
            let has_loaded_more = state.has_loaded_more;
            state.has_loaded_more = false;
            self.publish(&state);
            has_loaded_more
        };

        self.log_action(UserAction::CloseViewer { has_loaded_more });

        let callback = self
            .shared
            .on_close
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback(has_loaded_more);
        }
    }

    /// Installs or removes the load-more supplier.
    ///
    /// A fetch already in flight is not cancelled; its result is merged when
    /// it resolves.
    pub fn set_on_load_more(&self, supplier: Option<Arc<dyn LoadMoreSupplier>>) {
        if self.shared.coordinator.set_supplier(supplier) {
            let state = self.lock_state();
            self.publish(&state);
        }
    }

    /// Installs or removes the viewer-close callback.
    pub fn set_on_modal_close(&self, callback: Option<ModalCloseCallback>) {
        *self
            .shared
            .on_close
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = callback;
    }

    fn lock_state(&self) -> MutexGuard<'_, GalleryState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Opening from `Closed` starts a new session and clears
    /// `has_loaded_more`. Re-opening while already open (another click with
    /// the viewer up) stays in the current session and keeps the flag.
    fn begin_session(state: &mut GalleryState) {
        if !state.selection.selection().is_open() {
            state.has_loaded_more = false;
        }
        state.pending_advance = None;
    }

    /// Starts a load-more if the viewer sits on the last known index.
    ///
    /// The guard is taken before this returns, so repeated evaluation in the
    /// same tick starts at most one fetch.
    fn maybe_load_more(&self, state: &mut GalleryState, advance_from: Option<usize>) -> bool {
        let Some(index) = state.selection.selection().index() else {
            return false;
        };
        let base_offset = state.registry.len();
        if !self.shared.coordinator.should_trigger(index, base_offset) {
            return false;
        }
        let Some(ticket) = self.shared.coordinator.try_begin() else {
            return false;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            self.log(|d| {
                d.log_warning(WarningEvent::new(
                    WarningType::MissingRuntime,
                    "load-more requested outside an async runtime",
                ));
            });
            return false;
        };

        state.is_loading_more = true;
        state.pending_advance = advance_from;

        // Asked now, while the registry length still equals `base_offset`.
        let fetch = ticket.fetch();
        let mut in_flight = InFlightLoad {
            commands: self.clone(),
            ticket: Some(ticket),
        };
        runtime.spawn(async move {
            let started = Instant::now();
            let result = fetch.await;
            if let Some(ticket) = in_flight.ticket.take() {
                in_flight
                    .commands
                    .finish_load_more(ticket, base_offset, result, started.elapsed());
            }
        });
        true
    }

    /// Clears the loading state of a fetch whose task went away before it
    /// resolved.
    fn abandon_load_more(&self, ticket: LoadMoreTicket) {
        let mut state = self.lock_state();
        drop(ticket);
        state.is_loading_more = false;
        state.pending_advance = None;
        self.publish(&state);
    }

    fn finish_load_more(
        &self,
        ticket: LoadMoreTicket,
        base_offset: usize,
        result: FetchResult,
        elapsed: Duration,
    ) {
        let mut state = self.lock_state();
        let state = &mut *state;
        let advance_from = state.pending_advance.take();

        match result {
            Ok(items) if !items.is_empty() => {
                state.registry.register(&items, base_offset);
                if state.selection.selection().is_open() {
                    state.has_loaded_more = true;
                }
                if let Some(from) = advance_from {
                    state.selection.advance_after_load(from, &state.registry);
                }
                self.log(|d| {
                    d.log_operation(GalleryOperation::LoadMore {
                        base_offset,
                        item_count: items.len(),
                        duration_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    });
                });
            }
            Ok(_) => {}
            Err(err) => {
                self.log(|d| {
                    d.log_error(ErrorEvent::new(
                        ErrorType::LoadMoreFailed,
                        format!("load-more at offset {base_offset} failed: {err}"),
                    ));
                });
            }
        }

        drop(ticket);
        state.is_loading_more = false;
        self.publish(state);
    }

    /// Publishes a snapshot if anything observable changed.
    fn publish(&self, state: &GalleryState) {
        let load_more_available = self.shared.coordinator.has_supplier();
        self.shared.snapshot_tx.send_if_modified(|current| {
            let next = state.capture(load_more_available, current.revision + 1);
            if current.same_state(&next) {
                return false;
            }
            *current = next;
            true
        });
    }

    fn log_action(&self, action: UserAction) {
        self.log(|d| d.log_action(action));
    }

    fn log(&self, f: impl FnOnce(&DiagnosticsHandle)) {
        if let Some(diagnostics) = &self.shared.diagnostics {
            f(diagnostics);
        }
    }
}

/// Owns the ticket of a spawned load-more.
///
/// If the task is dropped before the fetch resolves (runtime shutdown, abort),
/// the drop resets `is_loading_more` so the snapshot does not stay stuck.
struct InFlightLoad {
    commands: GalleryCommands,
    ticket: Option<LoadMoreTicket>,
}

impl Drop for InFlightLoad {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.commands.abandon_load_more(ticket);
        }
    }
}

impl std::fmt::Debug for GalleryCommands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryCommands")
            .field("coordinator", &self.shared.coordinator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::{supplier_fn, FetchError};
    use crate::diagnostics::{BufferCapacity, DiagnosticEventKind, DiagnosticsCollector};
    use crate::domain::gallery::Selection;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn items(prefix: &str, range: std::ops::Range<usize>) -> Vec<Item> {
        range
            .map(|i| Item::new(format!("{prefix}-{i}"), format!("{prefix} {i}"), "test", "u"))
            .collect()
    }

    fn counting_supplier(
        calls: Arc<AtomicUsize>,
        result: FetchResult,
    ) -> Arc<dyn LoadMoreSupplier> {
        Arc::new(supplier_fn(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            let result = result.clone();
            async move { result }
        }))
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn commands_identity_survives_mutations() {
        let store = GalleryStore::new();
        let before = store.commands();
        before.register(&items("p", 0..3), 0);
        before.open_at_index(1);
        assert!(before.same_as(&store.commands()));
        assert!(!before.same_as(&GalleryStore::new().commands()));
    }

    #[test]
    fn identical_register_publishes_once() {
        let store = GalleryStore::new();
        let mut rx = store.subscribe();
        let commands = store.commands();

        assert!(commands.register(&items("p", 0..3), 0));
        assert!(rx.has_changed().expect("sender alive"));
        rx.borrow_and_update();

        assert!(!commands.register(&items("p", 0..3), 0));
        assert!(!rx.has_changed().expect("sender alive"));
    }

    #[test]
    fn close_reports_session_flag_and_keeps_registry() {
        let store = GalleryStore::new();
        let commands = store.commands();
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reported);
        commands.set_on_modal_close(Some(Arc::new(move |flag: bool| {
            sink.lock().expect("lock").push(flag);
        })));

        commands.register(&items("p", 0..3), 0);
        commands.open_at_index(0);
        commands.close();

        assert_eq!(*reported.lock().expect("lock"), vec![false]);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.selection, Selection::Closed);
        assert_eq!(snapshot.total_count, 3);
    }

    #[test]
    fn load_more_outside_runtime_is_skipped_and_logged() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::default());
        let store = GalleryStore::with_diagnostics(Some(collector.handle()));
        let commands = store.commands();
        let calls = Arc::new(AtomicUsize::new(0));
        commands.set_on_load_more(Some(counting_supplier(Arc::clone(&calls), Ok(Vec::new()))));

        commands.register(&items("p", 0..2), 0);
        commands.open_at_index(1);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!store.snapshot().is_loading_more);
        collector.process_pending();
        assert!(collector.iter().any(|event| matches!(
            &event.kind,
            DiagnosticEventKind::Warning { event } if event.warning_type == WarningType::MissingRuntime
        )));
    }

    #[tokio::test]
    async fn go_next_at_end_loads_and_advances() {
        let store = GalleryStore::new();
        let commands = store.commands();
        commands.register(&items("p", 0..3), 0);
        commands.open_at_index(1);

        let calls = Arc::new(AtomicUsize::new(0));
        commands.set_on_load_more(Some(counting_supplier(
            Arc::clone(&calls),
            Ok(items("more", 3..5)),
        )));

        assert_eq!(commands.go_next(), NextStep::Advanced(2));
        assert!(store.snapshot().is_loading_more);
        assert_eq!(commands.go_next(), NextStep::LoadPending);

        settle().await;

        let snapshot = store.snapshot();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(snapshot.total_count, 5);
        assert_eq!(snapshot.selection, Selection::OpenByIndex(2));
        assert!(snapshot.has_loaded_more);
        assert!(!snapshot.is_loading_more);
    }

    #[tokio::test]
    async fn go_next_request_advances_after_landing() {
        let store = GalleryStore::new();
        let commands = store.commands();
        commands.register(&items("p", 0..3), 0);
        commands.open_at_index(2);

        commands.set_on_load_more(Some(counting_supplier(
            Arc::new(AtomicUsize::new(0)),
            Ok(items("more", 3..6)),
        )));
        assert_eq!(commands.go_next(), NextStep::LoadMore { from: 2 });

        settle().await;
        assert_eq!(store.snapshot().selection, Selection::OpenByIndex(3));
    }

    #[tokio::test]
    async fn failed_load_more_is_logged_and_cleared() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::default());
        let store = GalleryStore::with_diagnostics(Some(collector.handle()));
        let commands = store.commands();
        commands.register(&items("p", 0..3), 0);
        commands.set_on_load_more(Some(counting_supplier(
            Arc::new(AtomicUsize::new(0)),
            Err(FetchError::Network("offline".into())),
        )));

        commands.open_at_index(2);
        settle().await;

        let snapshot = store.snapshot();
        assert!(!snapshot.is_loading_more);
        assert_eq!(snapshot.total_count, 3);
        collector.process_pending();
        assert!(collector.iter().any(|event| matches!(
            &event.kind,
            DiagnosticEventKind::Error { event } if event.error_type == ErrorType::LoadMoreFailed
        )));
    }

    #[tokio::test]
    async fn result_landing_after_close_does_not_mark_next_session() {
        let store = GalleryStore::new();
        let commands = store.commands();
        commands.register(&items("p", 0..3), 0);
        commands.set_on_load_more(Some(counting_supplier(
            Arc::new(AtomicUsize::new(0)),
            Ok(items("more", 3..6)),
        )));

        commands.open_at_index(2);
        commands.close();
        settle().await;

        let snapshot = store.snapshot();
        assert_eq!(snapshot.total_count, 6);
        assert!(!snapshot.has_loaded_more);
    }

    #[test]
    fn go_next_at_end_without_runtime_reports_end() {
        let store = GalleryStore::new();
        let commands = store.commands();
        commands.register(&items("p", 0..3), 0);
        commands.set_on_load_more(Some(counting_supplier(
            Arc::new(AtomicUsize::new(0)),
            Ok(items("more", 3..5)),
        )));
        commands.open_at_index(2);

        assert_eq!(commands.go_next(), NextStep::AtEnd);
        assert!(!store.snapshot().is_loading_more);
    }

    #[test]
    fn dropped_load_more_task_clears_loading_state() {
        let store = GalleryStore::new();
        let commands = store.commands();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");

        runtime.block_on(async {
            commands.register(&items("p", 0..3), 0);
            commands.set_on_load_more(Some(Arc::new(supplier_fn(
                futures_util::future::pending::<FetchResult>,
            ))));
            commands.open_at_index(2);
            assert_eq!(commands.go_next(), NextStep::LoadPending);
            settle().await;
            assert!(store.snapshot().is_loading_more);
        });
        drop(runtime);

        let snapshot = store.snapshot();
        assert!(!snapshot.is_loading_more);
        assert_eq!(snapshot.selection, Selection::OpenByIndex(2));
        // The guard is free again: with no runtime the retry reports the end
        // instead of waiting on the abandoned fetch.
        assert_eq!(commands.go_next(), NextStep::AtEnd);
    }

    #[tokio::test]
    async fn reopen_while_open_keeps_session_flag() {
        let store = GalleryStore::new();
        let commands = store.commands();
        commands.register(&items("p", 0..3), 0);
        commands.set_on_load_more(Some(counting_supplier(
            Arc::new(AtomicUsize::new(0)),
            Ok(items("more", 3..6)),
        )));

        commands.open_at_index(2);
        settle().await;
        assert!(store.snapshot().has_loaded_more);

        commands.open_at_index(0);
        assert!(store.snapshot().has_loaded_more);
        commands.open_explicit(items("p", 1..2).remove(0), 1);
        assert!(store.snapshot().has_loaded_more);

        commands.close();
        commands.open_at_index(0);
        assert!(!store.snapshot().has_loaded_more);
    }
}
