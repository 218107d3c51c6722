// SPDX-License-Identifier: MPL-2.0
//! Glue between batch producers and the store.
//!
//! A page fetched from a [`BatchProducer`] is handed to a [`BatchRenderer`],
//! which returns a [`RenderedBatch`] right away and registers the items on a
//! deferred task. Clicks on a rendered batch open the viewer with the clicked
//! item pinned, so the viewer never depends on that deferred registration.

use super::snapshot::GallerySnapshot;
use super::store::GalleryCommands;
use crate::application::port::{BatchProducer, FetchError, FetchResult, LoadMoreSupplier};
use crate::diagnostics::{DiagnosticsHandle, GalleryOperation, WarningEvent, WarningType};
use crate::domain::gallery::{Item, PageSize};
use futures_util::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Renders batches and schedules their registration.
#[derive(Debug, Clone)]
pub struct BatchRenderer {
    commands: GalleryCommands,
    diagnostics: Option<DiagnosticsHandle>,
}

impl BatchRenderer {
    #[must_use]
    pub fn new(commands: GalleryCommands, diagnostics: Option<DiagnosticsHandle>) -> Self {
        Self {
            commands,
            diagnostics,
        }
    }

    /// Renders `items` as the batch starting at `offset`.
    ///
    /// Registration runs exactly once, on a spawned task that yields to the
    /// scheduler before touching the store. Must be called within a tokio
    /// runtime.
    pub fn render(&self, offset: usize, items: Vec<Item>) -> RenderedBatch {
        let items: Arc<[Item]> = items.into();
        let commands = self.commands.clone();
        let diagnostics = self.diagnostics.clone();
        let batch = Arc::clone(&items);

        let registration = tokio::spawn(async move {
            tokio::task::yield_now().await;
            commands.register(&batch, offset);
            if let Some(diagnostics) = diagnostics {
                diagnostics.log_operation(GalleryOperation::BatchRegistered {
                    offset,
                    count: batch.len(),
                });
            }
        });

        RenderedBatch {
            offset,
            items,
            commands: self.commands.clone(),
            registration: Some(registration),
        }
    }
}

/// A rendered slice of the grid.
#[derive(Debug)]
pub struct RenderedBatch {
    offset: usize,
    items: Arc<[Item]>,
    commands: GalleryCommands,
    registration: Option<JoinHandle<()>>,
}

impl RenderedBatch {
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Absolute registry index of the item at `local_index`.
    #[must_use]
    pub fn global_index(&self, local_index: usize) -> usize {
        self.offset + local_index
    }

    /// Opens the viewer on the clicked item. Out-of-range clicks are ignored.
    pub fn click(&self, local_index: usize) -> bool {
        let Some(item) = self.items.get(local_index) else {
            return false;
        };
        self.commands
            .open_explicit(item.clone(), self.global_index(local_index));
        true
    }

    /// Waits until the deferred registration has run.
    pub async fn settle(&mut self) {
        if let Some(registration) = self.registration.take() {
            // A panicking registration already surfaced through the runtime.
            let _ = registration.await;
        }
    }
}

/// Fetches and renders pages from a producer.
pub struct BatchLoader {
    producer: Arc<dyn BatchProducer>,
    page_size: PageSize,
    renderer: BatchRenderer,
    diagnostics: Option<DiagnosticsHandle>,
}

impl BatchLoader {
    #[must_use]
    pub fn new(
        producer: Arc<dyn BatchProducer>,
        page_size: PageSize,
        commands: GalleryCommands,
        diagnostics: Option<DiagnosticsHandle>,
    ) -> Self {
        Self {
            producer,
            page_size,
            renderer: BatchRenderer::new(commands, diagnostics.clone()),
            diagnostics,
        }
    }

    #[must_use]
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Fetches page `page` and renders it.
    ///
    /// A failed fetch is logged and its slot range stays unset.
    pub async fn load_page(&self, page: usize) -> Result<RenderedBatch, FetchError> {
        let offset = self.page_size.offset_of(page);
        load_and_render(
            Arc::clone(&self.producer),
            self.renderer.clone(),
            self.diagnostics.clone(),
            offset,
            self.page_size.value(),
        )
        .await
    }

    /// Starts `pages` page fetches concurrently, one task per page.
    ///
    /// Completion order is whatever the producer makes it.
    pub fn spawn_pages(&self, pages: usize) -> Vec<JoinHandle<Result<RenderedBatch, FetchError>>> {
        (0..pages)
            .map(|page| {
                tokio::spawn(load_and_render(
                    Arc::clone(&self.producer),
                    self.renderer.clone(),
                    self.diagnostics.clone(),
                    self.page_size.offset_of(page),
                    self.page_size.value(),
                ))
            })
            .collect()
    }

    /// Load-more supplier that continues from the store's current length.
    ///
    /// Pages that failed during the initial fan-out shorten the registry;
    /// the supplier follows whatever actually landed instead of assuming
    /// every page did.
    #[must_use]
    pub fn load_more_supplier(&self) -> ProducerSupplier {
        ProducerSupplier::new(
            Arc::clone(&self.producer),
            self.page_size,
            self.renderer.commands.subscribe(),
        )
    }
}

async fn load_and_render(
    producer: Arc<dyn BatchProducer>,
    renderer: BatchRenderer,
    diagnostics: Option<DiagnosticsHandle>,
    offset: usize,
    limit: usize,
) -> Result<RenderedBatch, FetchError> {
    match producer.fetch(offset, limit).await {
        Ok(items) => Ok(renderer.render(offset, items)),
        Err(err) => {
            if let Some(diagnostics) = &diagnostics {
                diagnostics.log_warning(WarningEvent::new(
                    WarningType::BatchFetchFailed,
                    format!("batch at offset {offset} failed: {err}"),
                ));
            }
            Err(err)
        }
    }
}

/// Load-more supplier backed by a [`BatchProducer`].
///
/// Each call requests `(total_count, page_size)`, reading `total_count` from
/// the latest snapshot. The store merges the result at that same offset, so
/// items always land on their catalog index.
pub struct ProducerSupplier {
    producer: Arc<dyn BatchProducer>,
    page_size: PageSize,
    snapshots: watch::Receiver<GallerySnapshot>,
}

impl ProducerSupplier {
    #[must_use]
    pub fn new(
        producer: Arc<dyn BatchProducer>,
        page_size: PageSize,
        snapshots: watch::Receiver<GallerySnapshot>,
    ) -> Self {
        Self {
            producer,
            page_size,
            snapshots,
        }
    }

    /// Offset the next call will request.
    #[must_use]
    pub fn next_offset(&self) -> usize {
        self.snapshots.borrow().total_count
    }
}

impl LoadMoreSupplier for ProducerSupplier {
    fn next_page(&self) -> BoxFuture<'static, FetchResult> {
        self.producer.fetch(self.next_offset(), self.page_size.value())
    }
}

impl std::fmt::Debug for ProducerSupplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProducerSupplier")
            .field("page_size", &self.page_size)
            .field("next_offset", &self.next_offset())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::producer_fn;
    use crate::domain::gallery::Selection;
    use crate::gallery::GalleryStore;

    fn page(offset: usize, limit: usize) -> Vec<Item> {
        (offset..offset + limit)
            .map(|i| Item::new(format!("p-{i}"), format!("Photo {i}"), "test", "u"))
            .collect()
    }

    fn catalog(total: usize) -> Arc<dyn BatchProducer> {
        Arc::new(producer_fn(move |offset, limit| {
            let end = (offset + limit).min(total);
            let items = if offset >= end { Vec::new() } else { page(offset, end - offset) };
            async move { Ok(items) }
        }))
    }

    #[tokio::test]
    async fn render_defers_registration() {
        let store = GalleryStore::new();
        let renderer = BatchRenderer::new(store.commands(), None);

        let mut batch = renderer.render(3, page(3, 3));
        assert_eq!(store.snapshot().total_count, 0);

        batch.settle().await;
        let snapshot = store.snapshot();
        assert_eq!(snapshot.total_count, 6);
        assert!(snapshot.item(2).is_none());
        assert_eq!(snapshot.item(5).map(|i| i.id.as_str()), Some("p-5"));
    }

    #[tokio::test]
    async fn click_before_registration_pins_item() {
        let store = GalleryStore::new();
        let renderer = BatchRenderer::new(store.commands(), None);

        let mut batch = renderer.render(6, page(6, 3));
        assert!(batch.click(1));
        assert!(!batch.click(9));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.selection.index(), Some(7));
        assert_eq!(snapshot.current_item().map(|i| i.id.as_str()), Some("p-7"));

        batch.settle().await;
        assert_eq!(store.snapshot().current_item().map(|i| i.id.as_str()), Some("p-7"));
    }

    #[tokio::test]
    async fn spawn_pages_fills_registry() {
        let store = GalleryStore::new();
        let loader = BatchLoader::new(catalog(100), PageSize::new(4), store.commands(), None);

        for handle in loader.spawn_pages(3) {
            let mut batch = handle.await.expect("join").expect("fetch");
            batch.settle().await;
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.total_count, 12);
        assert!((0..12).all(|i| snapshot.item(i).is_some()));
    }

    #[tokio::test]
    async fn failed_page_leaves_range_unset() {
        let store = GalleryStore::new();
        let producer: Arc<dyn BatchProducer> = Arc::new(producer_fn(|offset, limit| async move {
            if offset == 0 {
                Err(FetchError::Unavailable)
            } else {
                Ok(page(offset, limit))
            }
        }));
        let loader = BatchLoader::new(producer, PageSize::new(2), store.commands(), None);

        assert_eq!(loader.load_page(0).await.err(), Some(FetchError::Unavailable));
        let mut second = loader.load_page(1).await.expect("second page");
        second.settle().await;

        let snapshot = store.snapshot();
        assert_eq!(snapshot.total_count, 4);
        assert!(snapshot.item(0).is_none());
        assert!(snapshot.item(2).is_some());
        assert_eq!(snapshot.selection, Selection::Closed);
    }

    #[tokio::test]
    async fn producer_supplier_follows_registry_length() {
        let store = GalleryStore::new();
        let commands = store.commands();
        let loader = BatchLoader::new(catalog(10), PageSize::new(4), commands.clone(), None);
        let supplier = loader.load_more_supplier();
        assert_eq!(supplier.next_offset(), 0);

        commands.register(&page(0, 8), 0);
        assert_eq!(supplier.next_offset(), 8);
        let first = supplier.next_page().await.expect("fetch");
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].id.as_str(), "p-8");

        commands.register(&first, 8);
        assert!(supplier.next_page().await.expect("fetch").is_empty());
    }

    #[tokio::test]
    async fn failed_last_page_does_not_shift_load_more() {
        let store = GalleryStore::new();
        let commands = store.commands();
        let mut rx = store.subscribe();
        let producer: Arc<dyn BatchProducer> = Arc::new(producer_fn(|offset, limit| async move {
            if offset == 6 {
                Err(FetchError::Network("timeout".into()))
            } else {
                Ok(page(offset, limit))
            }
        }));
        let loader = BatchLoader::new(producer, PageSize::new(3), commands.clone(), None);

        for handle in loader.spawn_pages(3) {
            if let Ok(mut batch) = handle.await.expect("join") {
                batch.settle().await;
            }
        }
        assert_eq!(store.snapshot().total_count, 6);

        commands.set_on_load_more(Some(Arc::new(loader.load_more_supplier())));
        commands.open_at_index(5);
        let snapshot = rx
            .wait_for(|s| !s.is_loading_more)
            .await
            .expect("store alive")
            .clone();

        // Offset 6 fails again, so the registry is unchanged rather than
        // filled with later catalog items.
        assert_eq!(snapshot.total_count, 6);
        assert!(snapshot.item(6).is_none());
    }

    #[tokio::test]
    async fn load_more_lands_on_catalog_index_after_failed_page() {
        let store = GalleryStore::new();
        let commands = store.commands();
        let mut rx = store.subscribe();
        let attempts = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let seen = Arc::clone(&attempts);
        let producer: Arc<dyn BatchProducer> = Arc::new(producer_fn(move |offset, limit| {
            // The first request for offset 6 fails; retries succeed.
            let first_try = offset == 6
                && seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0;
            async move {
                if first_try {
                    Err(FetchError::Unavailable)
                } else {
                    Ok(page(offset, limit))
                }
            }
        }));
        let loader = BatchLoader::new(producer, PageSize::new(3), commands.clone(), None);

        for handle in loader.spawn_pages(3) {
            if let Ok(mut batch) = handle.await.expect("join") {
                batch.settle().await;
            }
        }
        commands.set_on_load_more(Some(Arc::new(loader.load_more_supplier())));
        commands.open_at_index(5);

        let snapshot = rx
            .wait_for(|s| !s.is_loading_more)
            .await
            .expect("store alive")
            .clone();
        let ids: Vec<&str> = (0..snapshot.total_count)
            .filter_map(|i| snapshot.item(i).map(|item| item.id.as_str()))
            .collect();
        assert_eq!(ids, ["p-0", "p-1", "p-2", "p-3", "p-4", "p-5", "p-6", "p-7", "p-8"]);
        assert!(snapshot.has_loaded_more);
    }
}
