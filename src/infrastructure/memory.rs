// SPDX-License-Identifier: MPL-2.0
//! In-memory catalog producer.
//!
//! Serves a synthetic, fixed-size catalog through [`BatchProducer`]. Latency
//! can be scripted per offset so batches resolve out of order, and offsets
//! can be marked as failing. Used by the demo binary and by tests that need a
//! realistic producer without a network.

use crate::application::port::{BatchProducer, FetchError, FetchResult};
use crate::domain::gallery::Item;
use futures_util::future::BoxFuture;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A catalog of `len` synthetic photos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    len: usize,
    source: String,
    latency: Duration,
    latency_by_offset: HashMap<usize, Duration>,
    failing_offsets: HashSet<usize>,
    fail_from: Option<usize>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            source: "memory".to_string(),
            ..Self::default()
        }
    }

    /// Sets the source label stamped on every item.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Delays every fetch by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Delays fetches starting at `offset` by `latency`, overriding the
    /// catalog-wide latency.
    #[must_use]
    pub fn with_latency_at(mut self, offset: usize, latency: Duration) -> Self {
        self.latency_by_offset.insert(offset, latency);
        self
    }

    /// Makes fetches starting at `offset` fail.
    #[must_use]
    pub fn failing_at(mut self, offset: usize) -> Self {
        self.failing_offsets.insert(offset);
        self
    }

    /// Makes every fetch starting at or after `offset` fail.
    #[must_use]
    pub fn failing_from(mut self, offset: usize) -> Self {
        self.fail_from = Some(offset);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of fetches served so far, across clones.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Acquire)
    }

    /// The item at absolute `index`, whether or not it has been fetched.
    #[must_use]
    pub fn item_at(&self, index: usize) -> Option<Item> {
        (index < self.len).then(|| {
            Item::new(
                format!("photo-{index:05}"),
                format!("Photo #{}", index + 1),
                self.source.clone(),
                format!("https://images.invalid/{}/{index:05}.jpg", self.source),
            )
        })
    }

    fn page(&self, offset: usize, limit: usize) -> Vec<Item> {
        let end = offset.saturating_add(limit).min(self.len);
        (offset..end).filter_map(|i| self.item_at(i)).collect()
    }

    fn fails_at(&self, offset: usize) -> bool {
        self.failing_offsets.contains(&offset) || self.fail_from.is_some_and(|from| offset >= from)
    }
}

impl BatchProducer for InMemoryCatalog {
    fn fetch(&self, offset: usize, limit: usize) -> BoxFuture<'static, FetchResult> {
        self.calls.fetch_add(1, Ordering::AcqRel);

        let latency = self
            .latency_by_offset
            .get(&offset)
            .copied()
            .unwrap_or(self.latency);
        let result = if self.fails_at(offset) {
            Err(FetchError::Network(format!(
                "catalog unreachable at offset {offset}"
            )))
        } else {
            Ok(self.page(offset, limit))
        };

        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            result
        })
    }
}
