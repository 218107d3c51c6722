// SPDX-License-Identifier: MPL-2.0
//! Diagnostic report generation and JSON export.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DiagnosticEventKind, GalleryOperation};

// =============================================================================
// Report Metadata
// =============================================================================

/// Metadata about a diagnostic report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    /// When the report was generated (RFC 3339)
    pub generated_at: String,
    /// Version of the crate that generated the report
    pub version: String,
    /// When collection started (RFC 3339)
    pub collection_started_at: String,
    /// Duration of collection in milliseconds
    pub collection_duration_ms: u64,
    /// Number of events in the report
    pub event_count: usize,
    /// Events dropped because the buffer was full
    pub evicted_count: u64,
}

impl ReportMetadata {
    #[must_use]
    pub fn new(
        collection_started_at: DateTime<Utc>,
        collection_duration_ms: u64,
        event_count: usize,
        evicted_count: u64,
    ) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            collection_started_at: collection_started_at.to_rfc3339(),
            collection_duration_ms,
            event_count,
            evicted_count,
        }
    }
}

// =============================================================================
// Serializable Event
// =============================================================================

/// An event with its timestamp converted to milliseconds since collection
/// started.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerializableEvent {
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub kind: DiagnosticEventKind,
}

impl SerializableEvent {
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    pub fn new(event_timestamp: Instant, collection_start: Instant, kind: DiagnosticEventKind) -> Self {
        let timestamp_ms = event_timestamp
            .saturating_duration_since(collection_start)
            .as_millis() as u64;
        Self { timestamp_ms, kind }
    }
}

// =============================================================================
// Report Summary
// =============================================================================

/// Quick overview of a report without walking every event.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportSummary {
    /// Count of events by type (`user_action`, `operation`, `warning`, `error`)
    pub event_counts: BTreeMap<String, usize>,
    /// Successful load-more fetches
    pub load_more_count: usize,
    /// Items added by load-more fetches
    pub load_more_items: usize,
    /// Batches merged into the registry
    pub batches_registered: usize,
}

impl ReportSummary {
    #[must_use]
    pub fn from_events(events: &[SerializableEvent]) -> Self {
        let mut summary = Self::default();
        for event in events {
            *summary
                .event_counts
                .entry(event.kind.type_name().to_string())
                .or_insert(0) += 1;

            if let DiagnosticEventKind::Operation { operation } = &event.kind {
                match operation {
                    GalleryOperation::LoadMore { item_count, .. } => {
                        summary.load_more_count += 1;
                        summary.load_more_items += item_count;
                    }
                    GalleryOperation::BatchRegistered { .. } => summary.batches_registered += 1,
                }
            }
        }
        summary
    }
}

// =============================================================================
// Diagnostic Report
// =============================================================================

/// A complete diagnostic report ready for JSON export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticReport {
    pub metadata: ReportMetadata,
    pub summary: ReportSummary,
    pub events: Vec<SerializableEvent>,
}

impl DiagnosticReport {
    /// Creates a report, computing its summary from `events`.
    #[must_use]
    pub fn new(metadata: ReportMetadata, events: Vec<SerializableEvent>) -> Self {
        let summary = ReportSummary::from_events(&events);
        Self {
            metadata,
            summary,
            events,
        }
    }

    /// Exports the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
