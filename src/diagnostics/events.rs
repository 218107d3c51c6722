// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for gallery activity.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Viewer commands issued by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UserAction {
    /// Viewer opened by index (registry lookup).
    OpenAtIndex {
        /// Absolute index requested.
        index: usize,
    },

    /// Viewer opened from a click carrying the item.
    OpenExplicit {
        /// Absolute index of the clicked item.
        index: usize,
    },

    /// Move to the next item.
    NavigateNext,

    /// Move to the previous item.
    NavigatePrevious,

    /// Viewer closed.
    CloseViewer {
        /// Whether any load-more succeeded during the session.
        has_loaded_more: bool,
    },
}

/// Work performed by the gallery core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum GalleryOperation {
    /// A rendered batch was merged into the registry.
    BatchRegistered {
        /// Absolute offset of the batch.
        offset: usize,
        /// Number of items in the batch.
        count: usize,
    },

    /// A load-more fetch completed successfully.
    LoadMore {
        /// Registry length captured before the fetch.
        base_offset: usize,
        /// Number of items returned.
        item_count: usize,
        /// Time spent waiting on the supplier.
        duration_ms: u64,
    },
}

/// Categories of non-fatal problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    /// A batch producer failed; its slots stay empty.
    BatchFetchFailed,
    /// A background task could not be spawned (no async runtime).
    MissingRuntime,
    /// Anything else.
    Other,
}

/// Categories of absorbed failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The load-more supplier rejected.
    LoadMoreFailed,
    /// Anything else.
    Other,
}

/// A warning with its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningEvent {
    /// Warning category.
    pub warning_type: WarningType,
    /// Human readable description.
    pub message: String,
}

impl WarningEvent {
    #[must_use]
    pub fn new(warning_type: WarningType, message: impl Into<String>) -> Self {
        Self {
            warning_type,
            message: message.into(),
        }
    }
}

/// An error with its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Error category.
    pub error_type: ErrorType,
    /// Human readable description.
    pub message: String,
}

impl ErrorEvent {
    #[must_use]
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
        }
    }
}

/// A diagnostic event with the monotonic time it was captured.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    pub timestamp: Instant,
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Instant::now(),
            kind,
        }
    }
}

/// The type and payload of a diagnostic event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    UserAction { action: UserAction },
    Operation { operation: GalleryOperation },
    Warning { event: WarningEvent },
    Error { event: ErrorEvent },
}

impl DiagnosticEventKind {
    /// Stable name of the variant, used for report summaries.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            DiagnosticEventKind::UserAction { .. } => "user_action",
            DiagnosticEventKind::Operation { .. } => "operation",
            DiagnosticEventKind::Warning { .. } => "warning",
            DiagnosticEventKind::Error { .. } => "error",
        }
    }
}
