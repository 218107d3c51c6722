// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for recording gallery activity.
//!
//! The gallery core never panics or returns errors from its async paths;
//! failures are absorbed and recorded here instead. Events are captured
//! through cheap [`DiagnosticsHandle`]s, stored in a memory-bounded circular
//! buffer, and can be exported as a JSON report.
//!
//! # Architecture
//!
//! - [`CircularBuffer`]: Generic ring buffer with configurable capacity
//! - [`DiagnosticEvent`]: Timestamped event (user action, operation, warning, error)
//! - [`DiagnosticsCollector`]: Owner of the buffer, hands out handles
//! - [`BufferCapacity`]: Newtype for validated buffer capacity bounds

mod buffer;
mod collector;
mod events;
mod report;

pub use buffer::{BufferCapacity, CircularBuffer};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle};
pub use events::{
    DiagnosticEvent, DiagnosticEventKind, ErrorEvent, ErrorType, GalleryOperation, UserAction,
    WarningEvent, WarningType,
};
pub use report::{DiagnosticReport, ReportMetadata, ReportSummary, SerializableEvent};
