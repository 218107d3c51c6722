// SPDX-License-Identifier: MPL-2.0
//! Batch producer and load-more supplier ports.
//!
//! The gallery core never talks to HTTP or a database directly. Pages of
//! items arrive through these two narrow traits:
//!
//! - [`BatchProducer`]: `(offset, limit) -> items`, used to fill the grid
//! - [`LoadMoreSupplier`]: `() -> items`, "the page after what I already have"
//!
//! Both return boxed `'static` futures so the store can move them onto a
//! spawned task without borrowing the implementor.

use crate::domain::gallery::Item;
use futures_util::future::BoxFuture;
use std::fmt;
use std::future::Future;

// =============================================================================
// FetchError
// =============================================================================

/// Errors reported by producers and suppliers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The backing service could not be reached.
    Network(String),

    /// The backing service answered but has nothing to serve right now.
    Unavailable,

    /// Anything else, with a raw message.
    Other(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "Network error: {msg}"),
            FetchError::Unavailable => write!(f, "Content listing unavailable"),
            FetchError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Result of a single page fetch.
pub type FetchResult = Result<Vec<Item>, FetchError>;

// =============================================================================
// BatchProducer
// =============================================================================

/// Port for fetching a contiguous window of items.
///
/// Implementations are typically backed by a paginated content-listing
/// endpoint. Calls may resolve in any order.
pub trait BatchProducer: Send + Sync {
    /// Fetches up to `limit` items starting at absolute `offset`.
    fn fetch(&self, offset: usize, limit: usize) -> BoxFuture<'static, FetchResult>;
}

/// Adapter turning a closure into a [`BatchProducer`].
pub struct FnProducer<F>(F);

/// Wraps a closure `(offset, limit) -> Future<FetchResult>` as a producer.
pub fn producer_fn<F, Fut>(f: F) -> FnProducer<F>
where
    F: Fn(usize, usize) -> Fut + Send + Sync,
    Fut: Future<Output = FetchResult> + Send + 'static,
{
    FnProducer(f)
}

impl<F, Fut> BatchProducer for FnProducer<F>
where
    F: Fn(usize, usize) -> Fut + Send + Sync,
    Fut: Future<Output = FetchResult> + Send + 'static,
{
    fn fetch(&self, offset: usize, limit: usize) -> BoxFuture<'static, FetchResult> {
        Box::pin((self.0)(offset, limit))
    }
}

// =============================================================================
// LoadMoreSupplier
// =============================================================================

/// Port for on-demand forward pagination while the viewer is open.
pub trait LoadMoreSupplier: Send + Sync {
    /// Fetches the page following everything already known.
    ///
    /// Called with the store's state lock held, at the moment the load-more
    /// starts; the result is merged at the registry length seen then. The
    /// call itself must not issue commands on the store, only the returned
    /// future may do async work.
    fn next_page(&self) -> BoxFuture<'static, FetchResult>;
}

/// Adapter turning a closure into a [`LoadMoreSupplier`].
pub struct FnSupplier<F>(F);

/// Wraps a closure `() -> Future<FetchResult>` as a load-more supplier.
pub fn supplier_fn<F, Fut>(f: F) -> FnSupplier<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = FetchResult> + Send + 'static,
{
    FnSupplier(f)
}

impl<F, Fut> LoadMoreSupplier for FnSupplier<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = FetchResult> + Send + 'static,
{
    fn next_page(&self) -> BoxFuture<'static, FetchResult> {
        Box::pin((self.0)())
    }
}

/// Callback invoked when the viewer closes, with the session's
/// `has_loaded_more` flag.
pub type ModalCloseCallback = std::sync::Arc<dyn Fn(bool) + Send + Sync>;
