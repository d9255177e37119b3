//! Notice source trait definition.
//!
//! This module defines the abstract interface for the paginated notice
//! feed, allowing for different backend implementations (OpenSearch,
//! Elasticsearch, etc.) and mock implementations in tests.

use async_trait::async_trait;

use crate::errors::SourceIndexError;
use crate::types::{ScrollCursor, ScrollPage};

/// Abstracts the paginated source of notice records.
///
/// Pagination is cursor-based: `open_scroll` runs the liveness query and
/// returns the first page plus a cursor valid for a fixed window;
/// `next_page` advances the cursor until a page with zero records signals
/// exhaustion. Cursors are opaque values owned by the caller, never hidden
/// state inside the implementation.
///
/// All methods return `Result<T, SourceIndexError>`; errors propagate to
/// the caller without retries.
#[async_trait]
pub trait NoticeSource: Send + Sync {
    /// Run the initial liveness query and return the first page.
    ///
    /// The query matches records that have not expired (`expiry` in the
    /// future or `0`), sorted by `created_at` ascending.
    async fn open_scroll(&self) -> Result<ScrollPage, SourceIndexError>;

    /// Fetch the page after `cursor`.
    ///
    /// An empty page means the scroll is exhausted; the returned cursor is
    /// still valid for release.
    async fn next_page(&self, cursor: &ScrollCursor) -> Result<ScrollPage, SourceIndexError>;

    /// Release a cursor on the backend.
    ///
    /// Backends expire cursors on their own after the scroll window, so
    /// failures here are safe to ignore.
    async fn clear_scroll(&self, cursor: ScrollCursor) -> Result<(), SourceIndexError>;
}
