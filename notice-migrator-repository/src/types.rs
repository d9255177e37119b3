//! Cursor and result types shared by the repository interfaces.

use serde_json::Value;

/// Opaque handle for a paginated scroll over the source index.
///
/// The cursor is only valid for the backend's configured scroll window and
/// is replaced on every page; callers thread the most recent value through
/// [`crate::NoticeSource::next_page`] and must not interpret its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollCursor(String);

impl ScrollCursor {
    /// Wrap a backend-issued scroll identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw scroll identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of raw source records plus the cursor for the next page.
///
/// Records are the untyped `_source` values of the search hits; the
/// pipeline deserializes them so that a single malformed document can be
/// isolated instead of failing the whole page.
#[derive(Debug, Clone)]
pub struct ScrollPage {
    /// Raw `_source` values in index sort order.
    pub records: Vec<Value>,
    /// Cursor for the next page; an empty `records` list means exhaustion.
    pub cursor: ScrollCursor,
}

impl ScrollPage {
    /// Whether this page signals scroll exhaustion.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Outcome of an unordered bulk insert.
///
/// Partial failures (duplicate ids, document validation) are reported here
/// rather than raised, so one bad document never blocks the rest of the
/// batch.
#[derive(Debug, Clone)]
pub struct InsertSummary {
    /// Number of documents submitted.
    pub attempted: usize,
    /// Number of documents the store accepted.
    pub inserted: usize,
    /// Per-document failures, if any.
    pub failures: Vec<InsertFailure>,
}

impl InsertSummary {
    /// Summary for a fully successful insert of `attempted` documents.
    pub fn complete(attempted: usize) -> Self {
        Self {
            attempted,
            inserted: attempted,
            failures: Vec::new(),
        }
    }

    /// Number of documents the store rejected.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// A single rejected document within a bulk insert.
#[derive(Debug, Clone)]
pub struct InsertFailure {
    /// Position of the document in the submitted batch.
    pub index: usize,
    /// The store's error message for this document.
    pub message: String,
}
