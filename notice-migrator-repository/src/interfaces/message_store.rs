//! Message store trait definition.
//!
//! This module defines the abstract interface for the destination message
//! store, allowing for different document store implementations and mock
//! implementations in tests.

use async_trait::async_trait;

use crate::errors::MessageStoreError;
use crate::types::InsertSummary;
use notice_migrator_shared::MessageDocument;

/// Abstracts the destination chat-message store.
///
/// The migration is insert-only: there is no update or delete operation on
/// purpose.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert a batch of documents with unordered semantics.
    ///
    /// One failing document (e.g. a duplicate identifier) does not block
    /// insertion of the remaining documents. Per-document failures are
    /// reported in the returned [`InsertSummary`]; only a whole-call
    /// failure (connection loss) is an `Err`.
    async fn insert_many(
        &self,
        documents: &[MessageDocument],
    ) -> Result<InsertSummary, MessageStoreError>;

    /// Count the documents currently in the destination collection.
    ///
    /// Used as a pre-flight sanity check and for dry-run reporting.
    async fn count_documents(&self) -> Result<u64, MessageStoreError>;
}
