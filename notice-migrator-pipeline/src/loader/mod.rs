//! Loader module for the notice migrator pipeline.
//!
//! Writes transformed documents into the destination message store.

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::PipelineError;
use notice_migrator_repository::{InsertSummary, MessageStore};
use notice_migrator_shared::MessageDocument;

/// Loader that bulk-inserts documents into the message store.
///
/// Per-document failures inside a batch are logged and reported in the
/// summary; only a whole-call store failure propagates as an error.
pub struct MessageLoader {
    store: Arc<dyn MessageStore>,
}

impl MessageLoader {
    /// Create a new loader over the given store.
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Insert a batch of documents.
    pub async fn load(
        &self,
        documents: &[MessageDocument],
    ) -> Result<InsertSummary, PipelineError> {
        if documents.is_empty() {
            return Ok(InsertSummary::complete(0));
        }

        let summary = self.store.insert_many(documents).await?;

        if summary.failed() > 0 {
            // The store already logged each rejected document.
            warn!(
                attempted = summary.attempted,
                inserted = summary.inserted,
                failed = summary.failed(),
                "Bulk insert completed with per-document failures"
            );
        } else {
            info!(inserted = summary.inserted, "Bulk insert completed");
        }

        Ok(summary)
    }

    /// Report the destination collection's current document count.
    pub async fn destination_count(&self) -> Result<u64, PipelineError> {
        let count = self.store.count_documents().await?;
        info!(count = count, "Destination collection document count");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use notice_migrator_repository::{InsertFailure, MessageStoreError};
    use notice_migrator_shared::MessageContent;

    /// Mock store counting calls and optionally rejecting documents.
    struct MockMessageStore {
        insert_calls: AtomicUsize,
        reject_first: bool,
    }

    impl MockMessageStore {
        fn new() -> Self {
            Self {
                insert_calls: AtomicUsize::new(0),
                reject_first: false,
            }
        }

        fn rejecting_first() -> Self {
            Self {
                insert_calls: AtomicUsize::new(0),
                reject_first: true,
            }
        }
    }

    #[async_trait]
    impl MessageStore for MockMessageStore {
        async fn insert_many(
            &self,
            documents: &[MessageDocument],
        ) -> Result<InsertSummary, MessageStoreError> {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            if self.reject_first {
                Ok(InsertSummary {
                    attempted: documents.len(),
                    inserted: documents.len() - 1,
                    failures: vec![InsertFailure {
                        index: 0,
                        message: "E11000 duplicate key error".to_string(),
                    }],
                })
            } else {
                Ok(InsertSummary::complete(documents.len()))
            }
        }

        async fn count_documents(&self) -> Result<u64, MessageStoreError> {
            Ok(42)
        }
    }

    fn document(user_id: &str, entity_id: &str) -> MessageDocument {
        MessageDocument {
            id: crate::processor::derive_message_id(user_id, entity_id),
            channel_id: format!("notification_{}", user_id),
            sender_id: "notification-center-id".to_string(),
            seq_id: 0,
            reply_to_id: 0,
            r#type: 0,
            state: 0,
            state_code: 0,
            content: MessageContent::from_payload_json("{}".to_string()),
            created_by: "notification-center-id".to_string(),
            created_at: 0,
            updated_by: String::new(),
            updated_at: 0,
            expire_at: 0,
            tags: vec![9],
            reference_id: entity_id.to_string(),
            read_at: 0,
        }
    }

    #[tokio::test]
    async fn test_load_success() {
        let store = Arc::new(MockMessageStore::new());
        let loader = MessageLoader::new(store.clone());

        let documents = vec![document("u1", "e1"), document("u2", "e2")];
        let summary = loader.load(&documents).await.unwrap();

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.failed(), 0);
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_reports_partial_failures() {
        let store = Arc::new(MockMessageStore::rejecting_first());
        let loader = MessageLoader::new(store);

        let documents = vec![document("u1", "e1"), document("u2", "e2")];
        let summary = loader.load(&documents).await.unwrap();

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.attempted, summary.inserted + summary.failed());
    }

    #[tokio::test]
    async fn test_empty_batch_skips_the_store() {
        let store = Arc::new(MockMessageStore::new());
        let loader = MessageLoader::new(store.clone());

        let summary = loader.load(&[]).await.unwrap();

        assert_eq!(summary.attempted, 0);
        assert_eq!(store.insert_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_destination_count() {
        let store = Arc::new(MockMessageStore::new());
        let loader = MessageLoader::new(store);

        assert_eq!(loader.destination_count().await.unwrap(), 42);
    }
}
