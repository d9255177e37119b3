//! MongoDB message store implementation.
//!
//! This module provides the concrete implementation of `MessageStore`
//! using the MongoDB Rust driver's unordered bulk insert.

use async_trait::async_trait;
use mongodb::{
    error::{ErrorKind, Error as MongoError},
    options::InsertManyOptions,
    Client, Collection,
};
use tracing::{debug, error, info};

use crate::errors::MessageStoreError;
use crate::interfaces::MessageStore;
use crate::types::{InsertFailure, InsertSummary};
use notice_migrator_shared::MessageDocument;

/// MongoDB-backed message store.
///
/// Inserts use unordered semantics, so a duplicate `_id` (a re-run of an
/// already-migrated record) fails individually without blocking the rest
/// of the batch.
pub struct MongoMessageStore {
    collection: Collection<MessageDocument>,
}

impl MongoMessageStore {
    /// Connect to MongoDB and bind the destination collection.
    ///
    /// # Arguments
    ///
    /// * `uri` - The MongoDB connection string
    /// * `database` - Destination database name
    /// * `collection` - Destination collection name
    ///
    /// # Returns
    ///
    /// * `Ok(MongoMessageStore)` - A new store instance
    /// * `Err(MessageStoreError)` - If the connection string is invalid
    pub async fn new(
        uri: &str,
        database: &str,
        collection: &str,
    ) -> Result<Self, MessageStoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| MessageStoreError::connection(e.to_string()))?;

        let collection = client
            .database(database)
            .collection::<MessageDocument>(collection);

        info!(
            database = %database,
            collection = %collection.name(),
            "Created MongoDB message store"
        );

        Ok(Self { collection })
    }

    /// Extract per-document failures from a bulk-write error.
    ///
    /// Returns `None` when the error is not a bulk-write failure (e.g. the
    /// connection dropped), in which case the whole call failed.
    fn bulk_write_failures(error: &MongoError) -> Option<Vec<InsertFailure>> {
        match error.kind.as_ref() {
            ErrorKind::BulkWrite(failure) => {
                let failures = failure
                    .write_errors
                    .as_ref()
                    .map(|errors| {
                        errors
                            .iter()
                            .map(|write_error| InsertFailure {
                                index: write_error.index,
                                message: write_error.message.clone(),
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                Some(failures)
            }
            _ => None,
        }
    }
}

#[async_trait]
impl MessageStore for MongoMessageStore {
    /// Insert a batch of message documents with unordered semantics.
    ///
    /// Per-document write errors are logged individually and reported in
    /// the summary; the call only fails when the store rejects the request
    /// as a whole.
    async fn insert_many(
        &self,
        documents: &[MessageDocument],
    ) -> Result<InsertSummary, MessageStoreError> {
        if documents.is_empty() {
            return Ok(InsertSummary::complete(0));
        }

        info!(count = documents.len(), "Inserting documents into message store");

        let options = InsertManyOptions::builder().ordered(false).build();

        match self.collection.insert_many(documents, options).await {
            Ok(result) => {
                debug!(inserted = result.inserted_ids.len(), "Bulk insert succeeded");
                Ok(InsertSummary {
                    attempted: documents.len(),
                    inserted: result.inserted_ids.len(),
                    failures: Vec::new(),
                })
            }
            Err(e) => match Self::bulk_write_failures(&e) {
                Some(failures) => {
                    for failure in &failures {
                        error!(
                            index = failure.index,
                            message = %failure.message,
                            "Document rejected during bulk insert"
                        );
                    }
                    Ok(InsertSummary {
                        attempted: documents.len(),
                        inserted: documents.len() - failures.len(),
                        failures,
                    })
                }
                None => Err(MessageStoreError::insert(e.to_string())),
            },
        }
    }

    /// Count documents in the destination collection.
    async fn count_documents(&self) -> Result<u64, MessageStoreError> {
        let count = self
            .collection
            .count_documents(None, None)
            .await
            .map_err(|e| MessageStoreError::count(e.to_string()))?;

        debug!(count = count, "Destination collection count");
        Ok(count)
    }
}
