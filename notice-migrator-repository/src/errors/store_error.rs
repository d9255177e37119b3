//! Message store error types.
//!
//! This module defines the error types that can occur while writing to the
//! destination message store.

use thiserror::Error;

/// Errors that can occur during message store operations.
///
/// Per-document insert failures are not errors; they are reported in
/// [`crate::InsertSummary`]. These variants cover whole-call failures only.
#[derive(Debug, Clone, Error)]
pub enum MessageStoreError {
    /// Failed to establish connection to the document store.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A bulk insert failed as a whole (not per-document).
    #[error("Insert error: {0}")]
    InsertError(String),

    /// Failed to count documents in the destination collection.
    #[error("Count error: {0}")]
    CountError(String),
}

impl MessageStoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an insert error.
    pub fn insert(msg: impl Into<String>) -> Self {
        Self::InsertError(msg.into())
    }

    /// Create a count error.
    pub fn count(msg: impl Into<String>) -> Self {
        Self::CountError(msg.into())
    }
}
