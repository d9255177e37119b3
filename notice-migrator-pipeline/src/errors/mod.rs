//! Error types for the notice migrator pipeline.

use thiserror::Error;

use notice_migrator_repository::{MessageStoreError, SourceIndexError};

/// Errors that can occur in the migration pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fetching from the source index failed.
    #[error("Fetch error: {0}")]
    FetchError(#[from] SourceIndexError),

    /// A record could not be transformed.
    #[error("Transform error: {0}")]
    TransformError(String),

    /// The message store rejected a call as a whole.
    #[error("Store error: {0}")]
    StoreError(#[from] MessageStoreError),

    /// The chunked driver gave up.
    #[error("Driver error: {0}")]
    DriverError(String),
}

impl PipelineError {
    /// Create a transform error.
    pub fn transform(msg: impl Into<String>) -> Self {
        Self::TransformError(msg.into())
    }

    /// Create a driver error.
    pub fn driver(msg: impl Into<String>) -> Self {
        Self::DriverError(msg.into())
    }
}
