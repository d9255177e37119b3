//! Source index error types.
//!
//! This module defines the error types that can occur while querying the
//! notice search index.

use thiserror::Error;

/// Errors that can occur during source index operations.
#[derive(Debug, Clone, Error)]
pub enum SourceIndexError {
    /// Failed to establish connection to the search index.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Search query execution failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Scroll continuation or release failed.
    #[error("Scroll error: {0}")]
    ScrollError(String),

    /// Failed to parse a response from the search index.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SourceIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a scroll error.
    pub fn scroll(msg: impl Into<String>) -> Self {
        Self::ScrollError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
