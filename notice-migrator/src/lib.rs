//! # Notice Migrator
//!
//! Main library for the notice migration job.
//!
//! This crate provides the entry point and configuration for running
//! the notice migration pipeline.

pub mod config;

pub use config::Dependencies;

use thiserror::Error;

/// Errors that can occur during migrator initialization or execution.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] notice_migrator_pipeline::PipelineError),

    /// Source index error.
    #[error("Source index error: {0}")]
    SourceError(#[from] notice_migrator_repository::SourceIndexError),

    /// Message store error.
    #[error("Message store error: {0}")]
    StoreError(#[from] notice_migrator_repository::MessageStoreError),
}

impl MigrationError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
