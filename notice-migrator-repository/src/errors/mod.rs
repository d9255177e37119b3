//! Error types for the notice migrator repository.

mod source_error;
mod store_error;

pub use source_error::SourceIndexError;
pub use store_error::MessageStoreError;
