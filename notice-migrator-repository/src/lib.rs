//! # Notice Migrator Repository
//!
//! This crate provides traits and implementations for the two outbound
//! connections of the notice migration job: the source search index that
//! holds notice records and the destination document store that holds chat
//! messages. It includes definitions for errors, interfaces, and concrete
//! implementations for OpenSearch and MongoDB.

pub mod errors;
pub mod interfaces;
pub mod mongo;
pub mod opensearch;
mod types;

pub use errors::{MessageStoreError, SourceIndexError};
pub use interfaces::{MessageStore, NoticeSource};
pub use mongo::MongoMessageStore;
pub use opensearch::{OpenSearchNoticeSource, SourceIndexConfig};
pub use types::{InsertFailure, InsertSummary, ScrollCursor, ScrollPage};
