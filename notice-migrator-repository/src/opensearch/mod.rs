//! OpenSearch implementation of the notice source.
//!
//! This module provides a concrete implementation of `NoticeSource`
//! using OpenSearch's scroll API as the backend.

mod client;
mod queries;

pub use client::{OpenSearchNoticeSource, SourceIndexConfig};
