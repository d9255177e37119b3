//! Interface definitions for the migration backends.
//!
//! This module defines the abstract `NoticeSource` and `MessageStore`
//! traits that allow for dependency injection and swappable backend
//! implementations.

mod message_store;
mod notice_source;

pub use message_store::MessageStore;
pub use notice_source::NoticeSource;
