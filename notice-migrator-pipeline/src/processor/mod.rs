//! Processor module for the notice migrator pipeline.
//!
//! Transforms raw notice records into message documents for the
//! destination store.

mod notice_processor;

pub use notice_processor::{
    derive_message_id, NoticeProcessor, TransformFailure, TransformOutcome,
};
