//! # Notice Migrator Shared
//!
//! Shared types and data structures for the notice migration toolkit.
//!
//! This crate defines the source record shape read from the notice search
//! index and the target message document written to the chat-message store,
//! including the payload embedded inside each message.

pub mod message;
pub mod notice;

pub use message::{
    MessageContent, MessageDocument, NoticeInfo, NoticePayload, PayloadSenderInfo, TextContent,
    NOTICE_STATUS_SENT, NOTIFICATION_CHANNEL_PREFIX, NOTIFICATION_SENDER_ID, NOTIFICATION_TAG,
    RECIPIENT_STUDENT,
};
pub use notice::{EntityData, NoticeRecord, SenderInfo, SENDER_TYPE_TEACHER};
