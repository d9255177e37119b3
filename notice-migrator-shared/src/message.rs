//! Target message document written to the chat-message store.
//!
//! The destination models a chat message whose text content carries a
//! JSON-encoded notice payload. Field names and fixed values follow the
//! message collection's wire format.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed sender identity stamped on every migrated message.
pub const NOTIFICATION_SENDER_ID: &str = "notification-center-id";

/// Channel id prefix; the full channel is `notification_{user_id}`.
pub const NOTIFICATION_CHANNEL_PREFIX: &str = "notification_";

/// Tag marking migrated notification messages.
pub const NOTIFICATION_TAG: i32 = 9;

/// Recipient code for student recipients in the embedded payload.
pub const RECIPIENT_STUDENT: i32 = 1;

/// Status code for already-sent notices in the embedded payload.
pub const NOTICE_STATUS_SENT: i32 = 2;

/// A message document in the destination collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDocument {
    /// Deterministic 12-byte identifier derived from `(user_id, entity_id)`.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub channel_id: String,
    pub sender_id: String,
    pub seq_id: i64,
    pub reply_to_id: i64,
    pub r#type: i32,
    pub state: i32,
    pub state_code: i32,
    pub content: MessageContent,
    pub created_by: String,
    pub created_at: i64,
    pub updated_by: String,
    pub updated_at: i64,
    pub expire_at: i64,
    pub tags: Vec<i32>,
    /// The source notice's `entity_id`.
    pub reference_id: String,
    pub read_at: i64,
}

/// Message content wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageContent {
    pub text: TextContent,
}

/// Text content; `text` holds a JSON-encoded [`NoticePayload`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

impl MessageContent {
    /// Wrap an already-serialized payload string.
    pub fn from_payload_json(text: String) -> Self {
        Self {
            text: TextContent { text },
        }
    }
}

/// Payload embedded as a JSON string at `content.text.text`.
///
/// The consuming chat client expects PascalCase keys at the top level and
/// snake_case keys inside `NoticeInfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NoticePayload {
    pub title: String,
    pub body: String,
    pub expanded_body: String,
    #[serde(rename = "ImageURL")]
    pub image_url: String,
    #[serde(rename = "ExpandedImageURL")]
    pub expanded_image_url: String,
    pub priority: i32,
    pub actions: Vec<Value>,
    pub notice_info: NoticeInfo,
}

impl NoticePayload {
    /// Build the standard payload shell around a notice.
    ///
    /// The top-level presentation fields are intentionally blank; the chat
    /// client renders the notice from `NoticeInfo`.
    pub fn wrap(notice_info: NoticeInfo) -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            expanded_body: String::new(),
            image_url: String::new(),
            expanded_image_url: String::new(),
            priority: 0,
            actions: Vec::new(),
            notice_info,
        }
    }
}

/// Notice detail block inside [`NoticePayload`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeInfo {
    pub notice_id: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub sender_info: PayloadSenderInfo,
    pub category: String,
    pub media: Vec<Value>,
    pub expiry: i64,
    pub recipient: i32,
    pub status: i32,
    pub created_by: String,
    pub created_at: i64,
}

/// Sender block inside [`NoticeInfo`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadSenderInfo {
    /// `1` when the notice was sent by a teacher, `0` otherwise.
    pub sender_type: i32,
    pub sender: String,
}
