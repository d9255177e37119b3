//! Source record shapes as stored in the notice search index.
//!
//! Records are deserialized straight from a search hit's `_source`. Every
//! field is defaulted so that sparsely populated documents still parse;
//! only wrong-typed values fail deserialization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sender type value that marks a teacher-originated notice.
pub const SENDER_TYPE_TEACHER: &str = "NOTICE_SENDER_TEACHER";

/// A notice record as indexed in the source search index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoticeRecord {
    /// The user this notice was delivered to.
    #[serde(default)]
    pub user_id: String,
    /// Identifier of the notice entity itself.
    #[serde(default)]
    pub entity_id: String,
    /// Expiry as epoch seconds; `0` means the notice never expires.
    #[serde(default)]
    pub expiry: i64,
    /// Creation time as epoch seconds; absent in older documents.
    #[serde(default)]
    pub created_at: Option<i64>,
    /// Read time as epoch seconds; `0` when unread.
    #[serde(default)]
    pub read_at: i64,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub category: String,
    /// Nested notice content.
    #[serde(default)]
    pub entity_data: EntityData,
}

/// Nested notice content carried inside a [`NoticeRecord`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityData {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Attached media entries; shape varies by notice type.
    #[serde(default)]
    pub media: Vec<Value>,
    #[serde(default)]
    pub sender_info: SenderInfo,
}

/// Sender metadata carried inside [`EntityData`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SenderInfo {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub sender_type: String,
}

impl SenderInfo {
    /// Whether this notice was sent by a teacher.
    pub fn is_teacher(&self) -> bool {
        self.sender_type == SENDER_TYPE_TEACHER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_record() {
        let source = json!({
            "user_id": "u1",
            "entity_id": "e1",
            "expiry": 1700000000,
            "created_at": 1690000000,
            "priority": "HIGH",
            "category": "HOLIDAY",
            "entity_data": {
                "title": "Holiday",
                "description": "School closed",
                "media": [{"url": "https://example.com/a.png"}],
                "sender_info": {
                    "sender": "s1",
                    "sender_type": "NOTICE_SENDER_TEACHER"
                }
            }
        });

        let record: NoticeRecord = serde_json::from_value(source).unwrap();

        assert_eq!(record.user_id, "u1");
        assert_eq!(record.entity_id, "e1");
        assert_eq!(record.expiry, 1700000000);
        assert_eq!(record.created_at, Some(1690000000));
        assert_eq!(record.entity_data.title, "Holiday");
        assert_eq!(record.entity_data.media.len(), 1);
        assert!(record.entity_data.sender_info.is_teacher());
    }

    #[test]
    fn test_deserialize_sparse_record() {
        // Only identifiers present; everything else defaults.
        let source = json!({ "user_id": "u2", "entity_id": "e2" });

        let record: NoticeRecord = serde_json::from_value(source).unwrap();

        assert_eq!(record.expiry, 0);
        assert_eq!(record.created_at, None);
        assert_eq!(record.read_at, 0);
        assert!(record.entity_data.title.is_empty());
        assert!(record.entity_data.media.is_empty());
        assert!(!record.entity_data.sender_info.is_teacher());
    }

    #[test]
    fn test_deserialize_rejects_wrong_typed_entity_data() {
        let source = json!({
            "user_id": "u3",
            "entity_id": "e3",
            "entity_data": "not-an-object"
        });

        assert!(serde_json::from_value::<NoticeRecord>(source).is_err());
    }
}
