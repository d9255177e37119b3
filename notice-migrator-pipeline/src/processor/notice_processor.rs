//! Notice processor implementation.
//!
//! Pure transformation of raw notice records into `MessageDocument`
//! structures. No I/O happens here; the processor can be exercised
//! entirely in memory.

use bson::oid::ObjectId;
use chrono::Utc;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::errors::PipelineError;
use notice_migrator_shared::{
    MessageContent, MessageDocument, NoticeInfo, NoticePayload, NoticeRecord, PayloadSenderInfo,
    NOTIFICATION_CHANNEL_PREFIX, NOTIFICATION_SENDER_ID, NOTIFICATION_TAG, NOTICE_STATUS_SENT,
    RECIPIENT_STUDENT,
};

/// Seconds in the one-year default retention window.
const ONE_YEAR_SECS: i64 = 365 * 24 * 60 * 60;

/// Derive the deterministic message identifier for a notice.
///
/// The identifier is the first 12 bytes of the SHA-256 digest of
/// `"{user_id}_{entity_id}"`, so the same source record always maps to the
/// same destination `_id` regardless of process restarts. Duplicate
/// migrations therefore collide on insert instead of multiplying.
pub fn derive_message_id(user_id: &str, entity_id: &str) -> ObjectId {
    let digest = Sha256::digest(format!("{}_{}", user_id, entity_id).as_bytes());
    let mut bytes = [0u8; 12];
    bytes.copy_from_slice(&digest[..12]);
    ObjectId::from_bytes(bytes)
}

/// A record that could not be transformed, with the reason.
#[derive(Debug)]
pub struct TransformFailure {
    /// The raw record as fetched.
    pub record: Value,
    /// Why the transform rejected it.
    pub error: PipelineError,
}

/// Result of transforming a batch.
///
/// Failures are collected alongside successes so the caller can report
/// them; a malformed record never aborts the batch.
#[derive(Debug, Default)]
pub struct TransformOutcome {
    /// Documents ready for insertion, in input order.
    pub documents: Vec<MessageDocument>,
    /// Records that were skipped, with their errors.
    pub failures: Vec<TransformFailure>,
}

/// Processor that transforms notice records into message documents.
pub struct NoticeProcessor;

impl NoticeProcessor {
    /// Create a new notice processor.
    pub fn new() -> Self {
        Self
    }

    /// Transform a batch of raw records.
    ///
    /// The transform time is sampled once per batch and used for every
    /// absent `created_at` and for the one-year expiry fallback.
    pub fn transform_batch(&self, raw: Vec<Value>) -> TransformOutcome {
        let now = Utc::now().timestamp();
        let mut outcome = TransformOutcome::default();

        for value in raw {
            match self.transform_record(&value, now) {
                Ok(document) => outcome.documents.push(document),
                Err(error) => outcome.failures.push(TransformFailure {
                    record: value,
                    error,
                }),
            }
        }

        debug!(
            documents = outcome.documents.len(),
            failures = outcome.failures.len(),
            "Transformed batch"
        );
        outcome
    }

    /// Transform a single raw record.
    fn transform_record(&self, raw: &Value, now: i64) -> Result<MessageDocument, PipelineError> {
        let record: NoticeRecord = serde_json::from_value(raw.clone())
            .map_err(|e| PipelineError::transform(e.to_string()))?;

        Self::build_document(record, now)
    }

    /// Build the destination document for a parsed notice.
    fn build_document(record: NoticeRecord, now: i64) -> Result<MessageDocument, PipelineError> {
        // 0 means "never expires"; those records get the one-year window
        // counted from transform time.
        let expire_at = if record.expiry != 0 {
            record.expiry
        } else {
            now + ONE_YEAR_SECS
        };
        let created_at = record.created_at.unwrap_or(now);

        let entity_data = record.entity_data;
        let sender = entity_data.sender_info.sender.clone();
        let sender_type = if entity_data.sender_info.is_teacher() {
            1
        } else {
            0
        };

        let notice_info = NoticeInfo {
            notice_id: record.entity_id.clone(),
            title: entity_data.title,
            description: entity_data.description,
            priority: record.priority,
            sender_info: PayloadSenderInfo {
                sender_type,
                sender: sender.clone(),
            },
            category: record.category,
            media: entity_data.media,
            expiry: expire_at,
            recipient: RECIPIENT_STUDENT,
            status: NOTICE_STATUS_SENT,
            created_by: sender,
            created_at,
        };

        let payload = NoticePayload::wrap(notice_info);
        let payload_json = serde_json::to_string(&payload)
            .map_err(|e| PipelineError::transform(e.to_string()))?;

        Ok(MessageDocument {
            id: derive_message_id(&record.user_id, &record.entity_id),
            channel_id: format!("{}{}", NOTIFICATION_CHANNEL_PREFIX, record.user_id),
            sender_id: NOTIFICATION_SENDER_ID.to_string(),
            seq_id: 0,
            reply_to_id: 0,
            r#type: 0,
            state: 0,
            state_code: 0,
            content: MessageContent::from_payload_json(payload_json),
            created_by: NOTIFICATION_SENDER_ID.to_string(),
            created_at,
            updated_by: String::new(),
            updated_at: 0,
            expire_at,
            tags: vec![NOTIFICATION_TAG],
            reference_id: record.entity_id,
            read_at: record.read_at,
        })
    }
}

impl Default for NoticeProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn teacher_notice() -> Value {
        json!({
            "user_id": "u1",
            "entity_id": "e1",
            "expiry": 0,
            "entity_data": {
                "title": "Holiday",
                "sender_info": {
                    "sender": "s1",
                    "sender_type": "NOTICE_SENDER_TEACHER"
                }
            }
        })
    }

    fn embedded_payload(document: &MessageDocument) -> Value {
        serde_json::from_str(&document.content.text.text).unwrap()
    }

    #[test]
    fn test_derive_message_id_is_deterministic() {
        let a = derive_message_id("u1", "e1");
        let b = derive_message_id("u1", "e1");
        let c = derive_message_id("u1", "e2");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_document_id_matches_derivation() {
        let processor = NoticeProcessor::new();
        let outcome = processor.transform_batch(vec![teacher_notice()]);

        assert_eq!(outcome.documents.len(), 1);
        assert_eq!(outcome.documents[0].id, derive_message_id("u1", "e1"));
    }

    #[test]
    fn test_teacher_notice_example() {
        let processor = NoticeProcessor::new();
        let outcome = processor.transform_batch(vec![teacher_notice()]);

        let document = &outcome.documents[0];
        assert_eq!(document.channel_id, "notification_u1");
        assert_eq!(document.reference_id, "e1");
        assert_eq!(document.sender_id, "notification-center-id");
        assert_eq!(document.tags, vec![9]);

        let payload = embedded_payload(document);
        assert_eq!(payload["NoticeInfo"]["sender_info"]["sender_type"], 1);
        assert_eq!(payload["NoticeInfo"]["title"], "Holiday");
        assert_eq!(payload["NoticeInfo"]["created_by"], "s1");
    }

    #[test]
    fn test_non_teacher_sender_flag_is_zero() {
        let processor = NoticeProcessor::new();
        let outcome = processor.transform_batch(vec![
            json!({
                "user_id": "u1",
                "entity_id": "e1",
                "entity_data": {
                    "sender_info": { "sender": "s1", "sender_type": "NOTICE_SENDER_ADMIN" }
                }
            }),
            json!({ "user_id": "u2", "entity_id": "e2" }),
        ]);

        for document in &outcome.documents {
            let payload = embedded_payload(document);
            assert_eq!(payload["NoticeInfo"]["sender_info"]["sender_type"], 0);
        }
    }

    #[test]
    fn test_zero_expiry_gets_one_year_window() {
        let processor = NoticeProcessor::new();
        let before = Utc::now().timestamp();
        let outcome = processor.transform_batch(vec![teacher_notice()]);
        let after = Utc::now().timestamp();

        let expire_at = outcome.documents[0].expire_at;
        assert!(expire_at >= before + ONE_YEAR_SECS);
        assert!(expire_at <= after + ONE_YEAR_SECS);
    }

    #[test]
    fn test_explicit_expiry_is_preserved() {
        let processor = NoticeProcessor::new();
        let outcome = processor.transform_batch(vec![json!({
            "user_id": "u1",
            "entity_id": "e1",
            "expiry": 1800000000i64
        })]);

        let document = &outcome.documents[0];
        assert_eq!(document.expire_at, 1800000000);

        let payload = embedded_payload(document);
        assert_eq!(payload["NoticeInfo"]["expiry"], 1800000000i64);
    }

    #[test]
    fn test_missing_entity_data_still_produces_a_document() {
        let processor = NoticeProcessor::new();
        let outcome = processor.transform_batch(vec![json!({
            "user_id": "u1",
            "entity_id": "e1"
        })]);

        assert_eq!(outcome.documents.len(), 1);
        assert!(outcome.failures.is_empty());

        let payload = embedded_payload(&outcome.documents[0]);
        assert_eq!(payload["NoticeInfo"]["title"], "");
        assert_eq!(payload["NoticeInfo"]["sender_info"]["sender_type"], 0);
    }

    #[test]
    fn test_malformed_record_is_isolated() {
        let processor = NoticeProcessor::new();
        let outcome = processor.transform_batch(vec![
            json!({ "user_id": "u1", "entity_id": "e1", "entity_data": "garbage" }),
            teacher_notice(),
        ]);

        // The bad record lands in failures; the good one is still produced.
        assert_eq!(outcome.documents.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].record["entity_data"], "garbage");
        assert!(matches!(
            outcome.failures[0].error,
            PipelineError::TransformError(_)
        ));
    }

    #[test]
    fn test_created_at_defaults_to_transform_time() {
        let processor = NoticeProcessor::new();
        let before = Utc::now().timestamp();
        let outcome = processor.transform_batch(vec![json!({
            "user_id": "u1",
            "entity_id": "e1"
        })]);
        let after = Utc::now().timestamp();

        let created_at = outcome.documents[0].created_at;
        assert!(created_at >= before && created_at <= after);
    }
}
