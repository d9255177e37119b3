//! OpenSearch query builders for the notice migration.

use serde_json::{json, Value};

/// Build the liveness query for live notice records.
///
/// The query matches records whose `expiry` is either in the future or `0`
/// (never expires), using a bool `should` with `minimum_should_match: 1`.
/// Results are sorted by `created_at` ascending; documents without a
/// `created_at` sort first so the oldest backfill records migrate before
/// anything else.
pub fn build_live_notice_query(page_size: i64, now: i64) -> Value {
    json!({
        "size": page_size,
        "query": {
            "bool": {
                "should": [
                    { "range": { "expiry": { "gt": now } } },
                    { "term": { "expiry": 0 } }
                ],
                "minimum_should_match": 1
            }
        },
        "sort": [
            {
                "created_at": {
                    "order": "asc",
                    "missing": "_first"
                }
            }
        ]
    })
}

/// Build the scroll continuation request body.
pub fn build_scroll_request(scroll_ttl: &str, scroll_id: &str) -> Value {
    json!({
        "scroll": scroll_ttl,
        "scroll_id": scroll_id
    })
}

/// Build the scroll release request body.
pub fn build_clear_scroll_request(scroll_id: &str) -> Value {
    json!({
        "scroll_id": [scroll_id]
    })
}
