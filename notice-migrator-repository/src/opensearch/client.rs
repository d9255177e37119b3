//! OpenSearch notice source implementation.
//!
//! This module provides the concrete implementation of `NoticeSource`
//! using the OpenSearch Rust client's scroll API.

use async_trait::async_trait;
use chrono::Utc;
use opensearch::{
    auth::Credentials,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    ClearScrollParts, OpenSearch, ScrollParts, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::errors::SourceIndexError;
use crate::interfaces::NoticeSource;
use crate::opensearch::queries;
use crate::types::{ScrollCursor, ScrollPage};

/// Default scroll window. Each page fetch renews it.
const DEFAULT_SCROLL_TTL: &str = "5m";

/// Configuration for the OpenSearch notice source.
#[derive(Debug, Clone)]
pub struct SourceIndexConfig {
    /// The index holding notice records.
    pub index: String,
    /// Number of records per scroll page.
    pub page_size: i64,
    /// Scroll cursor lifetime, e.g. `"5m"`.
    pub scroll_ttl: String,
}

impl SourceIndexConfig {
    /// Create a config for the given index and page size with the default
    /// scroll window.
    pub fn new(index: impl Into<String>, page_size: i64) -> Self {
        Self {
            index: index.into(),
            page_size,
            scroll_ttl: DEFAULT_SCROLL_TTL.to_string(),
        }
    }
}

/// OpenSearch-backed notice source.
///
/// Runs the liveness query against the configured index and pages through
/// matches with the scroll API.
pub struct OpenSearchNoticeSource {
    client: OpenSearch,
    config: SourceIndexConfig,
}

impl OpenSearchNoticeSource {
    /// Create a new source connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "https://search.internal:443")
    /// * `credentials` - Optional basic-auth username and password
    /// * `config` - Index name, page size, and scroll window
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchNoticeSource)` - A new source instance
    /// * `Err(SourceIndexError)` - If connection setup fails
    pub fn new(
        url: &str,
        credentials: Option<(String, String)>,
        config: SourceIndexConfig,
    ) -> Result<Self, SourceIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SourceIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some((username, password)) = credentials {
            builder = builder.auth(Credentials::Basic(username, password));
        }
        let transport = builder
            .build()
            .map_err(|e| SourceIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            index = %config.index,
            page_size = config.page_size,
            "Created OpenSearch notice source"
        );

        Ok(Self { client, config })
    }

    /// Parse a search or scroll response body into a page.
    fn parse_scroll_page(body: &Value) -> Result<ScrollPage, SourceIndexError> {
        let scroll_id = body["_scroll_id"]
            .as_str()
            .ok_or_else(|| SourceIndexError::parse("response missing _scroll_id"))?;

        let hits = body["hits"]["hits"]
            .as_array()
            .ok_or_else(|| SourceIndexError::parse("response missing hits.hits"))?;

        let records: Vec<Value> = hits
            .iter()
            .filter_map(|hit| hit.get("_source").cloned())
            .collect();

        Ok(ScrollPage {
            records,
            cursor: ScrollCursor::new(scroll_id),
        })
    }
}

#[async_trait]
impl NoticeSource for OpenSearchNoticeSource {
    /// Run the initial liveness query and open a scroll over the matches.
    ///
    /// Expiry is evaluated against the wall clock at call time, so records
    /// expiring mid-migration are filtered by the snapshot the scroll was
    /// opened with, not re-evaluated per page.
    async fn open_scroll(&self) -> Result<ScrollPage, SourceIndexError> {
        let now = Utc::now().timestamp();
        let query = queries::build_live_notice_query(self.config.page_size, now);

        debug!(index = %self.config.index, now = now, "Executing initial scroll query");

        let response = self
            .client
            .search(SearchParts::Index(&[self.config.index.as_str()]))
            .scroll(&self.config.scroll_ttl)
            .body(query)
            .send()
            .await
            .map_err(|e| SourceIndexError::query(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Initial scroll query failed");
            return Err(SourceIndexError::query(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SourceIndexError::parse(e.to_string()))?;

        let page = Self::parse_scroll_page(&body)?;
        debug!(count = page.records.len(), "Fetched initial scroll page");
        Ok(page)
    }

    /// Advance the scroll by one page.
    async fn next_page(&self, cursor: &ScrollCursor) -> Result<ScrollPage, SourceIndexError> {
        let response = self
            .client
            .scroll(ScrollParts::None)
            .body(queries::build_scroll_request(
                &self.config.scroll_ttl,
                cursor.as_str(),
            ))
            .send()
            .await
            .map_err(|e| SourceIndexError::scroll(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Scroll continuation failed");
            return Err(SourceIndexError::scroll(format!(
                "Scroll failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SourceIndexError::parse(e.to_string()))?;

        let page = Self::parse_scroll_page(&body)?;
        debug!(count = page.records.len(), "Fetched scroll page");
        Ok(page)
    }

    /// Release a scroll cursor on the server.
    ///
    /// A 404 is acceptable: the cursor may have expired already.
    async fn clear_scroll(&self, cursor: ScrollCursor) -> Result<(), SourceIndexError> {
        let response = self
            .client
            .clear_scroll(ClearScrollParts::None)
            .body(queries::build_clear_scroll_request(cursor.as_str()))
            .send()
            .await
            .map_err(|e| SourceIndexError::scroll(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %error_body, "Clear scroll failed");
            return Err(SourceIndexError::scroll(format!(
                "Clear scroll failed with status {}: {}",
                status, error_body
            )));
        }

        debug!("Scroll cursor released");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_scroll_page() {
        let body = json!({
            "_scroll_id": "cursor-abc",
            "hits": {
                "hits": [
                    { "_source": { "user_id": "u1", "entity_id": "e1" } },
                    { "_source": { "user_id": "u2", "entity_id": "e2" } }
                ]
            }
        });

        let page = OpenSearchNoticeSource::parse_scroll_page(&body).unwrap();

        assert_eq!(page.cursor.as_str(), "cursor-abc");
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0]["user_id"], "u1");
    }

    #[test]
    fn test_parse_scroll_page_empty() {
        let body = json!({
            "_scroll_id": "cursor-abc",
            "hits": { "hits": [] }
        });

        let page = OpenSearchNoticeSource::parse_scroll_page(&body).unwrap();

        assert!(page.is_empty());
    }

    #[test]
    fn test_parse_scroll_page_missing_scroll_id() {
        let body = json!({
            "hits": { "hits": [] }
        });

        let result = OpenSearchNoticeSource::parse_scroll_page(&body);

        assert!(matches!(result, Err(SourceIndexError::ParseError(_))));
    }

    #[test]
    fn test_source_config_defaults() {
        let config = SourceIndexConfig::new("user_communication", 1000);

        assert_eq!(config.index, "user_communication");
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.scroll_ttl, "5m");
    }
}
