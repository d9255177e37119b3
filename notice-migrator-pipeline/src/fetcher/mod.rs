//! Fetcher module for the notice migrator pipeline.
//!
//! Pages through the source index, threading the scroll cursor explicitly
//! between calls so the driver can reset it after a failed iteration.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::PipelineError;
use notice_migrator_repository::{NoticeSource, ScrollCursor};

/// Where the fetcher is within the scroll.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScrollState {
    /// No query has been issued yet (or the cursor was reset).
    NotStarted,
    /// A scroll is open; the cursor points past the last fetched page.
    Active(ScrollCursor),
    /// The scroll returned an empty page; nothing more to fetch.
    Exhausted,
}

/// Fetcher that accumulates source records up to a caller-supplied limit.
///
/// Records beyond the limit that arrive in the same page are carried over
/// to the next `fetch` call instead of being dropped, so chunked callers
/// see every record exactly once regardless of page alignment.
pub struct NoticeFetcher {
    source: Arc<dyn NoticeSource>,
    state: ScrollState,
    carry: Vec<Value>,
}

impl NoticeFetcher {
    /// Create a new fetcher over the given source.
    pub fn new(source: Arc<dyn NoticeSource>) -> Self {
        Self {
            source,
            state: ScrollState::NotStarted,
            carry: Vec::new(),
        }
    }

    /// Whether the scroll has been fully consumed.
    pub fn is_exhausted(&self) -> bool {
        self.state == ScrollState::Exhausted && self.carry.is_empty()
    }

    /// Fetch up to `limit` raw records (`0` = fetch everything).
    ///
    /// Pages through the source until the limit is reached or the scroll
    /// is exhausted. On exhaustion the cursor is released; when the limit
    /// stops fetching early the cursor stays open for the next call. Any
    /// source error propagates without retry.
    pub async fn fetch(&mut self, limit: usize) -> Result<Vec<Value>, PipelineError> {
        let mut records = std::mem::take(&mut self.carry);

        while limit == 0 || records.len() < limit {
            let page = match &self.state {
                ScrollState::Exhausted => break,
                ScrollState::NotStarted => self.source.open_scroll().await?,
                ScrollState::Active(cursor) => self.source.next_page(cursor).await?,
            };

            if page.is_empty() {
                info!("No more records to fetch");
                self.state = ScrollState::Exhausted;
                if let Err(e) = self.source.clear_scroll(page.cursor).await {
                    debug!(error = %e, "Failed to release exhausted cursor");
                }
                break;
            }

            debug!(count = page.records.len(), "Fetched page");
            self.state = ScrollState::Active(page.cursor);
            records.extend(page.records);
        }

        if limit != 0 && records.len() > limit {
            self.carry = records.split_off(limit);
        }

        info!(count = records.len(), "Fetch complete");
        Ok(records)
    }

    /// Discard the current cursor and any carried-over records.
    ///
    /// The next `fetch` restarts the liveness query from scratch. Used by
    /// the driver after a failed iteration, when the cursor's validity is
    /// unknown.
    pub async fn reset(&mut self) {
        self.carry.clear();
        if let ScrollState::Active(cursor) = std::mem::replace(&mut self.state, ScrollState::NotStarted)
        {
            if let Err(e) = self.source.clear_scroll(cursor).await {
                warn!(error = %e, "Failed to release cursor during reset");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use notice_migrator_repository::{ScrollPage, SourceIndexError};

    /// Mock source serving a fixed sequence of pages.
    struct MockNoticeSource {
        pages: Vec<Vec<Value>>,
        next_page_index: Mutex<usize>,
        opened: AtomicUsize,
        cleared: AtomicUsize,
    }

    impl MockNoticeSource {
        fn new(pages: Vec<Vec<Value>>) -> Self {
            Self {
                pages,
                next_page_index: Mutex::new(0),
                opened: AtomicUsize::new(0),
                cleared: AtomicUsize::new(0),
            }
        }

        fn serve(&self) -> ScrollPage {
            let mut index = self.next_page_index.lock().unwrap();
            let records = self.pages.get(*index).cloned().unwrap_or_default();
            let cursor = ScrollCursor::new(format!("cursor-{}", *index));
            *index += 1;
            ScrollPage { records, cursor }
        }
    }

    #[async_trait]
    impl NoticeSource for MockNoticeSource {
        async fn open_scroll(&self) -> Result<ScrollPage, SourceIndexError> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            *self.next_page_index.lock().unwrap() = 0;
            Ok(self.serve())
        }

        async fn next_page(&self, _cursor: &ScrollCursor) -> Result<ScrollPage, SourceIndexError> {
            Ok(self.serve())
        }

        async fn clear_scroll(&self, _cursor: ScrollCursor) -> Result<(), SourceIndexError> {
            self.cleared.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn record(id: u32) -> Value {
        json!({ "user_id": format!("u{}", id), "entity_id": format!("e{}", id) })
    }

    #[tokio::test]
    async fn test_fetch_all_pages() {
        let source = Arc::new(MockNoticeSource::new(vec![
            vec![record(1), record(2)],
            vec![record(3)],
        ]));
        let mut fetcher = NoticeFetcher::new(source.clone());

        let records = fetcher.fetch(0).await.unwrap();

        assert_eq!(records.len(), 3);
        assert!(fetcher.is_exhausted());
        // The exhausted cursor is released.
        assert_eq!(source.cleared.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_respects_limit_exactly() {
        let source = Arc::new(MockNoticeSource::new(vec![
            vec![record(1), record(2), record(3)],
            vec![record(4), record(5)],
        ]));
        let mut fetcher = NoticeFetcher::new(source);

        let records = fetcher.fetch(2).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["user_id"], "u1");
        assert_eq!(records[1]["user_id"], "u2");
        assert!(!fetcher.is_exhausted());
    }

    #[tokio::test]
    async fn test_limit_overflow_carries_to_next_fetch() {
        let source = Arc::new(MockNoticeSource::new(vec![
            vec![record(1), record(2), record(3)],
            vec![],
        ]));
        let mut fetcher = NoticeFetcher::new(source);

        let first = fetcher.fetch(2).await.unwrap();
        let second = fetcher.fetch(2).await.unwrap();
        let third = fetcher.fetch(2).await.unwrap();

        assert_eq!(first.len(), 2);
        // The page overflow is served before touching the source again.
        assert_eq!(second.len(), 1);
        assert_eq!(second[0]["user_id"], "u3");
        assert!(third.is_empty());
        assert!(fetcher.is_exhausted());
    }

    #[tokio::test]
    async fn test_fetch_after_exhaustion_is_empty() {
        let source = Arc::new(MockNoticeSource::new(vec![vec![record(1)]]));
        let mut fetcher = NoticeFetcher::new(source.clone());

        fetcher.fetch(0).await.unwrap();
        let records = fetcher.fetch(0).await.unwrap();

        assert!(records.is_empty());
        // Exhaustion is tracked locally; no further source calls are made.
        assert_eq!(source.opened.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reset_restarts_the_scroll() {
        let source = Arc::new(MockNoticeSource::new(vec![
            vec![record(1), record(2)],
            vec![record(3)],
        ]));
        let mut fetcher = NoticeFetcher::new(source.clone());

        let first = fetcher.fetch(1).await.unwrap();
        assert_eq!(first.len(), 1);

        fetcher.reset().await;

        // Carried-over records are dropped and the query restarts.
        let restarted = fetcher.fetch(0).await.unwrap();
        assert_eq!(restarted.len(), 3);
        assert_eq!(source.opened.load(Ordering::SeqCst), 2);
        // The open cursor was released on reset.
        assert!(source.cleared.load(Ordering::SeqCst) >= 1);
    }
}
