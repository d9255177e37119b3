//! Dependency initialization and wiring for the notice migrator.
//!
//! Both outbound connections are constructed exactly once here and handed
//! to the pipeline by value; nothing in the process holds hidden global
//! connection state.

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::MigrationError;
use notice_migrator_pipeline::{
    driver::{DriverConfig, MigrationDriver},
    fetcher::NoticeFetcher,
    loader::MessageLoader,
    processor::NoticeProcessor,
};
use notice_migrator_repository::{
    MessageStore, MongoMessageStore, OpenSearchNoticeSource, SourceIndexConfig,
};

/// Default source search index URL.
const DEFAULT_SOURCE_URL: &str = "http://localhost:9200";

/// Default source index name.
const DEFAULT_SOURCE_INDEX: &str = "user_communication";

/// Default MongoDB connection string.
const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";

/// Default destination database.
const DEFAULT_MONGO_DATABASE: &str = "group_db";

/// Default destination collection.
const DEFAULT_MONGO_COLLECTION: &str = "message";

/// Default scroll page size.
const DEFAULT_PAGE_SIZE: i64 = 1000;

/// Default records per migration iteration.
const DEFAULT_CHUNK_SIZE: usize = 2000;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured migration driver ready to run.
    pub driver: MigrationDriver,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SOURCE_URL`: source search index URL (default: http://localhost:9200)
    /// - `SOURCE_USERNAME` / `SOURCE_PASSWORD`: basic-auth pair (optional)
    /// - `SOURCE_INDEX`: source index name (default: user_communication)
    /// - `PAGE_SIZE`: scroll page size (default: 1000)
    /// - `MONGO_URI`: destination connection string (default: mongodb://localhost:27017)
    /// - `MONGO_DATABASE`: destination database (default: group_db)
    /// - `MONGO_COLLECTION`: destination collection (default: message)
    /// - `CHUNK_SIZE`: records per iteration (default: 2000)
    /// - `DRY_RUN`: report counts instead of writing when `true`/`1`
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(MigrationError)` - If initialization fails
    pub async fn new() -> Result<Self, MigrationError> {
        let source_url = env::var("SOURCE_URL").unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string());
        let source_index =
            env::var("SOURCE_INDEX").unwrap_or_else(|_| DEFAULT_SOURCE_INDEX.to_string());
        let mongo_uri = env::var("MONGO_URI").unwrap_or_else(|_| DEFAULT_MONGO_URI.to_string());
        let mongo_database =
            env::var("MONGO_DATABASE").unwrap_or_else(|_| DEFAULT_MONGO_DATABASE.to_string());
        let mongo_collection =
            env::var("MONGO_COLLECTION").unwrap_or_else(|_| DEFAULT_MONGO_COLLECTION.to_string());

        let page_size = parse_env("PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let chunk_size = parse_env("CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?;
        let dry_run = matches!(
            env::var("DRY_RUN").as_deref(),
            Ok("true") | Ok("TRUE") | Ok("1")
        );

        let credentials = match (env::var("SOURCE_USERNAME"), env::var("SOURCE_PASSWORD")) {
            (Ok(username), Ok(password)) => Some((username, password)),
            _ => None,
        };

        info!(
            source_url = %source_url,
            source_index = %source_index,
            mongo_database = %mongo_database,
            mongo_collection = %mongo_collection,
            page_size = page_size,
            chunk_size = chunk_size,
            dry_run = dry_run,
            "Initializing dependencies"
        );

        // Initialize the source connection
        let source = OpenSearchNoticeSource::new(
            &source_url,
            credentials,
            SourceIndexConfig::new(source_index, page_size),
        )?;

        // Initialize the destination connection
        let store = MongoMessageStore::new(&mongo_uri, &mongo_database, &mongo_collection).await?;

        // Verify the destination is reachable before touching the source
        match store.count_documents().await {
            Ok(count) => info!(count = count, "Message store connection verified"),
            Err(e) => warn!(error = %e, "Message store pre-flight count failed"),
        }

        let fetcher = NoticeFetcher::new(Arc::new(source));
        let processor = NoticeProcessor::new();
        let loader = MessageLoader::new(Arc::new(store));

        let driver = MigrationDriver::with_config(
            fetcher,
            processor,
            loader,
            DriverConfig {
                chunk_size,
                dry_run,
                ..DriverConfig::default()
            },
        );

        Ok(Self { driver })
    }
}

/// Read and parse an env var, falling back to a default when unset.
fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T, MigrationError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e| MigrationError::config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
