//! Driver module for the notice migrator pipeline.
//!
//! Coordinates the fetcher, processor, and loader components through the
//! chunked migration loop.

use tracing::{error, info, warn};

use crate::errors::PipelineError;
use crate::fetcher::NoticeFetcher;
use crate::loader::MessageLoader;
use crate::processor::NoticeProcessor;

/// Configuration for the migration driver.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Maximum records per fetch-transform-write iteration.
    pub chunk_size: usize,
    /// When set, report the destination count instead of writing, and stop
    /// after a single iteration.
    pub dry_run: bool,
    /// Abort the run after this many consecutive failed iterations.
    pub max_consecutive_failures: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            dry_run: false,
            max_consecutive_failures: 5,
        }
    }
}

/// Whether the loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverState {
    Running,
    Done,
}

/// Counters accumulated over a migration run.
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    /// Number of fetch-transform-write iterations executed.
    pub iterations: usize,
    /// Records fetched from the source.
    pub fetched: usize,
    /// Documents the destination store accepted.
    pub migrated: usize,
    /// Records skipped because they could not be transformed.
    pub transform_failures: usize,
    /// Documents the destination store rejected.
    pub insert_failures: usize,
}

/// Driver that repeats fetch-transform-write in bounded chunks.
///
/// The driver:
/// - Bounds per-iteration memory with the configured chunk size
/// - Treats an empty fetch as completion
/// - Logs and survives failed iterations, resetting the fetch cursor so
///   the next iteration restarts the query (duplicates collide on their
///   deterministic ids and are skipped by the unordered insert)
pub struct MigrationDriver {
    fetcher: NoticeFetcher,
    processor: NoticeProcessor,
    loader: MessageLoader,
    config: DriverConfig,
}

impl MigrationDriver {
    /// Create a new driver with the default configuration.
    pub fn new(fetcher: NoticeFetcher, processor: NoticeProcessor, loader: MessageLoader) -> Self {
        Self::with_config(fetcher, processor, loader, DriverConfig::default())
    }

    /// Create a new driver with custom configuration.
    pub fn with_config(
        fetcher: NoticeFetcher,
        processor: NoticeProcessor,
        loader: MessageLoader,
        config: DriverConfig,
    ) -> Self {
        Self {
            fetcher,
            processor,
            loader,
            config,
        }
    }

    /// Run the chunked migration to completion.
    ///
    /// Returns the accumulated counters, or an error if the consecutive
    /// failure cap is exceeded.
    pub async fn run(&mut self) -> Result<MigrationReport, PipelineError> {
        info!(
            chunk_size = self.config.chunk_size,
            dry_run = self.config.dry_run,
            "Starting notice migration"
        );

        // Pre-flight sanity check; a failure here is logged but does not
        // block the run, matching the store's advisory role.
        match self.loader.destination_count().await {
            Ok(count) => info!(count = count, "Pre-flight destination count"),
            Err(e) => warn!(error = %e, "Pre-flight destination count failed"),
        }

        let mut report = MigrationReport::default();
        let mut consecutive_failures = 0usize;

        loop {
            report.iterations += 1;
            info!(iteration = report.iterations, "Migration iteration");

            match self.run_iteration(&mut report).await {
                Ok(DriverState::Done) => break,
                Ok(DriverState::Running) => {
                    consecutive_failures = 0;
                }
                Err(e) => {
                    consecutive_failures += 1;
                    error!(
                        error = %e,
                        iteration = report.iterations,
                        consecutive_failures = consecutive_failures,
                        "Migration iteration failed"
                    );

                    // The cursor may be mid-page or expired; restart the
                    // query rather than guessing.
                    self.fetcher.reset().await;

                    if consecutive_failures >= self.config.max_consecutive_failures {
                        return Err(PipelineError::driver(format!(
                            "aborting after {} consecutive failed iterations",
                            consecutive_failures
                        )));
                    }
                }
            }
        }

        info!(
            iterations = report.iterations,
            fetched = report.fetched,
            migrated = report.migrated,
            transform_failures = report.transform_failures,
            insert_failures = report.insert_failures,
            "Migration completed"
        );
        Ok(report)
    }

    /// Run the migration as a single fetch-transform-write pass.
    ///
    /// `limit` bounds the number of records fetched (`0` = everything).
    /// Unlike [`run`](Self::run), any error propagates immediately.
    pub async fn run_once(&mut self, limit: usize) -> Result<MigrationReport, PipelineError> {
        let mut report = MigrationReport {
            iterations: 1,
            ..MigrationReport::default()
        };

        let raw = self.fetcher.fetch(limit).await?;
        report.fetched = raw.len();
        if raw.is_empty() {
            info!("No records to migrate");
            return Ok(report);
        }

        let outcome = self.processor.transform_batch(raw);
        report.transform_failures = outcome.failures.len();
        for failure in &outcome.failures {
            error!(error = %failure.error, "Skipping malformed record");
        }

        if self.config.dry_run {
            let count = self.loader.destination_count().await?;
            info!(
                count = count,
                would_insert = outcome.documents.len(),
                "Dry run: skipping insert"
            );
            return Ok(report);
        }

        let summary = self.loader.load(&outcome.documents).await?;
        report.migrated = summary.inserted;
        report.insert_failures = summary.failed();
        Ok(report)
    }

    /// One fetch-transform-write cycle.
    async fn run_iteration(
        &mut self,
        report: &mut MigrationReport,
    ) -> Result<DriverState, PipelineError> {
        let raw = self.fetcher.fetch(self.config.chunk_size).await?;
        if raw.is_empty() {
            info!("No more records to migrate");
            return Ok(DriverState::Done);
        }
        report.fetched += raw.len();

        let outcome = self.processor.transform_batch(raw);
        report.transform_failures += outcome.failures.len();
        for failure in &outcome.failures {
            error!(error = %failure.error, "Skipping malformed record");
        }

        if self.config.dry_run {
            let count = self.loader.destination_count().await?;
            info!(
                count = count,
                would_insert = outcome.documents.len(),
                "Dry run: skipping insert, stopping after one iteration"
            );
            return Ok(DriverState::Done);
        }

        let summary = self.loader.load(&outcome.documents).await?;
        report.migrated += summary.inserted;
        report.insert_failures += summary.failed();

        Ok(DriverState::Running)
    }
}
