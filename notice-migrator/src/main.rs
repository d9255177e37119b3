//! Notice migration job entry point.
//!
//! Runs the chunked fetch-transform-write loop once and exits. Failures
//! are reported through logs only; the process exits normally either way
//! so a supervising operator reads the outcome from the log stream.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use notice_migrator::Dependencies;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting notice migration job");

    let deps = match Dependencies::new().await {
        Ok(deps) => deps,
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return;
        }
    };

    let mut driver = deps.driver;
    match driver.run().await {
        Ok(report) => {
            info!(
                iterations = report.iterations,
                fetched = report.fetched,
                migrated = report.migrated,
                transform_failures = report.transform_failures,
                insert_failures = report.insert_failures,
                "Migration finished"
            );
        }
        Err(e) => {
            error!(error = %e, "Migration aborted");
        }
    }

    info!("Job completed");
}
