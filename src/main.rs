//! # keyword_news
//!
//! Searches a news search engine for a keyword, follows the result links and
//! saves every article whose body mentions the keyword as a plain text file
//! in a folder named after the day of the run.
//!
//! ## Usage
//!
//! ```sh
//! keyword_news -q POS -p 5 -o ./articles
//! ```
//!
//! ## Architecture
//!
//! The application is a sequential pipeline:
//! 1. **Indexing**: build one search URL per result page and collect the
//!    candidate article links from each
//! 2. **Fetching**: download each article and extract its title and body
//! 3. **Filtering**: keep only bodies containing the keyword
//! 4. **Output**: write `articles/<YYYYMMDD>/<title>.txt`
//!
//! Articles are fetched one at a time with a fixed pause between them.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use cli::Cli;
use config::ScrapeConfig;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("keyword_news starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match ScrapeConfig::from_cli(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Could not build configuration");
            return Err(e.into());
        }
    };
    info!(
        query = %config.query,
        date = %config.date_stamp,
        pages = config.pages,
        base_dir = %config.base_dir.display(),
        output_dir = %config.output_dir.display(),
        "Scraping articles"
    );

    // Early check: the base dir must be writable; the dated folder is only
    // created once an article is saved.
    if let Err(e) = ensure_writable_dir(&config.base_dir).await {
        error!(
            path = %config.base_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let client = scrapers::build_client(&config)?;
    let summary = pipeline::run(&client, &config).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        saved = summary.saved,
        skipped = summary.skipped,
        failed = summary.failed,
        pages_failed = summary.pages_failed,
        "Execution complete"
    );

    Ok(())
}
