//! Run configuration.
//!
//! A [`ScrapeConfig`] is built exactly once at startup and passed by reference
//! to every component that needs it. Values are resolved per field in this
//! order: command-line flag or environment variable, then the optional YAML
//! file, then the built-in defaults below.
//!
//! # YAML file
//!
//! ```yaml
//! query: POS
//! pages: 5
//! results_per_page: 10
//! output_dir: articles
//! search_url: https://search.naver.com/search.naver
//! delay_ms: 1000
//! timeout_secs: 10
//! fail_fast: false
//! user_agent: "Mozilla/5.0 ..."
//! min_link_text_len: 20
//! ```

use crate::cli::Cli;
use crate::error::{Result, ScrapeError};
use chrono::{DateTime, Local};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

pub const DEFAULT_QUERY: &str = "POS";
pub const DEFAULT_PAGES: u32 = 5;
pub const DEFAULT_RESULTS_PER_PAGE: u32 = 10;
pub const DEFAULT_OUTPUT_DIR: &str = "articles";
pub const DEFAULT_SEARCH_URL: &str = "https://search.naver.com/search.naver";
pub const DEFAULT_DELAY_MS: u64 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MIN_LINK_TEXT_LEN: usize = 20;
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/112.0.0.0 Safari/537.36"
);

/// Optional overrides read from the `--config` YAML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub query: Option<String>,
    pub pages: Option<u32>,
    pub results_per_page: Option<u32>,
    pub output_dir: Option<String>,
    pub search_url: Option<String>,
    pub delay_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub fail_fast: Option<bool>,
    pub user_agent: Option<String>,
    pub min_link_text_len: Option<usize>,
}

impl FileConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        let file = Self::from_yaml(&yaml)?;
        info!("Loaded configuration file");
        Ok(file)
    }
}

/// Fully resolved settings for one scraping run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Keyword used for the search and for filtering article bodies.
    pub query: String,
    pub pages: u32,
    pub results_per_page: u32,
    /// Base directory, e.g. `articles`.
    pub base_dir: PathBuf,
    /// `YYYYMMDD` stamp of the run, fixed at construction.
    pub date_stamp: String,
    /// `base_dir/date_stamp`, where articles are written.
    pub output_dir: PathBuf,
    pub search_url: Url,
    pub user_agent: String,
    /// Timeout applied to article requests only.
    pub article_timeout: Duration,
    /// Pause after every successfully processed article link.
    pub link_delay: Duration,
    /// Anchors whose text is not longer than this are ignored.
    pub min_link_text_len: usize,
    /// Abort the run on the first search page failure.
    pub fail_fast: bool,
}

impl ScrapeConfig {
    /// Resolve the configuration from the command line, reading the YAML
    /// file it points at (if any), and stamp it with the current local date.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(Path::new(path))?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, file, Local::now())
    }

    /// Merge CLI values over file values over defaults.
    pub fn resolve(cli: &Cli, file: FileConfig, now: DateTime<Local>) -> Result<Self> {
        let query = cli
            .query
            .clone()
            .or(file.query)
            .unwrap_or_else(|| DEFAULT_QUERY.to_string());
        if query.is_empty() {
            return Err(ScrapeError::Config("query must not be empty".to_string()));
        }

        let pages = cli.pages.or(file.pages).unwrap_or(DEFAULT_PAGES);
        if pages == 0 {
            return Err(ScrapeError::Config("pages must be at least 1".to_string()));
        }

        let results_per_page = cli
            .results_per_page
            .or(file.results_per_page)
            .unwrap_or(DEFAULT_RESULTS_PER_PAGE);
        if results_per_page == 0 {
            return Err(ScrapeError::Config(
                "results_per_page must be at least 1".to_string(),
            ));
        }

        let search_url = cli
            .search_url
            .clone()
            .or(file.search_url)
            .unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string());
        let search_url = Url::parse(&search_url)?;

        let base_dir = PathBuf::from(
            cli.output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
        );
        let date_stamp = now.format("%Y%m%d").to_string();
        let output_dir = base_dir.join(&date_stamp);

        let config = ScrapeConfig {
            query,
            pages,
            results_per_page,
            base_dir,
            date_stamp,
            output_dir,
            search_url,
            user_agent: file
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            article_timeout: Duration::from_secs(
                cli.timeout_secs
                    .or(file.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            link_delay: Duration::from_millis(
                cli.delay_ms.or(file.delay_ms).unwrap_or(DEFAULT_DELAY_MS),
            ),
            min_link_text_len: file
                .min_link_text_len
                .unwrap_or(DEFAULT_MIN_LINK_TEXT_LEN),
            fail_fast: cli.fail_fast || file.fail_fast.unwrap_or(false),
        };
        debug!(?config, "Resolved configuration");
        Ok(config)
    }
}
