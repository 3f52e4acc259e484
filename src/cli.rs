//! Command-line interface definitions for keyword_news.
//!
//! Every option is optional on the command line: anything left unset falls
//! back to the YAML file given with `--config`, and then to the built-in
//! defaults in [`crate::config`]. All options can also be supplied through
//! environment variables.

use clap::Parser;
use clap::builder::FalseyValueParser;

/// Command-line arguments for a scraping run.
///
/// # Examples
///
/// ```sh
/// # Defaults: "POS", 5 result pages, ./articles/<YYYYMMDD>/
/// keyword_news
///
/// # Different keyword, fewer pages, custom output folder
/// keyword_news -q "kiosk" -p 2 -o /srv/articles
///
/// # Settings from a file, keyword from the environment
/// SCRAPE_QUERY=POS keyword_news -c ./scrape.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Keyword to search for and to require in article bodies
    #[arg(short, long, env = "SCRAPE_QUERY")]
    pub query: Option<String>,

    /// Number of search result pages to walk
    #[arg(short, long, env = "SCRAPE_PAGES")]
    pub pages: Option<u32>,

    /// Results the search engine shows per page (drives the `start` offset)
    #[arg(long, env = "SCRAPE_RESULTS_PER_PAGE")]
    pub results_per_page: Option<u32>,

    /// Base output directory; a YYYYMMDD folder is created inside it
    #[arg(short, long, env = "SCRAPE_OUTPUT_DIR")]
    pub output_dir: Option<String>,

    /// News search endpoint
    #[arg(long, env = "SCRAPE_SEARCH_URL")]
    pub search_url: Option<String>,

    /// Pause after each processed article, in milliseconds
    #[arg(long, env = "SCRAPE_DELAY_MS")]
    pub delay_ms: Option<u64>,

    /// Article request timeout, in seconds
    #[arg(long, env = "SCRAPE_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Abort the whole run when a search page cannot be fetched
    #[arg(long, env = "SCRAPE_FAIL_FAST", value_parser = FalseyValueParser::new())]
    pub fail_fast: bool,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "SCRAPE_CONFIG")]
    pub config: Option<String>,
}
