//! Fetching and parsing of search result pages and article pages.
//!
//! Scraping follows a two-phase pattern:
//!
//! 1. **Indexing** ([`search`]): build the search result page URLs for the
//!    query and pull candidate article links out of each page
//! 2. **Fetching** ([`article`]): download each link and extract its title
//!    and body text
//!
//! Both phases share one [`reqwest::Client`] carrying the browser-like
//! User-Agent. Parsing is done in plain functions over an HTML string so it
//! can be exercised without a network.

pub mod article;
pub mod search;

use crate::config::ScrapeConfig;
use crate::error::Result;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

/// Build the HTTP client used for every request of a run.
///
/// No client-wide timeout is set: search pages use the transport defaults
/// and article requests set their own per-request timeout.
pub fn build_client(config: &ScrapeConfig) -> Result<Client> {
    let client = Client::builder().user_agent(&config.user_agent).build()?;
    Ok(client)
}

/// GET a page and return its body, failing on transport errors and on any
/// non-success status.
#[instrument(level = "debug", skip(client))]
pub(crate) async fn fetch_html(
    client: &Client,
    url: &str,
    timeout: Option<Duration>,
) -> Result<String> {
    let mut request = client.get(url);
    if let Some(timeout) = timeout {
        request = request.timeout(timeout);
    }
    let response = request.send().await?.error_for_status()?;
    let html = response.text().await?;
    debug!(bytes = html.len(), "Fetched page");
    Ok(html)
}
