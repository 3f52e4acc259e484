//! News search result pages.
//!
//! # URL Pattern
//!
//! Result pages are addressed by a 1-based `start` offset:
//! `https://search.naver.com/search.naver?where=news&query=POS&start=11`
//! is the second page when the engine shows 10 results per page.

use super::fetch_html;
use crate::config::ScrapeConfig;
use crate::error::Result;
use itertools::Itertools;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

static RESULTS_LIST: Lazy<Selector> = Lazy::new(|| Selector::parse("ul.list_news").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Build one search URL per page, in page order.
///
/// The query is percent-encoded and `start` is
/// `(page - 1) * results_per_page + 1`. Parameters already present on the
/// endpoint are kept and the search parameters are appended after them.
pub fn build_search_urls(
    endpoint: &Url,
    query: &str,
    pages: u32,
    results_per_page: u32,
) -> Vec<String> {
    let mut base = endpoint.clone();
    base.set_fragment(None);
    let separator = match base.query() {
        None => "?",
        Some("") => "",
        Some(_) => "&",
    };
    let encoded = urlencoding::encode(query);
    (1..=pages)
        .map(|page| {
            let start = u64::from(page - 1) * u64::from(results_per_page) + 1;
            format!("{base}{separator}where=news&query={encoded}&start={start}")
        })
        .collect()
}

/// Extract candidate article links from a search result page.
///
/// Anchors are taken from the `ul.list_news` results list when the page has
/// one, otherwise from the whole document. An anchor qualifies when its
/// `href` is an absolute http(s) URL and its visible text is longer than
/// `min_text_len` characters. Duplicates are dropped, first occurrence wins.
pub fn parse_search_results(html: &str, min_text_len: usize) -> Vec<String> {
    let document = Html::parse_document(html);

    let anchors: Vec<ElementRef> = match document.select(&RESULTS_LIST).next() {
        Some(list) => list.select(&LINK).collect(),
        None => {
            debug!("No results list found; scanning every anchor");
            document.select(&LINK).collect()
        }
    };

    anchors
        .into_iter()
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let text: String = anchor.text().map(str::trim).collect();
            (is_http_url(href) && text.chars().count() > min_text_len).then(|| href.to_string())
        })
        .unique()
        .collect()
}

fn is_http_url(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

/// Fetch one search result page and return its candidate article links.
#[instrument(level = "info", skip(client, config))]
pub async fn index_articles(
    client: &Client,
    config: &ScrapeConfig,
    search_url: &str,
) -> Result<Vec<String>> {
    let html = fetch_html(client, search_url, None).await?;
    let links = parse_search_results(&html, config.min_link_text_len);

    info!(count = links.len(), "Indexed candidate article links");
    debug!(links = ?links, "Candidate links");
    Ok(links)
}
