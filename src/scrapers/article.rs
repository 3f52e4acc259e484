//! Article page fetching and text extraction.
//!
//! Article pages come from arbitrary publishers, so extraction is heuristic:
//!
//! - **Title**: `og:title` meta tag, then `<title>`, then the URL itself
//! - **Body**: the paragraphs of the first matching container heuristic, or
//!   every paragraph in the document when no container matches

use super::fetch_html;
use crate::config::ScrapeConfig;
use crate::error::Result;
use crate::models::Article;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// A known article-body container, tried in order.
pub struct ContainerHeuristic {
    pub name: &'static str,
    selector: Selector,
}

impl ContainerHeuristic {
    fn new(name: &'static str, css: &str) -> Self {
        Self {
            name,
            selector: Selector::parse(css).unwrap(),
        }
    }

    /// First element in the document matching this heuristic.
    pub fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&self.selector).next()
    }
}

pub static CONTAINER_HEURISTICS: Lazy<Vec<ContainerHeuristic>> = Lazy::new(|| {
    vec![
        ContainerHeuristic::new("naver-legacy", "div#articleBodyContents"),
        ContainerHeuristic::new("naver-news-end", "div.news_end"),
        ContainerHeuristic::new("article-body", "div.article-body"),
        ContainerHeuristic::new("article-content", "div.article-content"),
    ]
});

/// Pick the article title from an already parsed document.
pub fn extract_title(document: &Html, url: &str) -> String {
    let og_title = document
        .select(&OG_TITLE)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::trim)
        .filter(|title| !title.is_empty());
    if let Some(title) = og_title {
        return title.to_string();
    }

    document
        .select(&TITLE)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| url.to_string())
}

/// Collect the article body from an already parsed document.
///
/// Paragraph texts are trimmed, empty ones dropped, and the rest joined with
/// newlines. The result may be empty.
pub fn extract_body(document: &Html) -> String {
    let container = CONTAINER_HEURISTICS
        .iter()
        .find_map(|heuristic| heuristic.locate(document).map(|el| (heuristic.name, el)));

    let paragraphs: Vec<ElementRef> = match container {
        Some((name, element)) => {
            debug!(heuristic = name, "Matched article container");
            element.select(&PARAGRAPH).collect()
        }
        None => {
            debug!("No article container matched; using every paragraph");
            document.select(&PARAGRAPH).collect()
        }
    };

    paragraphs
        .into_iter()
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse an article page into an [`Article`].
pub fn extract_article(url: &str, html: &str) -> Article {
    let document = Html::parse_document(html);
    Article {
        url: url.to_string(),
        title: extract_title(&document, url),
        body: extract_body(&document),
    }
}

/// Fetch a single article with the configured timeout and extract it.
#[instrument(level = "info", skip(client, config))]
pub async fn fetch_article(client: &Client, config: &ScrapeConfig, url: &str) -> Result<Article> {
    let html = fetch_html(client, url, Some(config.article_timeout)).await?;
    let article = extract_article(url, &html);
    info!(bytes = article.body.len(), title = %article.title, "Parsed article");
    Ok(article)
}
