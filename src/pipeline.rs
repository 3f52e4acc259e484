//! The scraping run.
//!
//! Search pages are walked in order; each page's candidate links are fetched
//! one after another, filtered on the keyword and saved. A failing link is
//! logged and skipped. A failing search page is logged and skipped too,
//! unless `fail_fast` is set, in which case it ends the run.

use crate::config::ScrapeConfig;
use crate::error::Result;
use crate::models::{LinkOutcome, RunSummary};
use crate::outputs::text::save_article;
use crate::scrapers::article::fetch_article;
use crate::scrapers::search::{build_search_urls, index_articles};
use crate::utils::{contains_keyword, truncate_for_log};
use reqwest::Client;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Fetch one article, keep it only if its body contains the query.
#[instrument(level = "info", skip(client, config))]
pub async fn process_link(client: &Client, config: &ScrapeConfig, link: &str) -> Result<LinkOutcome> {
    let article = fetch_article(client, config, link).await?;

    if !contains_keyword(&article.body, &config.query) {
        info!(
            query = %config.query,
            title = %truncate_for_log(&article.title, 80),
            "Skipped: keyword not in body"
        );
        return Ok(LinkOutcome::Skipped);
    }

    let path = save_article(&config.output_dir, &article).await?;
    Ok(LinkOutcome::Saved(path))
}

/// Run the whole crawl and report what happened.
///
/// # Errors
///
/// Only a search page failure with `fail_fast` set is returned; per-link
/// failures are counted in [`RunSummary::failed`].
#[instrument(level = "info", skip_all, fields(query = %config.query, date = %config.date_stamp))]
pub async fn run(client: &Client, config: &ScrapeConfig) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    let search_urls = build_search_urls(
        &config.search_url,
        &config.query,
        config.pages,
        config.results_per_page,
    );

    for (index, search_url) in search_urls.iter().enumerate() {
        let page = index + 1;
        summary.pages_requested += 1;
        info!(page, url = %search_url, "Requesting search page");

        let links = match index_articles(client, config, search_url).await {
            Ok(links) => links,
            Err(e) if config.fail_fast => {
                error!(page, url = %search_url, error = %e, "Search page failed; aborting run");
                return Err(e);
            }
            Err(e) => {
                summary.pages_failed += 1;
                warn!(page, url = %search_url, error = %e, "Search page failed; moving on");
                continue;
            }
        };
        info!(page, count = links.len(), "Found links");
        summary.links_found += links.len();

        for link in &links {
            match process_link(client, config, link).await {
                Ok(outcome) => summary.record(&outcome),
                Err(e) => {
                    summary.failed += 1;
                    error!(%link, error = %e, timeout = e.is_timeout(), "Error fetching article");
                    continue;
                }
            }
            sleep(config.link_delay).await;
        }
    }

    info!(%summary, "Crawl finished");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::config::FileConfig;
    use crate::scrapers::build_client;
    use chrono::Local;
    use clap::Parser;
    use std::path::Path;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer, base_dir: &Path, pages: u32) -> ScrapeConfig {
        let search_url = format!("{}/search.naver", server.uri());
        let pages = pages.to_string();
        let cli = Cli::parse_from([
            "keyword_news",
            "--query",
            "POS",
            "--pages",
            pages.as_str(),
            "--search-url",
            search_url.as_str(),
            "--output-dir",
            base_dir.to_str().unwrap(),
            "--delay-ms",
            "0",
        ]);
        ScrapeConfig::resolve(&cli, FileConfig::default(), Local::now()).unwrap()
    }

    fn results_page(anchors: &[(String, &str)]) -> String {
        let items: String = anchors
            .iter()
            .map(|(href, text)| format!(r#"<li><a href="{href}">{text}</a></li>"#))
            .collect();
        format!(r#"<html><body><ul class="list_news">{items}</ul></body></html>"#)
    }

    fn article_page(title: &str, paragraphs: &[&str]) -> String {
        let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
        format!(
            r#"<html><head><meta property="og:title" content="{title}"></head>
               <body><div class="news_end">{body}</div></body></html>"#
        )
    }

    async fn mount_search_page(server: &MockServer, start: &str, html: String) {
        Mock::given(method("GET"))
            .and(path("/search.naver"))
            .and(query_param("where", "news"))
            .and(query_param("query", "POS"))
            .and(query_param("start", start))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(server)
            .await;
    }

    async fn mount_article(server: &MockServer, route: &str, response: ResponseTemplate, hits: u64) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .expect(hits)
            .mount(server)
            .await;
    }

    fn saved_files(dir: &Path) -> Vec<String> {
        match std::fs::read_dir(dir) {
            Ok(entries) => {
                let mut names: Vec<String> = entries
                    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                    .collect();
                names.sort();
                names
            }
            Err(_) => Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_saves_keyword_article_and_ignores_short_anchor() {
        let server = MockServer::start().await;
        let base = tempfile::tempdir().unwrap();

        mount_search_page(
            &server,
            "1",
            results_page(&[
                (format!("{}/article/pos", server.uri()), "POS terminal sales surge!"),
                (format!("{}/article/short", server.uri()), "Short link"),
            ]),
        )
        .await;
        mount_article(
            &server,
            "/article/pos",
            ResponseTemplate::new(200).set_body_string(article_page(
                "POS market report",
                &["Retail POS demand keeps rising.", "Vendors expand."],
            )),
            1,
        )
        .await;
        mount_article(&server, "/article/short", ResponseTemplate::new(200), 0).await;

        let config = test_config(&server, base.path(), 1);
        let client = build_client(&config).unwrap();
        let summary = run(&client, &config).await.unwrap();

        assert_eq!(summary.links_found, 1);
        assert_eq!(summary.saved, 1);

        let today = Local::now().format("%Y%m%d").to_string();
        let expected = base.path().join(&today).join("POS market report.txt");
        assert_eq!(config.output_dir, base.path().join(&today));
        let contents = std::fs::read_to_string(&expected).unwrap();
        assert!(contents.starts_with(&format!("URL: {}/article/pos\n", server.uri())));
        assert!(contents.contains("Title: POS market report\n\n"));
        assert!(contents.contains("POS"));
    }

    #[tokio::test]
    async fn test_timeout_is_logged_and_run_continues() {
        let server = MockServer::start().await;
        let base = tempfile::tempdir().unwrap();

        mount_search_page(
            &server,
            "1",
            results_page(&[
                (format!("{}/article/slow", server.uri()), "A slow article about POS systems"),
                (format!("{}/article/fast", server.uri()), "A fast article about POS systems"),
            ]),
        )
        .await;
        // Requested twice: once by the run, once directly below.
        mount_article(
            &server,
            "/article/slow",
            ResponseTemplate::new(200)
                .set_body_string(article_page("Slow story", &["POS in the slow lane"]))
                .set_delay(Duration::from_secs(2)),
            2,
        )
        .await;
        mount_article(
            &server,
            "/article/fast",
            ResponseTemplate::new(200)
                .set_body_string(article_page("Fast story", &["POS in the fast lane"])),
            1,
        )
        .await;

        let mut config = test_config(&server, base.path(), 1);
        config.article_timeout = Duration::from_millis(200);
        let client = build_client(&config).unwrap();

        let summary = run(&client, &config).await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.saved, 1);
        assert_eq!(saved_files(&config.output_dir), vec!["Fast story.txt"]);

        let err = process_link(&client, &config, &format!("{}/article/slow", server.uri()))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_article_without_keyword_is_not_saved() {
        let server = MockServer::start().await;
        let base = tempfile::tempdir().unwrap();

        mount_search_page(
            &server,
            "1",
            results_page(&[
                (format!("{}/article/other", server.uri()), "Nothing relevant in this article"),
                (format!("{}/article/lower", server.uri()), "Lowercase keyword only, not a match"),
            ]),
        )
        .await;
        mount_article(
            &server,
            "/article/other",
            ResponseTemplate::new(200).set_body_string(article_page("Other", &["Weather report"])),
            1,
        )
        .await;
        mount_article(
            &server,
            "/article/lower",
            ResponseTemplate::new(200).set_body_string(article_page("Lower", &["new pos terminals"])),
            1,
        )
        .await;

        let config = test_config(&server, base.path(), 1);
        let client = build_client(&config).unwrap();
        let summary = run(&client, &config).await.unwrap();

        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.saved, 0);
        // No match, no dated folder.
        assert!(!config.output_dir.exists());
    }

    #[tokio::test]
    async fn test_http_error_on_article_is_isolated() {
        let server = MockServer::start().await;
        let base = tempfile::tempdir().unwrap();

        mount_search_page(
            &server,
            "1",
            results_page(&[
                (format!("{}/article/gone", server.uri()), "This article has been removed now"),
                (format!("{}/article/ok", server.uri()), "This article is still around POS"),
            ]),
        )
        .await;
        mount_article(&server, "/article/gone", ResponseTemplate::new(404), 1).await;
        mount_article(
            &server,
            "/article/ok",
            ResponseTemplate::new(200).set_body_string(article_page("Still here", &["POS"])),
            1,
        )
        .await;

        let config = test_config(&server, base.path(), 1);
        let client = build_client(&config).unwrap();
        let summary = run(&client, &config).await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(saved_files(&config.output_dir), vec!["Still here.txt"]);
    }

    #[tokio::test]
    async fn test_failed_search_page_is_skipped() {
        let server = MockServer::start().await;
        let base = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/search.naver"))
            .and(query_param("start", "1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        mount_search_page(
            &server,
            "11",
            results_page(&[(format!("{}/article/p2", server.uri()), "Second page article on POS")]),
        )
        .await;
        mount_article(
            &server,
            "/article/p2",
            ResponseTemplate::new(200).set_body_string(article_page("Page two", &["POS news"])),
            1,
        )
        .await;

        let config = test_config(&server, base.path(), 2);
        let client = build_client(&config).unwrap();
        let summary = run(&client, &config).await.unwrap();

        assert_eq!(summary.pages_requested, 2);
        assert_eq!(summary.pages_failed, 1);
        assert_eq!(summary.saved, 1);
    }

    #[tokio::test]
    async fn test_fail_fast_aborts_on_search_page_error() {
        let server = MockServer::start().await;
        let base = tempfile::tempdir().unwrap();

        Mock::given(method("GET"))
            .and(path("/search.naver"))
            .and(query_param("start", "1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search.naver"))
            .and(query_param("start", "11"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = test_config(&server, base.path(), 2);
        config.fail_fast = true;
        let client = build_client(&config).unwrap();

        let err = run(&client, &config).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_delay_follows_each_processed_link() {
        let server = MockServer::start().await;
        let base = tempfile::tempdir().unwrap();

        mount_search_page(
            &server,
            "1",
            results_page(&[
                (format!("{}/article/one", server.uri()), "First delayed article on POS"),
                (format!("{}/article/two", server.uri()), "Second delayed article on POS"),
            ]),
        )
        .await;
        for route in ["/article/one", "/article/two"] {
            mount_article(
                &server,
                route,
                ResponseTemplate::new(200).set_body_string(article_page(route, &["POS"])),
                1,
            )
            .await;
        }

        let mut config = test_config(&server, base.path(), 1);
        config.link_delay = Duration::from_millis(150);
        let client = build_client(&config).unwrap();

        let started = Instant::now();
        let summary = run(&client, &config).await.unwrap();
        assert_eq!(summary.saved, 2);
        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}
