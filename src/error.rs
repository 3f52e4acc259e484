//! Error type shared by the scraping pipeline.
//!
//! Parsing anomalies (missing containers, missing titles) are never errors;
//! they are handled by the fallback chains in [`crate::scrapers`]. Everything
//! that can actually fail ends up here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Transport failure or non-success HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ScrapeError {
    /// `true` when the request was aborted by the client timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ScrapeError::Http(e) if e.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
