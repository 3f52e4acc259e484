//! Plain-text article files.
//!
//! # Output Structure
//!
//! ```text
//! articles/
//! └── 20250506/
//!     ├── POS 단말기 시장 확대.txt
//!     └── Retailers_ the new POS wave.txt
//! ```
//!
//! Each file holds the source URL, the title, a blank line and the body.
//! Two titles that sanitize to the same 50-character name share a file and
//! the later article overwrites the earlier one; this is logged as a warning.

use crate::error::Result;
use crate::models::Article;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

/// Filename length, in characters, before the `.txt` suffix.
pub const MAX_FILENAME_CHARS: usize = 50;

static RESERVED_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[\\/:"*?<>|]+"#).unwrap());

/// Replace each run of `\ / : " * ? < > |` with a single underscore.
pub fn sanitize_filename(name: &str) -> String {
    RESERVED_CHARS.replace_all(name, "_").into_owned()
}

/// File name (with `.txt`) for an article title.
pub fn article_filename(title: &str) -> String {
    let safe: String = sanitize_filename(title)
        .chars()
        .take(MAX_FILENAME_CHARS)
        .collect();
    format!("{safe}.txt")
}

fn render(article: &Article) -> String {
    format!(
        "URL: {}\nTitle: {}\n\n{}",
        article.url, article.title, article.body
    )
}

/// Write an article into `output_dir`, creating the directory if needed.
///
/// # Returns
///
/// The path of the written file.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display(), url = %article.url))]
pub async fn save_article(output_dir: &Path, article: &Article) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).await?;

    let path = output_dir.join(article_filename(&article.title));
    if fs::try_exists(&path).await.unwrap_or(false) {
        warn!(path = %path.display(), "File name collision; overwriting earlier article");
    }

    fs::write(&path, render(article)).await?;
    info!(path = %path.display(), "Saved article");
    Ok(path)
}
