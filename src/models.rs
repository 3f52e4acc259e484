//! Data models for scraped articles and run bookkeeping.
//!
//! - [`Article`]: title and body extracted from one article page
//! - [`LinkOutcome`]: what happened to a link that was processed without error
//! - [`RunSummary`]: counters reported when the run finishes
//!
//! None of these outlive a single run; only the text files written by
//! [`crate::outputs::text`] persist.

use std::fmt;
use std::path::PathBuf;

/// An article as extracted from its page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// The URL the article was fetched from.
    pub url: String,
    /// `og:title`, then `<title>`, then the URL itself.
    pub title: String,
    /// Non-empty paragraph texts joined with `\n`. May be empty.
    pub body: String,
}

/// Result of processing one article link that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The body contained the keyword and was written to this path.
    Saved(PathBuf),
    /// The body did not contain the keyword.
    Skipped,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub pages_requested: usize,
    pub pages_failed: usize,
    pub links_found: usize,
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &LinkOutcome) {
        match outcome {
            LinkOutcome::Saved(_) => self.saved += 1,
            LinkOutcome::Skipped => self.skipped += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages ({} failed), {} links: {} saved, {} skipped, {} failed",
            self.pages_requested,
            self.pages_failed,
            self.links_found,
            self.saved,
            self.skipped,
            self.failed
        )
    }
}
