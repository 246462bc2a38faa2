//! Error types for scraping and link resolution.

use std::fmt;

use akwam_common::Quality;

/// Failure while fetching or parsing a single upstream page.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("Upstream returned {status} for {url}")]
    Status { url: String, status: u16 },

    /// The expected markup structure was absent.
    #[error("Markup mismatch: {0}")]
    Markup(String),

    /// A CSS selector failed to parse.
    #[error("Invalid selector: {0}")]
    Selector(String),
}

impl ScrapeError {
    pub fn markup<S: Into<String>>(msg: S) -> Self {
        Self::Markup(msg.into())
    }
}

/// Result type alias using [`ScrapeError`].
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Which hop of the chain failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hop {
    /// Quality link page, yields the download page URL.
    Redirect,
    /// Download page, yields the direct URL.
    Download,
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redirect => write!(f, "redirect"),
            Self::Download => write!(f, "download"),
        }
    }
}

/// Why a hop failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HopReason {
    Fetch(String),
    NoMatch,
}

impl fmt::Display for HopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "fetch failed: {e}"),
            Self::NoMatch => write!(f, "pattern did not match"),
        }
    }
}

/// One failed tier attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopFailure {
    pub tier: Quality,
    pub hop: Hop,
    pub reason: HopReason,
}

impl fmt::Display for HopFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {} hop ({})", self.tier, self.hop, self.reason)
    }
}

/// Resolution of one item failed; the item is omitted from the response.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("entry page unavailable: {0}")]
    EntryPage(#[source] ScrapeError),

    #[error("no quality tier advertised on entry page")]
    NoQualities,

    #[error("all quality tiers failed: {}", join_failures(.failures))]
    Exhausted { failures: Vec<HopFailure> },
}

fn join_failures(failures: &[HopFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
