//! Page fetching.
//!
//! Every scraper in this crate goes through [`PageFetcher`], so tests can
//! serve canned markup and the server can share one HTTP client for the whole
//! process. One attempt per fetch; the client timeout bounds a hung request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{Result, ScrapeError};

/// A fetched HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Final URL after redirects.
    pub url: String,
    pub body: String,
}

/// Source of upstream pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`. Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> Result<Page>;
}

/// [`PageFetcher`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with a per-request timeout and user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page> {
        debug!(url = %url, "fetching page");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await?;
        Ok(Page {
            url: final_url,
            body,
        })
    }
}

/// Follow redirects from `configured` once and return the canonical origin.
///
/// The site moves between mirror domains; the configured address usually
/// redirects to the live one. Falls back to `configured` (without a trailing
/// slash) when the request fails.
pub async fn resolve_base_url(fetcher: &dyn PageFetcher, configured: &str) -> String {
    let fallback = configured.trim_end_matches('/').to_string();
    match fetcher.fetch(configured).await {
        Ok(page) => match reqwest::Url::parse(&page.url) {
            Ok(url) => {
                let origin = url.origin().ascii_serialization();
                if origin != fallback {
                    debug!(from = %fallback, to = %origin, "upstream base URL redirected");
                }
                origin
            }
            Err(e) => {
                warn!(url = %page.url, error = %e, "unparseable redirect target, keeping configured base URL");
                fallback
            }
        },
        Err(e) => {
            warn!(url = %configured, error = %e, "failed to resolve upstream base URL, keeping configured value");
            fallback
        }
    }
}
