//! In-memory fetcher for unit tests.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::{Result, ScrapeError};
use crate::fetch::{Page, PageFetcher};

/// Serves canned pages by exact URL; anything else is a 404.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    pages: HashMap<String, Page>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            Page {
                url: url.to_string(),
                body: body.to_string(),
            },
        );
        self
    }

    pub fn with_redirect(mut self, url: &str, final_url: &str, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            Page {
                url: final_url.to_string(),
                body: body.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl PageFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<Page> {
        self.pages.get(url).cloned().ok_or_else(|| ScrapeError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}
