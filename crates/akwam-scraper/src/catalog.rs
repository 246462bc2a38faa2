//! Listing and search page scraping.
//!
//! Browse and search pages share the same card grid markup: a listing
//! container holding one column per entry, each wrapping an `entry-box`.
//! The upstream paginates with a fixed page size, so a client offset (`skip`)
//! is translated into a page number plus an offset into that page.

use akwam_common::{CatalogEntry, ContentType};
use scraper::Html;

use crate::error::{Result, ScrapeError};
use crate::html::{first, image_src, selector, text_of};

const LISTING_CONTAINER: &str = "div.widget-body.row.flex-wrap";
const LISTING_ITEM: &str = "div.col-lg-auto.col-md-4.col-6.mb-12";
const ENTRY_BOX: &str = "div.entry-box";
const ENTRY_TITLE: &str = "h3.entry-title";
const ENTRY_LINK: &str = "a.box";
const ENTRY_THUMB: &str = "img.img-fluid.w-100.lazy";
const ENTRY_YEAR: &str = "span.badge.badge-pill.badge-secondary";
const ENTRY_TAG: &str = "span.badge.badge-pill.badge-light";

/// Which upstream page serves a client offset, and where in it to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-indexed upstream page.
    pub page: usize,
    /// Offset of the first wanted entry within that page.
    pub start: usize,
    pub limit: usize,
}

impl PageWindow {
    pub fn from_skip(skip: usize, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            page: skip / limit + 1,
            start: skip % limit,
            limit,
        }
    }

    /// Keep `entries[start .. start + limit]`, clamped to what exists.
    pub fn slice<T>(&self, entries: Vec<T>) -> Vec<T> {
        entries
            .into_iter()
            .skip(self.start)
            .take(self.limit)
            .collect()
    }
}

/// Browse URL for a content type and category.
pub fn listing_url(base_url: &str, kind: ContentType, category: u32, page: usize) -> String {
    format!(
        "{base_url}/{}?category={category}&page={page}",
        kind.listing_path()
    )
}

/// Search URL for a query within a content type.
pub fn search_url(base_url: &str, kind: ContentType, query: &str, page: usize) -> String {
    format!(
        "{base_url}/search?q={}&section={}&page={page}",
        urlencoding::encode(query.trim()),
        kind.search_section()
    )
}

/// Parse every entry card on a listing or search page.
///
/// Returns [`ScrapeError::Markup`] when the listing container is missing.
/// Cards without a title or link are skipped.
pub fn parse_listing(html: &str) -> Result<Vec<CatalogEntry>> {
    let document = Html::parse_document(html);
    let container_selector = selector(LISTING_CONTAINER)?;
    let item_selector = selector(LISTING_ITEM)?;
    let tag_selector = selector(ENTRY_TAG)?;

    let container = document
        .select(&container_selector)
        .next()
        .ok_or_else(|| ScrapeError::markup("listing container not found"))?;

    let mut entries = Vec::new();
    for item in container.select(&item_selector) {
        let Some(entry_box) = first(item, ENTRY_BOX)? else {
            continue;
        };

        let title = first(entry_box, ENTRY_TITLE)?
            .map(text_of)
            .filter(|t| !t.is_empty());
        let url = first(entry_box, ENTRY_LINK)?
            .and_then(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty() && *href != "#")
            .map(ToString::to_string);

        let (Some(title), Some(url)) = (title, url) else {
            tracing::debug!("skipping listing card without title or link");
            continue;
        };

        let thumbnail = first(entry_box, ENTRY_THUMB)?
            .and_then(image_src)
            .unwrap_or_default();
        let year = first(entry_box, ENTRY_YEAR)?
            .map(text_of)
            .filter(|y| !y.is_empty());
        let tags = entry_box
            .select(&tag_selector)
            .map(text_of)
            .filter(|t| !t.is_empty())
            .collect();

        entries.push(CatalogEntry {
            title,
            url,
            thumbnail,
            year,
            tags,
        });
    }

    Ok(entries)
}
