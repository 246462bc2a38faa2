//! Small helpers over the `scraper` DOM.

use scraper::{ElementRef, Selector};

use crate::error::{Result, ScrapeError};

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{css}: {e}")))
}

/// Trimmed text content of an element.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Collapse runs of whitespace (including newlines) to single spaces.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First element matching `css` below `scope`.
pub(crate) fn first<'a>(scope: ElementRef<'a>, css: &str) -> Result<Option<ElementRef<'a>>> {
    Ok(scope.select(&selector(css)?).next())
}

/// Image URL of an `<img>`, preferring the lazy-load attribute.
pub(crate) fn image_src(img: ElementRef<'_>) -> Option<String> {
    img.value()
        .attr("data-src")
        .or_else(|| img.value().attr("src"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}
