//! Descriptive metadata scraping from an entry page.
//!
//! Every field is scraped independently. A selector that matches nothing
//! leaves that one field empty; the record itself is always produced.

use std::collections::HashSet;
use std::sync::LazyLock;

use akwam_common::MetadataRecord;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::html::{collapse_whitespace, image_src, selector, text_of};

const TITLE: &[&str] = &["h1.entry-title", "h1"];
const POSTER: &[&str] = &[
    "a[data-fancybox] picture img",
    "div.movie-cover img",
    "picture img",
];
/// Episode headings on series pages are `h2.font-size-18` and never qualify.
const DESCRIPTION: &[&str] = &[
    "div.widget-body h2 div.text-white",
    "div.widget-body h2:not(.font-size-18)",
    "div.story",
];
const GENRE_TAG: &str = ".badge-light";
const RATING_WIDGET: &str = "span.mx-2";
const GALLERY_LINK: &str = r#"a[data-fancybox="movie-gallery"]"#;

/// Sentences kept from the narrative block.
const MAX_SENTENCES: usize = 2;

static THUMB_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/thumb/\d+x\d+").expect("Invalid thumbnail segment pattern"));

static YEAR_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"السنة\s*:\s*([0-9]{4})").expect("Invalid year label pattern"));

static STORY_LEAD_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(قصة|القصة)\s*(الفيلم|المسلسل|العرض)?\s*:?\s*")
        .expect("Invalid story lead-in pattern")
});

static RATING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*/\s*([0-9]+(?:\.[0-9]+)?)").expect("Invalid rating pattern")
});

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?؟]+(\s|$)").expect("Invalid sentence pattern"));

/// First element matching any of `candidates`, tried in order.
///
/// Candidate selectors are compile-time constants; one that fails to parse
/// is treated as matching nothing.
fn first_of<'a>(document: &'a Html, candidates: &[&str]) -> Option<ElementRef<'a>> {
    candidates.iter().find_map(|css| {
        let sel = selector(css).ok()?;
        document.select(&sel).next()
    })
}

fn all_of<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Ok(sel) => document.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Full-size image URL from a thumbnail URL.
pub fn strip_thumbnail_size(url: &str) -> String {
    THUMB_SEGMENT.replace(url, "").into_owned()
}

/// Drop the boilerplate lead-in and keep the opening sentences.
pub fn clean_description(raw: &str) -> Option<String> {
    let text = collapse_whitespace(raw);
    let text = STORY_LEAD_IN.replace(&text, "");
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let cut = SENTENCE_END
        .find_iter(text)
        .nth(MAX_SENTENCES - 1)
        .map(|m| m.end())
        .unwrap_or(text.len());
    non_empty(text[..cut].trim().to_string())
}

/// Second number of the `x / y` rating widget.
fn parse_rating(document: &Html) -> Option<String> {
    all_of(document, RATING_WIDGET)
        .into_iter()
        .find_map(|span| RATING.captures(&text_of(span)).map(|caps| caps[2].to_string()))
}

/// Scrape the descriptive fields of an entry page.
///
/// Episodes are not filled in here; they come from the series page parser.
pub fn parse_metadata(html: &str) -> MetadataRecord {
    let document = Html::parse_document(html);

    let title = first_of(&document, TITLE).map(text_of).and_then(non_empty);

    let poster = first_of(&document, POSTER)
        .and_then(image_src)
        .map(|src| strip_thumbnail_size(&src));

    let page_text = collapse_whitespace(&document.root_element().text().collect::<String>());
    let year = YEAR_LABEL
        .captures(&page_text)
        .map(|caps| caps[1].to_string());

    let description = first_of(&document, DESCRIPTION)
        .map(|el| el.text().collect::<String>())
        .and_then(|raw| clean_description(&raw));

    let mut seen = HashSet::new();
    let genres = all_of(&document, GENRE_TAG)
        .into_iter()
        .map(text_of)
        .filter(|g| !g.is_empty() && seen.insert(g.clone()))
        .collect();

    let rating = parse_rating(&document);

    let background = all_of(&document, GALLERY_LINK)
        .into_iter()
        .next()
        .and_then(|link| {
            link.value()
                .attr("href")
                .map(str::trim)
                .filter(|href| !href.is_empty() && *href != "#")
                .map(ToString::to_string)
                .or_else(|| {
                    let img = selector("img").ok()?;
                    link.select(&img).next().and_then(image_src)
                })
        })
        .map(|src| strip_thumbnail_size(&src));

    MetadataRecord {
        title,
        poster,
        background,
        description,
        year,
        genres,
        rating,
        episodes: Vec::new(),
    }
}
