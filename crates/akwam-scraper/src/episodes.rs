//! Series page episode enumeration.
//!
//! A series page lists one block per episode with a heading link labelled
//! `حلقة N : ...`. Enumeration keeps page order; callers that need numeric
//! order sort downstream.

use akwam_common::EpisodeRef;
use regex::Regex;
use scraper::Html;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::error::Result;
use crate::html::{first, selector, text_of};

const EPISODE_BLOCK: &str = "div.bg-primary2";
const EPISODE_LINK: &str = "h2.font-size-18 a";
const EPISODE_DATE: &str = ".entry-date";

static EPISODE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"حلقة\s*(\d+)").expect("Invalid episode label pattern"));

static EPISODE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/episode/(\d+)/").expect("Invalid episode path pattern"));

/// Episode number from the link label, else from the episode URL path.
fn episode_number(label: &str, url: &str) -> Option<u32> {
    let from = |pattern: &Regex, haystack: &str| {
        pattern
            .captures(haystack)
            .and_then(|caps| caps[1].parse::<u32>().ok())
    };
    from(&*EPISODE_LABEL, label).or_else(|| from(&*EPISODE_PATH, url))
}

/// Parse every episode block on a series page, in page order.
///
/// Blocks whose number cannot be recovered are skipped. A repeated label
/// keeps its first occurrence.
pub fn parse_episodes(html: &str) -> Result<Vec<EpisodeRef>> {
    let document = Html::parse_document(html);
    let block_selector = selector(EPISODE_BLOCK)?;

    let mut seen = HashSet::new();
    let mut episodes = Vec::new();
    for block in document.select(&block_selector) {
        let Some(link) = first(block, EPISODE_LINK)? else {
            continue;
        };
        let url = link.value().attr("href").unwrap_or_default().trim();
        if url.is_empty() {
            continue;
        }

        let label = text_of(link);
        let Some(number) = episode_number(&label, url) else {
            tracing::debug!(label = %label, url = %url, "episode block without a number");
            continue;
        };
        if !seen.insert(number) {
            continue;
        }

        let mut episode = EpisodeRef::new(number, url);
        episode.aired = first(block, EPISODE_DATE)?
            .map(text_of)
            .filter(|d| !d.is_empty());
        episodes.push(episode);
    }

    Ok(episodes)
}
