//! Episode number recovery from free-form titles.
//!
//! Resolved streams only carry their display title, so the series re-sort
//! recovers the number from it. The chain always terminates: 0 when nothing
//! matches.

use regex::Regex;
use std::sync::LazyLock;

/// Ordered fallback chain; the first pattern that yields a number wins.
static EPISODE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Localized: "الحلقة 12", "حلقة 12"
        r"الحلقة\s*(\d+)",
        r"حلقة\s*(\d+)",
        r"(?i)\bepisode\s*(\d+)",
        r"(?i)\bep\.?\s*(\d+)",
        // Any trailing digit run
        r"(\d+)\D*$",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid episode number pattern"))
    .collect()
});

/// Recover an episode number from a title, defaulting to 0.
pub fn episode_number(title: &str) -> u32 {
    EPISODE_PATTERNS
        .iter()
        .find_map(|pattern| {
            pattern
                .captures(title)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
        })
        .unwrap_or(0)
}
