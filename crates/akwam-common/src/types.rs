//! Core type definitions for scraped entries, episodes, streams and metadata.
//!
//! Content types serialize in lowercase to match what catalog clients send in
//! request paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Kind of catalog content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// A single movie.
    Movie,
    /// A series with episodes.
    Series,
}

impl ContentType {
    /// Path segment of the upstream listing pages (`/movies`, `/series`).
    pub fn listing_path(self) -> &'static str {
        match self {
            Self::Movie => "movies",
            Self::Series => "series",
        }
    }

    /// Value of the upstream search `section` parameter.
    pub fn search_section(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Series => write!(f, "series"),
        }
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            other => Err(Error::UnknownContentType(other.to_string())),
        }
    }
}

/// Video quality tier, in descending priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
}

impl Quality {
    /// All tiers, highest priority first.
    pub const ALL: [Quality; 3] = [Quality::P1080, Quality::P720, Quality::P480];

    pub fn label(self) -> &'static str {
        match self {
            Self::P1080 => "1080p",
            Self::P720 => "720p",
            Self::P480 => "480p",
        }
    }

    /// Literal marker whose presence in an entry page advertises this tier.
    pub fn marker(self) -> String {
        format!(">{}</", self.label())
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Quality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quality::ALL
            .into_iter()
            .find(|q| q.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownQuality(s.to_string()))
    }
}

/// One scraped catalog listing (movie or series). Immutable once scraped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    /// Entry page on the upstream site.
    pub url: String,
    pub thumbnail: String,
    pub year: Option<String>,
    pub tags: Vec<String>,
}

/// One episode of a series as found on the series page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRef {
    /// Normalised label, always `Episode N`.
    pub label: String,
    pub number: u32,
    /// Episode page on the upstream site.
    pub url: String,
    /// Raw localized air date text, when the page shows one.
    pub aired: Option<String>,
}

impl EpisodeRef {
    pub fn new(number: u32, url: impl Into<String>) -> Self {
        Self {
            label: format!("Episode {number}"),
            number,
            url: url.into(),
            aired: None,
        }
    }
}

/// Intermediate redirect URL per quality tier detected on an entry page.
///
/// A tier is present only if its marker was found. Iteration is always in
/// tier priority order regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualityLinkSet {
    links: Vec<(Quality, String)>,
}

impl QualityLinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, quality: Quality, url: impl Into<String>) {
        let url = url.into();
        match self.links.iter_mut().find(|(q, _)| *q == quality) {
            Some(slot) => slot.1 = url,
            None => {
                self.links.push((quality, url));
                self.links.sort_by_key(|(q, _)| *q);
            }
        }
    }

    pub fn get(&self, quality: Quality) -> Option<&str> {
        self.links
            .iter()
            .find(|(q, _)| *q == quality)
            .map(|(_, url)| url.as_str())
    }

    /// Tiers present, highest priority first.
    pub fn tiers(&self) -> impl Iterator<Item = Quality> + '_ {
        self.links.iter().map(|(q, _)| *q)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// A fully resolved playable link. Only produced when every hop succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStream {
    pub title: String,
    /// Provider label shown by clients, e.g. `Akwam 720p`.
    #[serde(rename = "name")]
    pub provider_label: String,
    pub url: String,
}

/// Descriptive fields scraped from an entry page.
///
/// Every field is optional; callers apply the per-field defaults through the
/// `*_or_default` accessors rather than checking presence ad hoc.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub title: Option<String>,
    pub poster: Option<String>,
    pub background: Option<String>,
    pub description: Option<String>,
    pub year: Option<String>,
    pub genres: Vec<String>,
    pub rating: Option<String>,
    pub episodes: Vec<EpisodeMetadata>,
}

/// Episode entry of a series metadata record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeMetadata {
    pub episode: EpisodeRef,
    /// ISO-8601 air date (`YYYY-MM-DDT00:00:00.000Z`).
    pub released: String,
}

impl MetadataRecord {
    pub fn title_or_default(&self, fallback: &str) -> String {
        self.title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn description_or_default(&self, title: &str) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| format!("Watch {title} on Akwam."))
    }

    /// Background image, falling back to the poster.
    pub fn background_or_default(&self) -> Option<String> {
        self.background.clone().or_else(|| self.poster.clone())
    }

    pub fn rating_or_default(&self) -> String {
        self.rating.clone().unwrap_or_else(|| "N/A".to_string())
    }
}
