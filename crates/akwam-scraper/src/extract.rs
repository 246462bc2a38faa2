//! Per-hop extraction strategies for the link chain.
//!
//! Each hop of the resolution chain pulls one URL out of one page. The
//! patterns track the upstream markup, which changes without notice, so each
//! hop's extractor is a swappable strategy and the resolver state machine
//! never touches a pattern directly.

use std::sync::{Arc, LazyLock};

use akwam_common::{Quality, QualityLinkSet};
use regex::Regex;

static QUALITY_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"tab-content quality.*?a href="(https?://\w*\.*\w+\.\w+/link/\d+)""#)
        .expect("Invalid quality link pattern")
});

static DOWNLOAD_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://(\w*\.*\w+\.\w+/download/.*?)""#)
        .expect("Invalid download link pattern")
});

static DIRECT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-z0-9]{4,}\.\w+\.\w+/download/.*?)""#).expect("Invalid direct link pattern")
});

/// Finds the intermediate link for each quality tier on an entry page.
pub trait QualityExtractor: Send + Sync {
    fn extract(&self, body: &str) -> QualityLinkSet;
}

/// Finds a single link on a hop page.
pub trait LinkExtractor: Send + Sync {
    /// The raw captured link, possibly without a scheme.
    fn extract(&self, body: &str) -> Option<String>;
}

/// Quality tabs on an entry page.
///
/// The page advertises a tier with a literal `>720p</` marker and lists one
/// `/link/N` URL per advertised tier inside the quality tab content, in tier
/// priority order. Matches are assigned to the advertised tiers in that order,
/// then tiers outside the configured set are dropped. The tab markup spans
/// lines, so the body is scanned with newlines removed.
#[derive(Debug, Clone)]
pub struct TabQualityExtractor {
    link: Regex,
    tiers: Vec<Quality>,
}

impl TabQualityExtractor {
    pub fn new(tiers: &[Quality]) -> Self {
        Self::with_pattern(QUALITY_LINK.clone(), tiers)
    }

    pub fn with_pattern(link: Regex, tiers: &[Quality]) -> Self {
        Self {
            link,
            tiers: tiers.to_vec(),
        }
    }
}

impl QualityExtractor for TabQualityExtractor {
    fn extract(&self, body: &str) -> QualityLinkSet {
        let collapsed = body.replace(['\n', '\r'], "");
        let mut links = self
            .link
            .captures_iter(&collapsed)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()));

        let mut set = QualityLinkSet::new();
        for tier in Quality::ALL {
            if !collapsed.contains(&tier.marker()) {
                continue;
            }
            let Some(link) = links.next() else {
                break;
            };
            if self.tiers.contains(&tier) {
                set.insert(tier, link);
            }
        }
        set
    }
}

/// First capture group of a regular expression.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    pattern: Regex,
}

impl PatternExtractor {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// Download page link on a quality link page.
    pub fn download_link() -> Self {
        Self::new(DOWNLOAD_LINK.clone())
    }

    /// Direct file link on a download page. Requires an alphanumeric
    /// host label of at least four characters, which skips the site's own
    /// navigation links.
    pub fn direct_link() -> Self {
        Self::new(DIRECT_LINK.clone())
    }
}

impl LinkExtractor for PatternExtractor {
    fn extract(&self, body: &str) -> Option<String> {
        self.pattern
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|link| !link.is_empty())
    }
}

/// The extractor for each hop of the chain.
#[derive(Clone)]
pub struct HopExtractors {
    pub quality: Arc<dyn QualityExtractor>,
    pub download: Arc<dyn LinkExtractor>,
    pub direct: Arc<dyn LinkExtractor>,
}

impl HopExtractors {
    /// Extractors for the current upstream markup.
    pub fn akwam(tiers: &[Quality]) -> Self {
        Self {
            quality: Arc::new(TabQualityExtractor::new(tiers)),
            download: Arc::new(PatternExtractor::download_link()),
            direct: Arc::new(PatternExtractor::direct_link()),
        }
    }
}

impl Default for HopExtractors {
    fn default() -> Self {
        Self::akwam(&Quality::ALL)
    }
}

impl std::fmt::Debug for HopExtractors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HopExtractors").finish_non_exhaustive()
    }
}

/// Prepend `https://` to a scheme-relative or scheme-less link.
pub fn with_scheme(link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        link.to_string()
    } else {
        format!("https://{}", link.trim_start_matches('/'))
    }
}
