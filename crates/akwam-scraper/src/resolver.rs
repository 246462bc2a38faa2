//! Link resolution state machine.
//!
//! An entry page does not link to its video file. Getting there takes a fixed
//! chain of hops:
//!
//! ```text
//! Start -> QualityPage -> RedirectPage(tier) -> DownloadPage(tier) -> Resolved(url, tier)
//!                               |                      |
//!                               +------ next tier <----+  (any hop failure)
//!                                          |
//!                                        Failed (no tier left)
//! ```
//!
//! Tiers are attempted in priority order. A failed fetch or a missing match at
//! any hop abandons that tier and restarts at the redirect hop of the next
//! advertised tier. Each resolution owns its state; nothing is shared between
//! concurrent resolutions except the fetcher and extractors, both read-only.

use std::collections::VecDeque;
use std::sync::Arc;

use akwam_common::{Quality, QualityLinkSet, ResolvedStream};
use async_trait::async_trait;
use tracing::debug;

use crate::dispatcher::{StreamResolver, WorkItem};
use crate::error::{Hop, HopFailure, HopReason, ResolveError};
use crate::extract::{with_scheme, HopExtractors, LinkExtractor};
use crate::fetch::PageFetcher;

enum State {
    Start,
    QualityPage(QualityLinkSet),
    RedirectPage { tier: Quality, url: String },
    DownloadPage { tier: Quality, url: String },
    Resolved { tier: Quality, url: String },
    Failed(ResolveError),
}

/// Bookkeeping for one resolution run.
struct Attempt<'a> {
    entry_url: &'a str,
    links: QualityLinkSet,
    pending: VecDeque<Quality>,
    failures: Vec<HopFailure>,
}

impl Attempt<'_> {
    /// Move to the redirect hop of the next pending tier, or fail.
    fn next_tier(&mut self) -> State {
        while let Some(tier) = self.pending.pop_front() {
            if let Some(url) = self.links.get(tier) {
                return State::RedirectPage {
                    tier,
                    url: url.to_string(),
                };
            }
        }
        State::Failed(ResolveError::Exhausted {
            failures: std::mem::take(&mut self.failures),
        })
    }

    fn fail_tier(&mut self, tier: Quality, hop: Hop, reason: HopReason) -> State {
        debug!(entry = %self.entry_url, %tier, %hop, %reason, "tier failed, falling back");
        self.failures.push(HopFailure { tier, hop, reason });
        self.next_tier()
    }
}

/// Resolves an entry page to a direct playable URL.
pub struct LinkResolver {
    fetcher: Arc<dyn PageFetcher>,
    extractors: HopExtractors,
    tiers: Vec<Quality>,
    provider: String,
}

impl LinkResolver {
    /// `tiers` are tried in priority order regardless of the order given.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        extractors: HopExtractors,
        tiers: &[Quality],
        provider: impl Into<String>,
    ) -> Self {
        let mut tiers = tiers.to_vec();
        tiers.sort();
        tiers.dedup();
        Self {
            fetcher,
            extractors,
            tiers,
            provider: provider.into(),
        }
    }

    /// Walk the chain for one entry.
    pub async fn resolve(&self, title: &str, entry_url: &str) -> Result<ResolvedStream, ResolveError> {
        let mut attempt = Attempt {
            entry_url,
            links: QualityLinkSet::new(),
            pending: VecDeque::new(),
            failures: Vec::new(),
        };

        let mut state = State::Start;
        loop {
            state = match state {
                State::Start => match self.fetcher.fetch(entry_url).await {
                    Ok(page) => State::QualityPage(self.extractors.quality.extract(&page.body)),
                    Err(e) => State::Failed(ResolveError::EntryPage(e)),
                },
                State::QualityPage(links) => {
                    attempt.pending = self
                        .tiers
                        .iter()
                        .copied()
                        .filter(|tier| links.get(*tier).is_some())
                        .collect();
                    attempt.links = links;
                    if attempt.pending.is_empty() {
                        State::Failed(ResolveError::NoQualities)
                    } else {
                        attempt.next_tier()
                    }
                }
                State::RedirectPage { tier, url } => {
                    match self.hop(&url, self.extractors.download.as_ref()).await {
                        Ok(download) => State::DownloadPage {
                            tier,
                            url: download,
                        },
                        Err(reason) => attempt.fail_tier(tier, Hop::Redirect, reason),
                    }
                }
                State::DownloadPage { tier, url } => {
                    match self.hop(&url, self.extractors.direct.as_ref()).await {
                        Ok(direct) => State::Resolved { tier, url: direct },
                        Err(reason) => attempt.fail_tier(tier, Hop::Download, reason),
                    }
                }
                State::Resolved { tier, url } => {
                    return Ok(ResolvedStream {
                        title: title.to_string(),
                        provider_label: format!("{} {}", self.provider, tier),
                        url,
                    });
                }
                State::Failed(err) => return Err(err),
            };
        }
    }

    /// Fetch one hop page and extract the next link from it.
    async fn hop(&self, url: &str, extractor: &dyn LinkExtractor) -> Result<String, HopReason> {
        let page = self
            .fetcher
            .fetch(&with_scheme(url))
            .await
            .map_err(|e| HopReason::Fetch(e.to_string()))?;
        extractor
            .extract(&page.body)
            .map(|link| with_scheme(&link))
            .ok_or(HopReason::NoMatch)
    }
}

#[async_trait]
impl StreamResolver for LinkResolver {
    async fn resolve(&self, item: &WorkItem) -> Result<ResolvedStream, ResolveError> {
        LinkResolver::resolve(self, &item.title, &item.url).await
    }
}

impl std::fmt::Debug for LinkResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkResolver")
            .field("tiers", &self.tiers)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::fixtures::{download_page, entry_page, redirect_page};
    use crate::test_support::MemoryFetcher;

    const ENTRY: &str = "https://ak.sv/movie/10/dune";

    fn resolver(fetcher: MemoryFetcher) -> LinkResolver {
        LinkResolver::new(
            Arc::new(fetcher),
            HopExtractors::default(),
            &Quality::ALL,
            "Akwam",
        )
    }

    /// Full chain for the tier whose quality link id is `link_id`.
    fn chain(fetcher: MemoryFetcher, link_id: usize, file: &str) -> MemoryFetcher {
        let download = format!("https://s1.downet.net/download/{link_id}/page");
        let direct = format!("https://s101.downet.net/download/{link_id}/{file}");
        fetcher
            .with_page(
                &format!("https://go.ak.sv/link/{link_id}"),
                &redirect_page(&download),
            )
            .with_page(&download, &download_page(&direct))
    }

    #[tokio::test]
    async fn resolves_highest_tier() {
        let fetcher = MemoryFetcher::new().with_page(ENTRY, &entry_page(&[Quality::P1080, Quality::P720]));
        let fetcher = chain(chain(fetcher, 1, "dune-1080.mp4"), 2, "dune-720.mp4");

        let stream = resolver(fetcher).resolve("Dune", ENTRY).await.unwrap();
        assert_eq!(stream.title, "Dune");
        assert_eq!(stream.provider_label, "Akwam 1080p");
        assert_eq!(stream.url, "https://s101.downet.net/download/1/dune-1080.mp4");
    }

    #[tokio::test]
    async fn falls_back_when_redirect_hop_fails() {
        // 1080p link page is missing (404); 720p chain is complete.
        let fetcher = MemoryFetcher::new().with_page(ENTRY, &entry_page(&[Quality::P1080, Quality::P720]));
        let fetcher = chain(fetcher, 2, "dune-720.mp4");

        let stream = resolver(fetcher).resolve("Dune", ENTRY).await.unwrap();
        assert_eq!(stream.provider_label, "Akwam 720p");
        assert_eq!(stream.url, "https://s101.downet.net/download/2/dune-720.mp4");
    }

    #[tokio::test]
    async fn falls_back_when_download_hop_has_no_match() {
        let fetcher = MemoryFetcher::new()
            .with_page(ENTRY, &entry_page(&[Quality::P1080, Quality::P480]))
            .with_page(
                "https://go.ak.sv/link/1",
                &redirect_page("https://s1.downet.net/download/1/page"),
            )
            .with_page("https://s1.downet.net/download/1/page", "<html>expired</html>");
        let fetcher = chain(fetcher, 2, "dune-480.mp4");

        let stream = resolver(fetcher).resolve("Dune", ENTRY).await.unwrap();
        assert_eq!(stream.provider_label, "Akwam 480p");
    }

    #[tokio::test]
    async fn all_tiers_failing_is_exhausted() {
        let fetcher = MemoryFetcher::new().with_page(ENTRY, &entry_page(&[Quality::P1080, Quality::P720]));

        let err = resolver(fetcher).resolve("Dune", ENTRY).await.unwrap_err();
        match err {
            ResolveError::Exhausted { failures } => {
                let tiers: Vec<_> = failures.iter().map(|f| f.tier).collect();
                assert_eq!(tiers, vec![Quality::P1080, Quality::P720]);
                assert!(failures.iter().all(|f| f.hop == Hop::Redirect));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn entry_page_without_tiers() {
        let fetcher = MemoryFetcher::new().with_page(ENTRY, "<html><body>no tabs</body></html>");
        let err = resolver(fetcher).resolve("Dune", ENTRY).await.unwrap_err();
        assert!(matches!(err, ResolveError::NoQualities));
    }

    #[tokio::test]
    async fn unreachable_entry_page() {
        let err = resolver(MemoryFetcher::new())
            .resolve("Dune", ENTRY)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::EntryPage(_)));
    }

    #[tokio::test]
    async fn configured_tiers_limit_attempts() {
        let fetcher = MemoryFetcher::new().with_page(ENTRY, &entry_page(&[Quality::P1080, Quality::P720]));
        let fetcher = chain(chain(fetcher, 1, "dune-1080.mp4"), 2, "dune-720.mp4");

        let resolver = LinkResolver::new(
            Arc::new(fetcher),
            HopExtractors::akwam(&[Quality::P720]),
            &[Quality::P720],
            "Akwam",
        );
        let stream = resolver.resolve("Dune", ENTRY).await.unwrap();
        assert_eq!(stream.provider_label, "Akwam 720p");
    }
}
