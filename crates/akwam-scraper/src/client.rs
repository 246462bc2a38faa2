//! The facade the addon server talks to.
//!
//! [`AkwamClient`] owns the shared fetcher, the resolver and the dispatcher,
//! and turns every lower-level failure into an empty or partial value with a
//! log line. Nothing here returns an error to the caller.

use std::sync::Arc;

use akwam_common::{
    CatalogEntry, ContentType, EpisodeMetadata, EpisodeRef, MetadataRecord, OpaqueId, Quality,
    ResolvedStream,
};
use tracing::{debug, info, warn};

use crate::catalog::{listing_url, parse_listing, search_url, PageWindow};
use crate::dates::release_date;
use crate::dispatcher::{BatchOrdering, Dispatcher, WorkItem};
use crate::enrich::parse_metadata;
use crate::episodes::parse_episodes;
use crate::error::{ResolveError, Result};
use crate::extract::HopExtractors;
use crate::fetch::PageFetcher;
use crate::genres::{category_id, ALL_CATEGORIES};
use crate::resolver::LinkResolver;

/// Tunables for [`AkwamClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Upstream origin without a trailing slash.
    pub base_url: String,
    /// Entries per catalog response; also the upstream page size.
    pub page_size: usize,
    /// Upper bound on concurrent resolutions within one request.
    pub max_concurrency: usize,
    /// Prefix of every stream's provider label.
    pub provider_label: String,
    /// Quality tiers to attempt.
    pub tiers: Vec<Quality>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "https://ak.sv".to_string(),
            page_size: 24,
            max_concurrency: 16,
            provider_label: "Akwam".to_string(),
            tiers: Quality::ALL.to_vec(),
        }
    }
}

/// Scraping client for the upstream site.
pub struct AkwamClient {
    fetcher: Arc<dyn PageFetcher>,
    resolver: Arc<LinkResolver>,
    dispatcher: Dispatcher,
    base_url: String,
    page_size: usize,
}

impl AkwamClient {
    pub fn new(fetcher: Arc<dyn PageFetcher>, options: ClientOptions) -> Self {
        let resolver = Arc::new(LinkResolver::new(
            Arc::clone(&fetcher),
            HopExtractors::akwam(&options.tiers),
            &options.tiers,
            options.provider_label,
        ));
        let dispatcher = Dispatcher::new(resolver.clone(), options.max_concurrency);

        Self {
            fetcher,
            resolver,
            dispatcher,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            page_size: options.page_size.max(1),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    // ------------------------------------------------------------------
    // Catalogs
    // ------------------------------------------------------------------

    /// One page of a browse catalog, optionally filtered by genre name.
    ///
    /// An unknown genre yields an empty page without touching the network.
    pub async fn catalog(
        &self,
        kind: ContentType,
        genre: Option<&str>,
        skip: usize,
    ) -> Vec<CatalogEntry> {
        let category = match genre {
            None => ALL_CATEGORIES,
            Some(name) => match category_id(kind, name) {
                Some(id) => id,
                None => {
                    debug!(%kind, genre = %name, "unknown genre");
                    return Vec::new();
                }
            },
        };

        let window = PageWindow::from_skip(skip, self.page_size);
        let url = listing_url(&self.base_url, kind, category, window.page);
        self.listing(&url, window).await
    }

    /// One page of search results for `query`.
    pub async fn search(&self, kind: ContentType, query: &str, skip: usize) -> Vec<CatalogEntry> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let window = PageWindow::from_skip(skip, self.page_size);
        let url = search_url(&self.base_url, kind, query, window.page);
        self.listing(&url, window).await
    }

    async fn listing(&self, url: &str, window: PageWindow) -> Vec<CatalogEntry> {
        match self.fetch_listing(url).await {
            Ok(entries) => {
                let entries = window.slice(entries);
                debug!(url = %url, count = entries.len(), "listing scraped");
                entries
            }
            Err(e) => {
                warn!(url = %url, error = %e, "listing unavailable, returning empty page");
                Vec::new()
            }
        }
    }

    async fn fetch_listing(&self, url: &str) -> Result<Vec<CatalogEntry>> {
        let page = self.fetcher.fetch(url).await?;
        parse_listing(&page.body)
    }

    /// Entry page URL of the first search hit for an exact title.
    pub async fn find_entry_url(&self, kind: ContentType, title: &str) -> Option<String> {
        self.search(kind, title, 0)
            .await
            .into_iter()
            .next()
            .map(|entry| entry.url)
    }

    // ------------------------------------------------------------------
    // Episodes and streams
    // ------------------------------------------------------------------

    /// Episodes listed on a series page, in page order.
    pub async fn episodes(&self, series_url: &str) -> Vec<EpisodeRef> {
        let scraped = match self.fetcher.fetch(series_url).await {
            Ok(page) => parse_episodes(&page.body),
            Err(e) => Err(e),
        };
        scraped.unwrap_or_else(|e| {
            warn!(url = %series_url, error = %e, "episode list unavailable");
            Vec::new()
        })
    }

    /// Resolve a single entry page.
    pub async fn resolve_one(
        &self,
        title: &str,
        entry_url: &str,
    ) -> std::result::Result<ResolvedStream, ResolveError> {
        self.resolver.resolve(title, entry_url).await
    }

    /// Playable streams for a decoded id.
    ///
    /// Foreign ids produce nothing. Title-only ids are looked up by search and
    /// every hit is resolved. Series entries are expanded into their episodes,
    /// narrowed to `episode` when one was requested, and come back sorted by
    /// episode number.
    pub async fn streams(
        &self,
        kind: ContentType,
        id: &OpaqueId,
        episode: Option<u32>,
    ) -> Vec<ResolvedStream> {
        let entries: Vec<(String, String)> = match id {
            OpaqueId::Foreign(raw) => {
                debug!(id = %raw, "foreign id, no streams");
                return Vec::new();
            }
            OpaqueId::TitleAndUrl { title, url } => vec![(title.clone(), url.clone())],
            OpaqueId::TitleOnly { title } => {
                let hits = self.search(kind, title, 0).await;
                info!(title = %title, hits = hits.len(), "searched upstream for legacy id");
                hits.into_iter().map(|hit| (hit.title, hit.url)).collect()
            }
        };

        let (items, ordering) = match kind {
            ContentType::Movie => (
                entries
                    .into_iter()
                    .map(|(title, url)| WorkItem::new(title, url))
                    .collect(),
                BatchOrdering::Completion,
            ),
            ContentType::Series => {
                let mut items = Vec::new();
                for (_, series_url) in entries {
                    items.extend(
                        self.episodes(&series_url)
                            .await
                            .into_iter()
                            .filter(|ep| episode.map_or(true, |wanted| ep.number == wanted))
                            .map(|ep| WorkItem::new(ep.label, ep.url)),
                    );
                }
                (items, BatchOrdering::ByEpisode)
            }
        };

        debug!(%kind, items = items.len(), "dispatching resolutions");
        self.dispatcher.dispatch(items, ordering).await
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    /// Descriptive metadata for a decoded id.
    ///
    /// Fields that cannot be scraped stay empty; callers apply the record's
    /// defaults. Series records carry their episodes sorted by number.
    pub async fn metadata(&self, kind: ContentType, id: &OpaqueId) -> MetadataRecord {
        let url = match id {
            OpaqueId::Foreign(_) => None,
            OpaqueId::TitleAndUrl { url, .. } => Some(url.clone()),
            OpaqueId::TitleOnly { title } => self.find_entry_url(kind, title).await,
        };
        let Some(url) = url else {
            return MetadataRecord::default();
        };

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %url, error = %e, "entry page unavailable, serving defaults");
                return MetadataRecord::default();
            }
        };

        let mut record = parse_metadata(&page.body);
        if kind == ContentType::Series {
            let mut episodes = parse_episodes(&page.body).unwrap_or_else(|e| {
                warn!(url = %url, error = %e, "episode list unavailable");
                Vec::new()
            });
            episodes.sort_by_key(|ep| ep.number);
            record.episodes = episodes
                .into_iter()
                .map(|episode| EpisodeMetadata {
                    released: release_date(episode.aired.as_deref(), record.year.as_deref()),
                    episode,
                })
                .collect();
        }
        record
    }
}

impl std::fmt::Debug for AkwamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AkwamClient")
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .field("resolver", &self.resolver)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
