//! Per-request concurrent fan-out of link resolutions.
//!
//! Every work item is resolved as its own task in a [`JoinSet`] scoped to the
//! call, with a semaphore bounding how many run at once. Results are gathered
//! as tasks complete. A failing or panicking task is logged and dropped; its
//! siblings keep running. Dropping the returned future aborts the whole group.

use std::sync::Arc;

use akwam_common::ResolvedStream;
use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::numbering::episode_number;

/// One unit of resolution work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Title the resulting stream is labelled with.
    pub title: String,
    /// Entry or episode page to resolve.
    pub url: String,
}

impl WorkItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// How the joined results are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOrdering {
    /// Completion order (non-deterministic).
    Completion,
    /// Ascending episode number recovered from each stream title, applied
    /// once every task has finished.
    ByEpisode,
}

/// Resolves one work item.
#[async_trait]
pub trait StreamResolver: Send + Sync + 'static {
    async fn resolve(&self, item: &WorkItem) -> Result<ResolvedStream, ResolveError>;
}

/// Fans resolutions out over a bounded task group.
#[derive(Clone)]
pub struct Dispatcher {
    resolver: Arc<dyn StreamResolver>,
    max_concurrency: usize,
}

impl Dispatcher {
    pub fn new(resolver: Arc<dyn StreamResolver>, max_concurrency: usize) -> Self {
        Self {
            resolver,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Resolve every item and join the successes.
    pub async fn dispatch(&self, items: Vec<WorkItem>, ordering: BatchOrdering) -> Vec<ResolvedStream> {
        let total = items.len();
        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for item in items {
            let resolver = Arc::clone(&self.resolver);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                let outcome = resolver.resolve(&item).await;
                (item, outcome)
            });
        }

        let mut streams = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((item, Ok(stream))) => {
                    debug!(title = %item.title, provider = %stream.provider_label, "resolved stream");
                    streams.push(stream);
                }
                Ok((item, Err(e))) => {
                    warn!(title = %item.title, url = %item.url, error = %e, "dropping unresolved item");
                }
                Err(e) => {
                    warn!(error = %e, "resolution task did not complete, dropping item");
                }
            }
        }

        if ordering == BatchOrdering::ByEpisode {
            streams.sort_by_key(|stream| episode_number(&stream.title));
        }

        debug!(resolved = streams.len(), total, "batch joined");
        streams
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("max_concurrency", &self.max_concurrency)
            .finish_non_exhaustive()
    }
}
