//! Akwam-Scraper: listing, episode, metadata and link scraping.
//!
//! The upstream site exposes no API, so everything here is HTML scraping
//! against markup we do not control. Each concern lives in its own module:
//!
//! - [`fetch`] -- The [`PageFetcher`] seam and its reqwest implementation.
//! - [`catalog`] -- Listing and search page parsing, offset-to-page windows.
//! - [`genres`] -- Static genre name to category id table.
//! - [`episodes`] -- Series page to ordered-later episode references.
//! - [`extract`] -- Per-hop extraction strategies for the link chain.
//! - [`resolver`] -- The three-hop link resolution state machine.
//! - [`dispatcher`] -- Per-request concurrent fan-out of resolutions.
//! - [`enrich`] -- Descriptive metadata scraping.
//! - [`client`] -- [`AkwamClient`], the facade the addon server talks to.
//!
//! Failures are contained at the smallest unit: a page, an item or a field.
//! Public operations that serve a response return possibly-empty values
//! instead of errors.

pub mod catalog;
pub mod client;
pub mod dates;
pub mod dispatcher;
pub mod enrich;
pub mod episodes;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod genres;
mod html;
pub mod numbering;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{AkwamClient, ClientOptions};
pub use dispatcher::{BatchOrdering, Dispatcher, StreamResolver, WorkItem};
pub use error::{ResolveError, Result, ScrapeError};
pub use extract::HopExtractors;
pub use fetch::{HttpFetcher, Page, PageFetcher};
pub use resolver::LinkResolver;
