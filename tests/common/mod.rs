//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which builds a full [`AppContext`] around a
//! [`StaticFetcher`] serving canned upstream pages, and starts Axum on a
//! random port for HTTP-level testing. The page builders below render the
//! upstream markup the scraper expects.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;

use akwam_addon::config::Config;
use akwam_addon::server::{create_router, AppContext};
use akwam_common::Quality;
use akwam_scraper::{Page, PageFetcher, ScrapeError};
use async_trait::async_trait;

pub const BASE: &str = "https://ak.sv";

/// Serves pages by exact URL; unknown URLs are a 404.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    panics: HashSet<String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// Fetching `url` panics, as a buggy unit would.
    pub fn panic_on(mut self, url: &str) -> Self {
        self.panics.insert(url.to_string());
        self
    }

    /// Entry page advertising 720p, plus its full hop chain ending at
    /// `https://s101.downet.net/download/{id}/{file}`.
    pub fn playable(self, entry: &str, id: u32, file: &str) -> Self {
        let link = format!("https://go.ak.sv/link/{id}");
        let download = format!("https://s1.downet.net/download/{id}/page");
        let direct = format!("https://s101.downet.net/download/{id}/{file}");
        self.page(entry, &entry_page(&[(Quality::P720, &link)]))
            .page(&link, &redirect_page(&download))
            .page(&download, &download_page(&direct))
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Page, ScrapeError> {
        if self.panics.contains(url) {
            panic!("fetcher exploded on {url}");
        }
        self.pages
            .get(url)
            .map(|body| Page {
                url: url.to_string(),
                body: body.clone(),
            })
            .ok_or_else(|| ScrapeError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Test harness wrapping a fully-constructed [`AppContext`].
pub struct TestHarness {
    pub ctx: AppContext,
}

impl TestHarness {
    pub fn new(fetcher: StaticFetcher) -> Self {
        Self::with_config(Config::default(), fetcher)
    }

    pub fn with_config(config: Config, fetcher: StaticFetcher) -> Self {
        let ctx = AppContext::new(config, Arc::new(fetcher), BASE.to_string());
        Self { ctx }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server(fetcher: StaticFetcher) -> (Self, SocketAddr) {
        Self::new(fetcher).serve().await
    }

    pub async fn serve(self) -> (Self, SocketAddr) {
        let app = create_router(self.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (self, addr)
    }
}

/// GET `path` and decode the JSON body.
pub async fn get_json(addr: SocketAddr, path: &str) -> (u16, serde_json::Value) {
    let resp = reqwest::get(format!("http://{addr}{path}"))
        .await
        .expect("request failed");
    let status = resp.status().as_u16();
    let json = resp.json().await.unwrap_or(serde_json::Value::Null);
    (status, json)
}

// ---------------------------------------------------------------------------
// Upstream markup
// ---------------------------------------------------------------------------

/// Listing page with one card per `(title, url, year)`.
pub fn listing_page(cards: &[(&str, &str, &str)]) -> String {
    let mut body =
        String::from(r#"<html><body><div class="widget-body row flex-wrap">"#);
    for (title, url, year) in cards {
        body.push_str(&format!(
            r#"
<div class="col-lg-auto col-md-4 col-6 mb-12">
  <div class="entry-box">
    <a href="{url}" class="box">
      <img data-src="https://img.downet.net/thumb/178x260/uploads/{year}.jpg" class="img-fluid w-100 lazy">
    </a>
    <span class="badge badge-pill badge-secondary">{year}</span>
    <h3 class="entry-title"><a href="{url}">{title}</a></h3>
    <span class="badge badge-pill badge-light">دراما</span>
  </div>
</div>"#
        ));
    }
    body.push_str("</div></body></html>");
    body
}

/// Listing page with `n` movie cards titled `Movie 0..n`.
pub fn numbered_listing(n: usize) -> String {
    let cards: Vec<(String, String)> = (0..n)
        .map(|i| (format!("Movie {i}"), format!("{BASE}/movie/{i}/m")))
        .collect();
    let borrowed: Vec<_> = cards
        .iter()
        .map(|(t, u)| (t.as_str(), u.as_str(), "2020"))
        .collect();
    listing_page(&borrowed)
}

/// Entry page advertising each `(tier, link)` quality tab.
pub fn entry_page(tiers: &[(Quality, &str)]) -> String {
    let mut tabs = String::new();
    let mut contents = String::new();
    for (i, (tier, link)) in tiers.iter().enumerate() {
        tabs.push_str(&format!("<li><a href=\"#tab-{i}\">{}</a></li>\n", tier.label()));
        contents.push_str(&format!(
            "<div class=\"tab-content quality\" id=\"tab-{i}\">\n<a href=\"{link}\" class=\"link-btn\">download</a>\n</div>\n"
        ));
    }
    format!("<html><body><ul>\n{tabs}</ul>\n{contents}</body></html>")
}

pub fn redirect_page(download: &str) -> String {
    format!("<html><body><a href=\"{download}\" class=\"download-link\">Click</a></body></html>")
}

pub fn download_page(direct: &str) -> String {
    format!("<html><body><a href=\"{direct}\" download>download</a></body></html>")
}

/// Series page with one episode block per `(label, url, date)`, preceded by
/// a heading and a year label.
pub fn series_page(title: &str, year: &str, episodes: &[(&str, &str, &str)]) -> String {
    let mut body = format!(
        r#"<html><body><h1 class="entry-title">{title}</h1><div><span>السنة : {year}</span></div>"#
    );
    for (label, url, date) in episodes {
        body.push_str(&format!(
            r#"
<div class="bg-primary2 p-4">
  <h2 class="font-size-18"><a href="{url}">{label}</a></h2>
  <p class="entry-date">{date}</p>
</div>"#
        ));
    }
    body.push_str("</body></html>");
    body
}

/// Movie entry page with descriptive fields.
pub fn movie_page(title: &str) -> String {
    format!(
        r#"<html><body>
<a href="https://img.downet.net/uploads/poster.jpg" data-fancybox>
  <picture><img src="https://img.downet.net/thumb/260x380/uploads/poster.jpg"></picture>
</a>
<h1 class="entry-title">{title}</h1>
<span>السنة : 2021</span>
<span class="mx-2">7.5 / 10</span>
<a class="badge badge-pill badge-light">مغامرة</a>
<div class="widget-body"><h2><div class="text-white">قصة الفيلم : رحلة طويلة. نهاية سعيدة. مشهد إضافي.</div></h2></div>
</body></html>"#
    )
}
