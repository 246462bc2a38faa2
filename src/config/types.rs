use akwam_common::Quality;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub addon: AddonConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// The scraped site.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Follow redirects from `base_url` once at startup and use the final
    /// origin for every request (default: true)
    #[serde(default = "default_resolve_base_url")]
    pub resolve_base_url: bool,

    /// Per-fetch timeout; bounds every hop of a resolution
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Quality tiers to attempt, in any order
    #[serde(default = "default_qualities")]
    pub qualities: Vec<Quality>,
}

fn default_base_url() -> String {
    "https://ak.sv".to_string()
}
fn default_resolve_base_url() -> bool {
    true
}
fn default_request_timeout() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!("akwam-addon/{}", env!("CARGO_PKG_VERSION"))
}
fn default_qualities() -> Vec<Quality> {
    Quality::ALL.to_vec()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            resolve_base_url: default_resolve_base_url(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
            qualities: default_qualities(),
        }
    }
}

/// What the addon advertises and how it pages and fans out.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddonConfig {
    #[serde(default = "default_addon_id")]
    pub id: String,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_description")]
    pub description: String,

    #[serde(default = "default_icon")]
    pub icon: String,

    /// Entries per catalog page (default: 24)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Concurrent resolutions within one stream request (default: 16)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Prefix of every stream's provider name, e.g. `Akwam 720p`
    #[serde(default = "default_name")]
    pub provider_label: String,

    /// Externally hosted configuration page. When set, the manifest is
    /// advertised as configurable and `/configure` redirects here.
    #[serde(default)]
    pub configure_url: Option<String>,
}

fn default_addon_id() -> String {
    "community.aymene69.akwam".to_string()
}
fn default_name() -> String {
    "Akwam".to_string()
}
fn default_description() -> String {
    "Movies and series from Akwam with direct download streams".to_string()
}
fn default_icon() -> String {
    "https://ak.sv/style/assets/images/icons/apple-touch-icon.png".to_string()
}
fn default_page_size() -> usize {
    24
}
fn default_max_concurrency() -> usize {
    16
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            id: default_addon_id(),
            name: default_name(),
            description: default_description(),
            icon: default_icon(),
            page_size: default_page_size(),
            max_concurrency: default_max_concurrency(),
            provider_label: default_name(),
            configure_url: None,
        }
    }
}
