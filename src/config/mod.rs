mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = parse_config(&content)
        .with_context(|| format!("Failed to load config file: {:?}", path))?;

    Ok(config)
}

/// Parse, apply environment overrides and validate.
pub fn parse_config(content: &str) -> Result<Config> {
    let mut config: Config = toml::from_str(content).context("Invalid TOML")?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config)?;
    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./akwam-addon.toml",
        "~/.config/akwam-addon/config.toml",
        "/etc/akwam-addon/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config)?;
    Ok(config)
}

/// `PORT` and `ADDON_ID` take precedence over the file.
fn apply_env_overrides<F>(config: &mut Config, var: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = var("PORT").filter(|p| !p.trim().is_empty()) {
        config.server.port = port
            .trim()
            .parse()
            .with_context(|| format!("PORT is not a valid port: {port:?}"))?;
    }
    if let Some(id) = var("ADDON_ID").filter(|id| !id.trim().is_empty()) {
        config.addon.id = id.trim().to_string();
    }
    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    let base = &config.upstream.base_url;
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        anyhow::bail!("Upstream base_url must start with http:// or https://: {base}");
    }
    if config.upstream.request_timeout_secs == 0 {
        anyhow::bail!("Upstream request_timeout_secs cannot be 0");
    }
    if config.upstream.qualities.is_empty() {
        anyhow::bail!("At least one quality tier must be configured");
    }

    if config.addon.page_size == 0 {
        anyhow::bail!("Addon page_size cannot be 0");
    }
    if config.addon.max_concurrency == 0 {
        anyhow::bail!("Addon max_concurrency cannot be 0");
    }
    if config.addon.id.trim().is_empty() {
        anyhow::bail!("Addon id cannot be empty");
    }
    if let Some(url) = &config.addon.configure_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("Addon configure_url must start with http:// or https://: {url}");
        }
    }

    Ok(())
}
