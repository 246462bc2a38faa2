mod cli;

use akwam_addon::{config, server};
use akwam_common::ids::{self, OpaqueId};
use akwam_scraper::{HopExtractors, HttpFetcher, LinkResolver};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::sync::Arc;
use std::time::Duration;

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // CLI flags win over the file and environment
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config::validate_config(&config)?;

    tracing::info!("Starting Akwam addon {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let ctx = server::AppContext::connect(config).await?;
    let result = server::start_server(ctx).await;

    tracing::info!("Shutting down...");
    result
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "akwam_addon=trace,akwam_scraper=trace,tower_http=debug".to_string()
        } else {
            "akwam_addon=debug,akwam_scraper=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Resolve { url, title } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(resolve_entry(&url, &title, cli.config.as_deref()))
        }
        Commands::Decode { token } => decode_token(&token),
        Commands::Validate { file } => {
            let path = file.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("akwam-addon {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Run the link chain once, for diagnosing markup drift.
async fn resolve_entry(
    url: &str,
    title: &str,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let fetcher = HttpFetcher::new(
        Duration::from_secs(config.upstream.request_timeout_secs),
        &config.upstream.user_agent,
    )?;
    let tiers = &config.upstream.qualities;
    let resolver = LinkResolver::new(
        Arc::new(fetcher),
        HopExtractors::akwam(tiers),
        tiers,
        config.addon.provider_label.clone(),
    );

    tracing::info!("Resolving {}", url);
    let stream = resolver.resolve(title, url).await?;
    println!("{}", serde_json::to_string_pretty(&stream)?);
    Ok(())
}

fn decode_token(token: &str) -> Result<()> {
    let (token, episode) = ids::split_video_id(token);
    match ids::decode(token) {
        OpaqueId::Foreign(raw) => println!("Foreign id: {}", raw),
        OpaqueId::TitleOnly { title } => {
            println!("Title-only id (resolved by search)");
            println!("  Title: {}", title);
        }
        OpaqueId::TitleAndUrl { title, url } => {
            println!("Title and URL id");
            println!("  Title: {}", title);
            println!("  URL:   {}", url);
        }
    }
    if let Some(episode) = episode {
        println!("  Episode: {}", episode);
    }
    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Upstream: {}", config.upstream.base_url);
            println!(
                "  Resolve base URL at startup: {}",
                config.upstream.resolve_base_url
            );
            println!("  Request timeout: {}s", config.upstream.request_timeout_secs);
            println!(
                "  Qualities: {}",
                config
                    .upstream
                    .qualities
                    .iter()
                    .map(|q| q.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!("  Addon id: {}", config.addon.id);
            println!("  Page size: {}", config.addon.page_size);
            println!("  Max concurrency: {}", config.addon.max_concurrency);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Upstream: {}", config.upstream.base_url);
        }
    }

    Ok(())
}
