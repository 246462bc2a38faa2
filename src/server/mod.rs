use crate::config::Config;
use akwam_common::ContentType;
use akwam_scraper::{
    fetch::resolve_base_url, AkwamClient, ClientOptions, HttpFetcher, PageFetcher,
};
use anyhow::{Context, Result};
use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod dto;
pub mod manifest;
pub mod routes_catalog;
pub mod routes_meta;
pub mod routes_stream;

pub use manifest::Manifest;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub scraper: Arc<AkwamClient>,
    pub manifest: Arc<Manifest>,
}

impl AppContext {
    /// Build the context around `fetcher`, scraping from `base_url`.
    pub fn new(config: Config, fetcher: Arc<dyn PageFetcher>, base_url: String) -> Self {
        let options = ClientOptions {
            base_url,
            page_size: config.addon.page_size,
            max_concurrency: config.addon.max_concurrency,
            provider_label: config.addon.provider_label.clone(),
            tiers: config.upstream.qualities.clone(),
        };
        let manifest = Manifest::new(&config.addon);

        Self {
            scraper: Arc::new(AkwamClient::new(fetcher, options)),
            manifest: Arc::new(manifest),
            config: Arc::new(config),
        }
    }

    /// Build the context with a real HTTP fetcher, resolving the canonical
    /// upstream origin first when configured to.
    pub async fn connect(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(
            Duration::from_secs(config.upstream.request_timeout_secs),
            &config.upstream.user_agent,
        )
        .context("Failed to build HTTP client")?;

        let base_url = if config.upstream.resolve_base_url {
            resolve_base_url(&fetcher, &config.upstream.base_url).await
        } else {
            config.upstream.base_url.trim_end_matches('/').to_string()
        };
        tracing::info!("Scraping from {}", base_url);

        Ok(Self::new(config, Arc::new(fetcher), base_url))
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(get_root))
        .merge(addon_routes())
        // Clients may prefix every path with their own config segment
        .nest("/:config", addon_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

fn addon_routes() -> Router<AppContext> {
    Router::new()
        .route("/manifest.json", get(get_manifest))
        .route("/configure", get(get_configure))
        .merge(routes_catalog::catalog_routes())
        .merge(routes_meta::meta_routes())
        .merge(routes_stream::stream_routes())
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Send visitors to the configuration page, or the manifest without one.
async fn get_root(axum::extract::State(ctx): axum::extract::State<AppContext>) -> Redirect {
    match &ctx.config.addon.configure_url {
        Some(_) => Redirect::temporary("/configure"),
        None => Redirect::temporary("/manifest.json"),
    }
}

async fn get_configure(axum::extract::State(ctx): axum::extract::State<AppContext>) -> Response {
    match &ctx.config.addon.configure_url {
        Some(url) => Redirect::temporary(url).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "No configuration page" })),
        )
            .into_response(),
    }
}

async fn get_manifest(
    axum::extract::State(ctx): axum::extract::State<AppContext>,
) -> Json<Manifest> {
    Json(ctx.manifest.as_ref().clone())
}

/// Parse a content type path segment; anything else is not a route we serve.
pub(crate) fn parse_kind(raw: &str) -> Result<ContentType, (StatusCode, Json<serde_json::Value>)> {
    raw.parse::<ContentType>().map_err(|e| {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
    })
}

/// Strip the `.json` suffix clients append to the last path segment.
pub(crate) fn strip_json(segment: &str) -> &str {
    segment.strip_suffix(".json").unwrap_or(segment)
}

/// Start the HTTP server
pub async fn start_server(ctx: AppContext) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", ctx.config.server.host, ctx.config.server.port)
        .parse()
        .context("Invalid server address")?;

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
