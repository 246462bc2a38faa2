use crate::server::dto::{CatalogResponse, MetaPreview};
use crate::server::{parse_kind, strip_json, AppContext, Manifest};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashMap;

pub fn catalog_routes() -> Router<AppContext> {
    Router::new()
        .route("/catalog/:type/:id", get(get_catalog))
        .route("/catalog/:type/:id/:extra", get(get_catalog_with_extra))
}

#[derive(Deserialize)]
struct CatalogPath {
    #[serde(rename = "type")]
    kind: String,
    id: String,
}

#[derive(Deserialize)]
struct CatalogExtraPath {
    #[serde(rename = "type")]
    kind: String,
    id: String,
    extra: String,
}

/// `?skip=` from the query string. A malformed value is ignored, the same as
/// in the extra segment.
fn query_skip(query: &HashMap<String, String>) -> Option<usize> {
    query.get("skip").and_then(|skip| skip.trim().parse().ok())
}

/// Extra catalog arguments carried in the last path segment as
/// `genre=..&skip=..&search=..`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CatalogExtra {
    pub genre: Option<String>,
    pub search: Option<String>,
    pub skip: Option<usize>,
}

impl CatalogExtra {
    pub fn parse(segment: &str) -> Self {
        let mut extra = Self::default();
        for pair in strip_json(segment).split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key {
                "genre" => extra.genre = Some(value.to_string()),
                "search" => extra.search = Some(value.to_string()),
                "skip" => extra.skip = value.parse().ok(),
                _ => {}
            }
        }
        extra
    }
}

async fn get_catalog(
    State(ctx): State<AppContext>,
    Path(path): Path<CatalogPath>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let extra = CatalogExtra {
        skip: query_skip(&query),
        ..Default::default()
    };
    catalog(ctx, &path.kind, &path.id, extra).await
}

async fn get_catalog_with_extra(
    State(ctx): State<AppContext>,
    Path(path): Path<CatalogExtraPath>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut extra = CatalogExtra::parse(&path.extra);
    extra.skip = extra.skip.or_else(|| query_skip(&query));
    catalog(ctx, &path.kind, &path.id, extra).await
}

async fn catalog(
    ctx: AppContext,
    kind: &str,
    catalog_id: &str,
    extra: CatalogExtra,
) -> Response {
    let kind = match parse_kind(kind) {
        Ok(kind) => kind,
        Err(rejection) => return rejection.into_response(),
    };
    let catalog_id = strip_json(catalog_id);
    let skip = extra.skip.unwrap_or(0);

    let entries = match extra.search.as_deref() {
        Some(query) => ctx.scraper.search(kind, query, skip).await,
        None if Manifest::is_search_catalog(catalog_id) => Vec::new(),
        None => ctx.scraper.catalog(kind, extra.genre.as_deref(), skip).await,
    };

    tracing::debug!(
        catalog = %catalog_id,
        %kind,
        skip,
        count = entries.len(),
        "Serving catalog page"
    );

    let metas = entries
        .into_iter()
        .map(|entry| MetaPreview::from_entry(kind, entry))
        .collect();
    Json(CatalogResponse { metas }).into_response()
}
