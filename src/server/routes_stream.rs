use crate::server::dto::StreamResponse;
use crate::server::{parse_kind, AppContext};
use akwam_common::ids;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

pub fn stream_routes() -> Router<AppContext> {
    Router::new().route("/stream/:type/:id", get(get_streams))
}

#[derive(Deserialize)]
struct StreamPath {
    #[serde(rename = "type")]
    kind: String,
    id: String,
}

/// Resolve playable links for an id. Undecodable and foreign ids answer with
/// an empty list, never an error.
async fn get_streams(State(ctx): State<AppContext>, Path(path): Path<StreamPath>) -> Response {
    let kind = match parse_kind(&path.kind) {
        Ok(kind) => kind,
        Err(rejection) => return rejection.into_response(),
    };

    let (token, episode) = ids::split_video_id(&path.id);
    let id = ids::decode(token);
    if id.is_foreign() {
        tracing::debug!(id = %token, "Skipping foreign id");
        return Json(StreamResponse { streams: Vec::new() }).into_response();
    }

    let streams = ctx.scraper.streams(kind, &id, episode).await;
    tracing::info!(
        title = id.title().unwrap_or_default(),
        %kind,
        episode = ?episode,
        count = streams.len(),
        "Resolved streams"
    );

    Json(StreamResponse { streams }).into_response()
}
