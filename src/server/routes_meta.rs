use crate::server::dto::{MetaDetail, MetaResponse};
use crate::server::{parse_kind, AppContext};
use akwam_common::ids;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

pub fn meta_routes() -> Router<AppContext> {
    Router::new().route("/meta/:type/:id", get(get_meta))
}

#[derive(Deserialize)]
struct MetaPath {
    #[serde(rename = "type")]
    kind: String,
    id: String,
}

async fn get_meta(State(ctx): State<AppContext>, Path(path): Path<MetaPath>) -> Response {
    let kind = match parse_kind(&path.kind) {
        Ok(kind) => kind,
        Err(rejection) => return rejection.into_response(),
    };

    let (token, _) = ids::split_video_id(&path.id);
    let id = ids::decode(token);
    let fallback_title = id.title().unwrap_or(token).to_string();

    let record = ctx.scraper.metadata(kind, &id).await;
    tracing::debug!(
        id = %token,
        %kind,
        episodes = record.episodes.len(),
        "Serving meta"
    );

    let meta = MetaDetail::from_record(token, kind, &fallback_title, record);
    Json(MetaResponse { meta }).into_response()
}
