//! Wire shapes for catalog, meta and stream responses.

use akwam_common::{ids, CatalogEntry, ContentType, MetadataRecord, ResolvedStream};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub metas: Vec<MetaPreview>,
}

/// One entry of a catalog page.
#[derive(Debug, Serialize)]
pub struct MetaPreview {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub name: String,
    pub poster: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub genres: Vec<String>,
    pub background: String,
}

impl MetaPreview {
    pub fn from_entry(kind: ContentType, entry: CatalogEntry) -> Self {
        Self {
            id: ids::encode(&entry.title, Some(entry.url.as_str())),
            kind,
            name: entry.title,
            background: entry.thumbnail.clone(),
            poster: entry.thumbnail,
            year: entry.year,
            genres: entry.tags,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub meta: MetaDetail,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDetail {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub genres: Vec<String>,
    pub cast: Vec<String>,
    pub imdb_rating: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<Video>>,
}

/// One episode of a series meta.
#[derive(Debug, Serialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub season: u32,
    pub episode: u32,
    pub released: String,
}

/// Every episode lives in season 1; the site does not split seasons.
const SEASON: u32 = 1;

impl MetaDetail {
    /// Apply the record's defaults. `fallback_title` names the entry when the
    /// page had no heading.
    pub fn from_record(
        token: &str,
        kind: ContentType,
        fallback_title: &str,
        record: MetadataRecord,
    ) -> Self {
        let name = record.title_or_default(fallback_title);
        let videos = (kind == ContentType::Series).then(|| {
            record
                .episodes
                .iter()
                .map(|ep| Video {
                    id: ids::video_id(token, SEASON, ep.episode.number),
                    title: ep.episode.label.clone(),
                    season: SEASON,
                    episode: ep.episode.number,
                    released: ep.released.clone(),
                })
                .collect()
        });

        Self {
            id: token.to_string(),
            kind,
            description: record.description_or_default(&name),
            background: record.background_or_default(),
            imdb_rating: record.rating_or_default(),
            poster: record.poster,
            year: record.year,
            genres: record.genres,
            cast: Vec::new(),
            videos,
            name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StreamResponse {
    pub streams: Vec<ResolvedStream>,
}
