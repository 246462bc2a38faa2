//! Static addon descriptor served at `/manifest.json`.

use akwam_common::{ids::ID_PREFIX, ContentType};
use akwam_scraper::genres::genre_names;
use serde::Serialize;

use crate::config::AddonConfig;

pub const MOVIES_CATALOG: &str = "akwam-movies";
pub const SERIES_CATALOG: &str = "akwam-series";
pub const MOVIES_SEARCH_CATALOG: &str = "akwam-movies-search";
pub const SERIES_SEARCH_CATALOG: &str = "akwam-series-search";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub resources: Vec<&'static str>,
    pub types: Vec<ContentType>,
    pub id_prefixes: Vec<&'static str>,
    pub catalogs: Vec<CatalogDescriptor>,
    pub behavior_hints: BehaviorHints,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogDescriptor {
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub id: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<&'static str>>,
    pub extra: Vec<ExtraDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraDescriptor {
    pub name: &'static str,
    pub is_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<&'static str>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BehaviorHints {
    pub configurable: bool,
}

impl CatalogDescriptor {
    fn browse(kind: ContentType, id: &'static str, name: String) -> Self {
        let genres = genre_names(kind);
        Self {
            kind,
            id,
            name,
            genres: Some(genres.clone()),
            extra: vec![
                ExtraDescriptor {
                    name: "genre",
                    is_required: false,
                    options: Some(genres),
                },
                ExtraDescriptor {
                    name: "skip",
                    is_required: false,
                    options: None,
                },
            ],
        }
    }

    fn search(kind: ContentType, id: &'static str, name: String) -> Self {
        Self {
            kind,
            id,
            name,
            genres: None,
            extra: vec![ExtraDescriptor {
                name: "search",
                is_required: true,
                options: None,
            }],
        }
    }
}

impl Manifest {
    pub fn new(addon: &AddonConfig) -> Self {
        let movies = format!("{} Movies", addon.name);
        let series = format!("{} Series", addon.name);
        Self {
            id: addon.id.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: addon.name.clone(),
            description: addon.description.clone(),
            icon: addon.icon.clone(),
            resources: vec!["catalog", "meta", "stream"],
            types: vec![ContentType::Movie, ContentType::Series],
            id_prefixes: vec![ID_PREFIX],
            catalogs: vec![
                CatalogDescriptor::browse(ContentType::Movie, MOVIES_CATALOG, movies.clone()),
                CatalogDescriptor::browse(ContentType::Series, SERIES_CATALOG, series.clone()),
                CatalogDescriptor::search(ContentType::Movie, MOVIES_SEARCH_CATALOG, movies),
                CatalogDescriptor::search(ContentType::Series, SERIES_SEARCH_CATALOG, series),
            ],
            behavior_hints: BehaviorHints {
                configurable: addon.configure_url.is_some(),
            },
        }
    }

    /// Whether `id` names a search catalog.
    pub fn is_search_catalog(id: &str) -> bool {
        id == MOVIES_SEARCH_CATALOG || id == SERIES_SEARCH_CATALOG
    }
}
