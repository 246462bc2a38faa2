//! Genre name to upstream category id table.
//!
//! Catalog clients send the localized genre name; the listing pages filter by
//! numeric category. Movies and series currently share the same categories.

use akwam_common::ContentType;

/// Category id meaning "no filter".
pub const ALL_CATEGORIES: u32 = 0;

const SHARED_GENRES: &[(&str, u32)] = &[
    ("أكشن", 18),
    ("كوميدي", 20),
    ("دراما", 23),
    ("رومانسي", 27),
    ("رعب", 22),
    ("خيال علمي", 24),
    ("فانتازيا", 43),
    ("مغامرة", 19),
    ("جريمة", 21),
    ("تاريخي", 26),
    ("وثائقي", 28),
    ("حربي", 25),
    ("رياضي", 32),
    ("عائلي", 33),
    ("موسيقى", 31),
    ("سيرة ذاتية", 29),
    ("مدبلج", 71),
    ("NETFLIX", 72),
    ("أطفال", 88),
    ("قصير", 89),
    ("رمضان", 87),
];

/// Genre table for a content type.
pub fn genres(kind: ContentType) -> &'static [(&'static str, u32)] {
    match kind {
        ContentType::Movie | ContentType::Series => SHARED_GENRES,
    }
}

/// Genre names in display order, as advertised in the manifest.
pub fn genre_names(kind: ContentType) -> Vec<&'static str> {
    genres(kind).iter().map(|(name, _)| *name).collect()
}

/// Category id for an exact genre name.
pub fn category_id(kind: ContentType, name: &str) -> Option<u32> {
    genres(kind)
        .iter()
        .find(|(genre, _)| *genre == name)
        .map(|(_, id)| *id)
}
