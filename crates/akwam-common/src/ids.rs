//! Opaque identifier codec.
//!
//! Catalog clients only ever see a single token per entry. The token binds the
//! entry title, and usually the entry page URL, so that the meta and stream
//! endpoints can find the entry again without any server-side state.
//!
//! Layout: `akwam` + base64(`title` [`::` `url`]).
//!
//! Tokens are emitted with the URL-safe alphabet and no padding. The decoder
//! also accepts the standard alphabet and padded input so tokens minted by
//! older deployments keep working.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

/// Namespace marker prefixed to every token this addon mints.
pub const ID_PREFIX: &str = "akwam";

/// Reserved separator between title and URL inside the encoded payload.
pub const SEPARATOR: &str = "::";

const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Classification of a decoded token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpaqueId {
    /// Not one of ours (e.g. an IMDb id) or not decodable.
    Foreign(String),
    /// Legacy token carrying only the entry title.
    TitleOnly { title: String },
    /// Token carrying the entry title and its page URL.
    TitleAndUrl { title: String, url: String },
}

impl OpaqueId {
    /// Title carried by the token, if any.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Foreign(_) => None,
            Self::TitleOnly { title } | Self::TitleAndUrl { title, .. } => Some(title),
        }
    }

    /// Source URL carried by the token, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::TitleAndUrl { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn is_foreign(&self) -> bool {
        matches!(self, Self::Foreign(_))
    }
}

/// Encode a title and optional source URL into an opaque token.
///
/// Neither part may contain [`SEPARATOR`]; such input does not round-trip.
pub fn encode(title: &str, url: Option<&str>) -> String {
    let payload = match url {
        Some(url) => format!("{title}{SEPARATOR}{url}"),
        None => title.to_string(),
    };
    format!("{ID_PREFIX}{}", URL_SAFE_LENIENT.encode(payload.as_bytes()))
}

/// Decode a token. Never fails: anything unrecognised is [`OpaqueId::Foreign`].
pub fn decode(token: &str) -> OpaqueId {
    let foreign = || OpaqueId::Foreign(token.to_string());

    let Some(encoded) = token.strip_prefix(ID_PREFIX) else {
        return foreign();
    };
    if encoded.is_empty() {
        return foreign();
    }

    let bytes = match URL_SAFE_LENIENT
        .decode(encoded)
        .or_else(|_| STANDARD_LENIENT.decode(encoded))
    {
        Ok(bytes) => bytes,
        Err(_) => return foreign(),
    };
    let Ok(payload) = String::from_utf8(bytes) else {
        return foreign();
    };

    match payload.split_once(SEPARATOR) {
        Some((title, url)) => OpaqueId::TitleAndUrl {
            title: title.to_string(),
            url: url.to_string(),
        },
        None if payload.is_empty() => foreign(),
        None => OpaqueId::TitleOnly { title: payload },
    }
}

/// Split a raw path id into the token and an optional requested episode.
///
/// Strips a trailing `.json`, then a `:{season}:{episode}` video suffix. The
/// base64 alphabets never contain `:`, so the first colon always ends the
/// token. A malformed suffix is ignored.
pub fn split_video_id(raw: &str) -> (&str, Option<u32>) {
    let raw = raw.strip_suffix(".json").unwrap_or(raw);
    let Some((token, suffix)) = raw.split_once(':') else {
        return (raw, None);
    };

    let episode = suffix
        .rsplit(':')
        .next()
        .and_then(|ep| ep.parse::<u32>().ok());
    let episode = if suffix.contains(':') { episode } else { None };
    (token, episode)
}

/// Build the per-episode video id emitted in series metadata.
pub fn video_id(token: &str, season: u32, episode: u32) -> String {
    format!("{token}:{season}:{episode}")
}
