//! Error type for the closed vocabularies (content types, quality tiers).

/// Common error type for akwam-common.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The content type is neither `movie` nor `series`.
    #[error("Unknown content type: {0}")]
    UnknownContentType(String),

    /// The quality label is not one of the supported tiers.
    #[error("Unknown quality tier: {0}")]
    UnknownQuality(String),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
