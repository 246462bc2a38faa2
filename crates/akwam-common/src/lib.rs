//! Akwam-Common: Shared types and the opaque ID codec.
//!
//! This crate provides the vocabulary shared by the scraper and the addon
//! server:
//!
//! - **Opaque IDs**: Encoding a title (and optionally its source URL) into the
//!   wire token handed to catalog clients, and the total decoder for it
//! - **Core Types**: Content types, quality tiers, scraped entries, episodes,
//!   resolved streams and metadata records
//! - **Error Handling**: Error type for parsing the closed vocabularies
//!
//! # Examples
//!
//! ```
//! use akwam_common::ids::{decode, encode, OpaqueId};
//!
//! let token = encode("Inception", Some("https://ak.sv/movie/1/inception"));
//! assert_eq!(
//!     decode(&token),
//!     OpaqueId::TitleAndUrl {
//!         title: "Inception".into(),
//!         url: "https://ak.sv/movie/1/inception".into(),
//!     }
//! );
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::OpaqueId;
pub use types::*;
