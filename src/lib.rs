//! Akwam addon - catalog, metadata and stream endpoints over the Akwam site
//!
//! This library crate exposes the server and configuration for integration
//! testing.

pub mod config;
pub mod server;
