//! telcotag - find Telco support-case bugzillas missing the `Telco` tag.
//!
//! This library provides the core functionality for the `telcotag` CLI tool:
//! exchanging a portal offline token for a bearer token, searching the
//! case portal, resolving each open case's bugzillas, and prepending
//! `Telco ` to the internal whiteboard of the ones that lack it.

pub mod bugzilla;
pub mod cli;
pub mod commands;
pub mod config;
mod http;
pub mod logging;
pub mod models;
pub mod portal;
pub mod progress;

/// Library-level error type for telcotag operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport failure or non-success HTTP status
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Token endpoint answered without an access token
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Response body was not the expected JSON shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for telcotag operations.
pub type Result<T> = std::result::Result<T, Error>;
