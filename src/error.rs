//! Error types for the explorer

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    /// The block payload carried neither a `Version1` nor a `Version2` tag.
    #[error("Unknown block version")]
    UnknownBlockVersion,
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),
    #[error("Invalid page: {0}")]
    InvalidPage(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        ExplorerError::UpstreamFetch(err.to_string())
    }
}

impl From<serde_json::Error> for ExplorerError {
    fn from(err: serde_json::Error) -> Self {
        ExplorerError::Decode(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ExplorerError>;
