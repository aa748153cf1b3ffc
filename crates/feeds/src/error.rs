//! Error types for feed operations.

use thiserror::Error;

/// Errors that can occur while fetching market rows.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Unexpected response shape: {0}")]
    UnexpectedShape(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        FeedError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Parse(err.to_string())
    }
}

impl FeedError {
    /// Returns true if this error is transient and likely to succeed on
    /// the next poll. Shape and parse errors are not: the endpoint is
    /// returning something this version does not understand.
    pub fn is_transient(&self) -> bool {
        matches!(self, FeedError::Http(_) | FeedError::Status(_))
    }
}
