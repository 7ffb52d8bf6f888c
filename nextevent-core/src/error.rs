//! Error types for nextevent.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while fetching, caching or resolving a feed.
#[derive(Error, Debug)]
pub enum NextEventError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch calendar feed: {0}")]
    Fetch(String),

    #[error("Calendar feed request timed out after {0:?}")]
    FetchTimeout(Duration),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NextEventError {
    /// True for any failure to obtain the feed from the network.
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, NextEventError::Fetch(_) | NextEventError::FetchTimeout(_))
    }
}

/// Result type alias for nextevent operations.
pub type NextEventResult<T> = Result<T, NextEventError>;
