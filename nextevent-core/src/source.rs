//! Feed source identity and the storage keys derived from it.

use crate::error::{NextEventError, NextEventResult};

const TIMESTAMP_KEY_SUFFIX: &str = "@@mtime";

/// A calendar feed, identified by its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource(String);

impl FeedSource {
    pub fn new(url: &str) -> NextEventResult<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(NextEventError::Config("feed_url is not set".into()));
        }
        Ok(FeedSource(url.to_string()))
    }

    pub fn url(&self) -> &str {
        &self.0
    }

    /// URL actually requested; webcal:// subscriptions are served over https.
    pub fn fetch_url(&self) -> String {
        match self.0.strip_prefix("webcal://") {
            Some(rest) => format!("https://{rest}"),
            None => self.0.clone(),
        }
    }

    /// Store key holding the feed text.
    pub fn content_key(&self) -> String {
        self.0.clone()
    }

    /// Store key holding the fetch timestamp.
    pub fn timestamp_key(&self) -> String {
        format!("{}{}", self.0, TIMESTAMP_KEY_SUFFIX)
    }
}
