//! Downloading the calendar feed.

use std::future::Future;
use std::time::Duration;

use log::info;
use tokio::time::timeout;

use crate::error::{NextEventError, NextEventResult};
use crate::source::FeedSource;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(3);

/// Something that can retrieve the text of a feed.
pub trait FeedFetcher {
    fn fetch(&self, source: &FeedSource) -> impl Future<Output = NextEventResult<String>>;
}

/// Fetches feeds with a single HTTP GET, bounded by [`FETCH_TIMEOUT`].
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new() -> NextEventResult<Self> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> NextEventResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("nextevent/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NextEventError::Fetch(e.to_string()))?;

        Ok(HttpFetcher { client, timeout })
    }

    async fn get(&self, url: &str) -> NextEventResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NextEventError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NextEventError::Fetch(format!("{url} returned {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| NextEventError::Fetch(e.to_string()))
    }
}

impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, source: &FeedSource) -> NextEventResult<String> {
        let url = source.fetch_url();
        info!("Fetching calendar feed from {url}");

        timeout(self.timeout, self.get(&url))
            .await
            .map_err(|_| NextEventError::FetchTimeout(self.timeout))?
    }
}
