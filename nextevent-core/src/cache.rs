//! Two-tier freshness cache in front of the feed download.
//!
//! A stored feed is reused only while it is younger than the freshness
//! window *and* was fetched after the current configuration took effect.
//! Anything else triggers exactly one download; a failed download is an
//! error, never a fallback to the old text.

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};

use crate::config::FeedSettings;
use crate::error::NextEventResult;
use crate::fetch::FeedFetcher;
use crate::source::FeedSource;
use crate::store::{KeyValueStore, StoredValue};

/// A feed text together with the instant it was downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub text: String,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh(
        &self,
        now: DateTime<Utc>,
        config_epoch: DateTime<Utc>,
        max_age: Duration,
    ) -> bool {
        self.fetched_at > config_epoch && now - self.fetched_at < max_age
    }
}

pub struct FeedCache<S, F> {
    source: FeedSource,
    config_epoch: DateTime<Utc>,
    max_age: Duration,
    store: S,
    fetcher: F,
}

impl<S: KeyValueStore, F: FeedFetcher> FeedCache<S, F> {
    pub fn new(settings: &FeedSettings, store: S, fetcher: F) -> Self {
        FeedCache {
            source: settings.source.clone(),
            config_epoch: settings.config_epoch,
            max_age: settings.cache_ics_timeout,
            store,
            fetcher,
        }
    }

    /// Current feed text: the stored copy if fresh, otherwise a new download.
    pub async fn feed_text(&mut self, now: DateTime<Utc>) -> NextEventResult<String> {
        if let Some(entry) = self.load_entry() {
            if entry.is_fresh(now, self.config_epoch, self.max_age) {
                debug!("Using cached feed fetched at {}", entry.fetched_at);
                return Ok(entry.text);
            }
            debug!("Cached feed from {} is stale", entry.fetched_at);
        }

        let text = self.fetcher.fetch(&self.source).await?;
        self.store_entry(&text, now);
        Ok(text)
    }

    /// The stored entry, if both halves are present and well-typed.
    pub fn load_entry(&self) -> Option<CacheEntry> {
        let text = match self.store.get(&self.source.content_key())? {
            StoredValue::Text(text) => text,
            StoredValue::Timestamp(_) => return None,
        };
        let fetched_at = match self.store.get(&self.source.timestamp_key())? {
            StoredValue::Timestamp(ms) => DateTime::from_timestamp_millis(ms)?,
            StoredValue::Text(_) => return None,
        };

        Some(CacheEntry { text, fetched_at })
    }

    // Content goes first: a crash between the writes leaves an old or missing
    // timestamp, which reads back as stale.
    fn store_entry(&mut self, text: &str, now: DateTime<Utc>) {
        let result = self
            .store
            .set(&self.source.content_key(), StoredValue::Text(text.to_string()))
            .and_then(|_| {
                self.store.set(
                    &self.source.timestamp_key(),
                    StoredValue::Timestamp(now.timestamp_millis()),
                )
            });

        if let Err(e) = result {
            warn!("Could not cache feed {}: {}", self.source.url(), e);
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
