use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use nextevent_core::cache::FeedCache;
use nextevent_core::config::{FeedSettings, NextEventConfig, config_epoch};
use nextevent_core::fetch::HttpFetcher;
use nextevent_core::render::render_event;
use nextevent_core::resolve::EventResolver;
use nextevent_core::store::JsonFileStore;

use super::print_payload;

pub async fn run(config_path: &Path, json: bool) -> Result<()> {
    let config = NextEventConfig::load(config_path)?;
    let settings = FeedSettings::from_config(&config, config_epoch(config_path))
        .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    let now = Utc::now();

    let store = JsonFileStore::open(settings.store_path.clone());
    let mut cache = FeedCache::new(&settings, store, HttpFetcher::new()?);
    let text = cache.feed_text(now).await?;

    let next = EventResolver::new(&settings).resolve_next(&text, now)?;
    match &next {
        Some(event) => log::debug!("Next event: '{}' at {}", event.title, event.start),
        None => log::debug!("No upcoming timed events"),
    }

    let payload = render_event(&settings, next.as_ref(), now);
    print_payload(&payload, &payload.full_text, json)
}
