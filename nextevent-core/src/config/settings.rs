//! Validated, immutable settings derived from [`NextEventConfig`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use log::warn;

use crate::config::NextEventConfig;
use crate::error::{NextEventError, NextEventResult};
use crate::source::FeedSource;

/// Everything the feed cache and the event resolver need, fixed for the
/// lifetime of the process.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub source: FeedSource,
    /// Display refresh interval (`cached_until` of the render payload)
    pub cache_timeout: Duration,
    /// Feed freshness window
    pub cache_ics_timeout: Duration,
    pub format: String,
    pub format_none: String,
    pub urgent_time: Duration,
    pub timezone: Tz,
    pub store_path: PathBuf,
    /// Cache entries must be newer than this to be reused
    pub config_epoch: DateTime<Utc>,
}

impl FeedSettings {
    pub fn from_config(
        config: &NextEventConfig,
        config_epoch: DateTime<Utc>,
    ) -> NextEventResult<Self> {
        let source = FeedSource::new(&config.feed_url)?;

        let urgent_minutes = i64::try_from(config.urgent_time)
            .ok()
            .and_then(Duration::try_minutes)
            .ok_or_else(|| NextEventError::Config("urgent_time is out of range".into()))?;

        let store_path = match &config.store_path {
            Some(path) => expand_tilde(path),
            None => default_store_path()?,
        };

        Ok(FeedSettings {
            source,
            cache_timeout: seconds("cache_timeout", config.cache_timeout)?,
            cache_ics_timeout: seconds("cache_ics_timeout", config.cache_ics_timeout)?,
            format: config.format.clone(),
            format_none: config.format_none.clone(),
            urgent_time: urgent_minutes,
            timezone: resolve_timezone(config.timezone.as_deref())?,
            store_path,
            config_epoch,
        })
    }
}

/// Settings for the battery charge threshold display.
#[derive(Debug, Clone)]
pub struct ThresholdSettings {
    /// e.g. /sys/class/power_supply/BAT0
    pub battery_dir: PathBuf,
    pub format: String,
    pub cache_timeout: Duration,
}

impl ThresholdSettings {
    pub fn from_config(config: &NextEventConfig) -> NextEventResult<Self> {
        let thresholds = &config.thresholds;
        let battery_dir = expand_tilde(&thresholds.sys_battery_path)
            .join(format!("BAT{}", thresholds.battery_id));

        Ok(ThresholdSettings {
            battery_dir,
            format: thresholds.format.clone(),
            cache_timeout: seconds("cache_timeout", config.cache_timeout)?,
        })
    }
}

fn seconds(name: &str, value: u64) -> NextEventResult<Duration> {
    i64::try_from(value)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| NextEventError::Config(format!("{name} is out of range")))
}

fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

fn default_store_path() -> NextEventResult<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .ok_or_else(|| NextEventError::Config("Could not determine cache directory".into()))?;

    Ok(cache_dir.join("nextevent").join("storage.json"))
}

fn resolve_timezone(name: Option<&str>) -> NextEventResult<Tz> {
    match name {
        Some(name) => name
            .parse::<Tz>()
            .map_err(|e| NextEventError::Config(format!("Unknown timezone '{name}': {e}"))),
        None => Ok(system_timezone()),
    }
}

/// The system's IANA timezone, or UTC if it cannot be determined.
pub fn system_timezone() -> Tz {
    let name = match iana_time_zone::get_timezone() {
        Ok(name) => name,
        Err(e) => {
            warn!("Could not determine system timezone, using UTC: {e}");
            return Tz::UTC;
        }
    };

    name.parse().unwrap_or_else(|_| {
        warn!("Unknown system timezone '{name}', using UTC");
        Tz::UTC
    })
}
