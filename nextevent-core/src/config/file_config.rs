//! The on-disk configuration file at ~/.config/nextevent/config.toml

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use config::{Config, File, FileFormat};
use serde::Deserialize;

use crate::error::{NextEventError, NextEventResult};

static DEFAULT_FORMAT: &str = "{title} @ {time}";
static DEFAULT_THRESHOLD_FORMAT: &str = "{start}% → {stop}%";
static DEFAULT_SYS_BATTERY_PATH: &str = "/sys/class/power_supply/";

fn default_cache_timeout() -> u64 {
    60
}

fn default_cache_ics_timeout() -> u64 {
    900
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_urgent_time() -> u64 {
    15
}

fn default_threshold_format() -> String {
    DEFAULT_THRESHOLD_FORMAT.to_string()
}

fn default_sys_battery_path() -> PathBuf {
    PathBuf::from(DEFAULT_SYS_BATTERY_PATH)
}

/// Raw configuration as read from disk.
///
/// Nothing here is validated yet; see [`crate::config::FeedSettings`] and
/// [`crate::config::ThresholdSettings`] for the checked, immutable values the
/// rest of the crate works with.
#[derive(Debug, Clone, Deserialize)]
pub struct NextEventConfig {
    /// URL of the iCalendar feed (http://, https:// or webcal://)
    #[serde(default)]
    pub feed_url: String,

    /// How often the displayed event is recomputed, in seconds
    #[serde(default = "default_cache_timeout")]
    pub cache_timeout: u64,

    /// How often the feed itself is downloaded again, in seconds
    #[serde(default = "default_cache_ics_timeout")]
    pub cache_ics_timeout: u64,

    /// Output template, placeholders `{title}` and `{time}`
    #[serde(default = "default_format", alias = "display_format")]
    pub format: String,

    /// Output when there is no upcoming event
    #[serde(default, alias = "empty_format")]
    pub format_none: String,

    /// Minutes before the event start at which it is flagged urgent
    #[serde(default = "default_urgent_time")]
    pub urgent_time: u64,

    /// IANA timezone used for display, defaults to the system zone
    pub timezone: Option<String>,

    /// Location of the feed cache store
    pub store_path: Option<PathBuf>,

    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

/// `[thresholds]` table for the battery charge threshold display.
#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default)]
    pub battery_id: u32,

    #[serde(default = "default_threshold_format")]
    pub format: String,

    #[serde(default = "default_sys_battery_path")]
    pub sys_battery_path: PathBuf,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        ThresholdsConfig {
            battery_id: 0,
            format: default_threshold_format(),
            sys_battery_path: default_sys_battery_path(),
        }
    }
}

impl NextEventConfig {
    pub fn config_path() -> NextEventResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| NextEventError::Config("Could not determine config directory".into()))?
            .join("nextevent");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config file at `path`. A missing file yields all defaults
    /// (and therefore no feed URL).
    pub fn load(path: &Path) -> NextEventResult<Self> {
        Config::builder()
            .add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(false))
            .build()
            .map_err(|e| NextEventError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| NextEventError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> NextEventResult<()> {
        let contents = format!(
            "\
# nextevent configuration

# iCalendar feed to show the next event from (required):
# feed_url = \"https://example.com/calendar.ics\"

# Recompute the displayed event every N seconds:
# cache_timeout = {}

# Download the feed again every N seconds:
# cache_ics_timeout = {}

# Output format, placeholders {{title}} and {{time}}:
# format = \"{}\"

# Output when there is no upcoming event:
# format_none = \"\"

# Mark the event urgent this many minutes before it starts:
# urgent_time = {}

# Display timezone (defaults to the system timezone):
# timezone = \"Europe/Berlin\"

# [thresholds]
# battery_id = 0
# format = \"{}\"
",
            default_cache_timeout(),
            default_cache_ics_timeout(),
            DEFAULT_FORMAT,
            default_urgent_time(),
            DEFAULT_THRESHOLD_FORMAT,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                NextEventError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| NextEventError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

/// The instant the configuration at `path` was established: the file's
/// modification time, or the current time if it has none.
///
/// Cache entries fetched before this instant were written under a previous
/// configuration and must not be reused.
pub fn config_epoch(path: &Path) -> DateTime<Utc> {
    std::fs::metadata(path)
        .ok()
        .and_then(|m| m.modified().ok())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = NextEventConfig::load(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.feed_url, "");
        assert_eq!(config.cache_timeout, 60);
        assert_eq!(config.cache_ics_timeout, 900);
        assert_eq!(config.format, "{title} @ {time}");
        assert_eq!(config.format_none, "");
        assert_eq!(config.urgent_time, 15);
        assert_eq!(config.thresholds.battery_id, 0);
    }

    #[test]
    fn reads_values_and_option_aliases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
feed_url = "https://example.com/cal.ics"
cache_ics_timeout = 300
display_format = "{title} at {time}"
empty_format = "nothing"
urgent_time = 5

[thresholds]
battery_id = 1
"#,
        )
        .unwrap();

        let config = NextEventConfig::load(&path).unwrap();

        assert_eq!(config.feed_url, "https://example.com/cal.ics");
        assert_eq!(config.cache_ics_timeout, 300);
        assert_eq!(config.format, "{title} at {time}");
        assert_eq!(config.format_none, "nothing");
        assert_eq!(config.urgent_time, 5);
        assert_eq!(config.thresholds.battery_id, 1);
        assert_eq!(config.thresholds.format, "{start}% → {stop}%");
    }

    #[test]
    fn default_config_file_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        NextEventConfig::create_default_config(&path).unwrap();
        let config = NextEventConfig::load(&path).unwrap();

        assert!(config.feed_url.is_empty());
        assert_eq!(config.cache_timeout, 60);
    }

    #[test]
    fn epoch_is_file_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "feed_url = \"x\"").unwrap();

        let mtime: DateTime<Utc> = std::fs::metadata(&path).unwrap().modified().unwrap().into();
        assert_eq!(config_epoch(&path), mtime);
    }
}
