//! Battery charge thresholds, read from sysfs.

use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ThresholdSettings;
use crate::error::NextEventResult;
use crate::render::format_template;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholds {
    pub start: String,
    pub stop: String,
}

/// Status bar output for the thresholds block. It is never urgent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThresholdsPayload {
    pub full_text: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub cached_until: DateTime<Utc>,
}

pub fn read_thresholds(battery_dir: &Path) -> NextEventResult<Thresholds> {
    Ok(Thresholds {
        start: read_prop(battery_dir, "charge_start_threshold")?,
        stop: read_prop(battery_dir, "charge_stop_threshold")?,
    })
}

pub fn render_thresholds(
    settings: &ThresholdSettings,
    now: DateTime<Utc>,
) -> NextEventResult<ThresholdsPayload> {
    let thresholds = read_thresholds(&settings.battery_dir)?;

    Ok(ThresholdsPayload {
        full_text: format_template(
            &settings.format,
            &[("start", thresholds.start.as_str()), ("stop", thresholds.stop.as_str())],
        ),
        cached_until: now + settings.cache_timeout,
    })
}

// First line of the file
fn read_prop(dir: &Path, name: &str) -> NextEventResult<String> {
    let path = dir.join(name);
    let content = std::fs::read_to_string(&path)?;

    content.lines().next().map(str::to_string).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} is empty", path.display()),
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn battery_dir(start: &str, stop: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("charge_start_threshold"), start).unwrap();
        std::fs::write(dir.path().join("charge_stop_threshold"), stop).unwrap();
        dir
    }

    #[test]
    fn reads_first_lines() {
        let dir = battery_dir("75\n", "80\nignored\n");

        let thresholds = read_thresholds(dir.path()).unwrap();
        assert_eq!(
            thresholds,
            Thresholds {
                start: "75".into(),
                stop: "80".into(),
            }
        );
    }

    #[test]
    fn renders_with_template() {
        let dir = battery_dir("40\n", "90\n");
        let settings = ThresholdSettings {
            battery_dir: dir.path().to_path_buf(),
            format: "{start}% → {stop}%".to_string(),
            cache_timeout: Duration::seconds(60),
        };
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();

        let payload = render_thresholds(&settings, now).unwrap();

        assert_eq!(payload.full_text, "40% → 90%");
        assert_eq!(payload.cached_until, now + Duration::seconds(60));
    }

    #[test]
    fn payload_has_no_urgency_field() {
        let dir = battery_dir("40\n", "90\n");
        let settings = ThresholdSettings {
            battery_dir: dir.path().to_path_buf(),
            format: "{start}-{stop}".to_string(),
            cache_timeout: Duration::seconds(60),
        };
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();

        let json = serde_json::to_value(render_thresholds(&settings, now).unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "full_text": "40-90",
                "cached_until": now.timestamp() + 60,
            })
        );
    }

    #[test]
    fn missing_battery_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_thresholds(&dir.path().join("BAT9")).is_err());
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = battery_dir("", "80\n");
        assert!(read_thresholds(dir.path()).is_err());
    }
}
