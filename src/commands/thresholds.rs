use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use nextevent_core::config::{NextEventConfig, ThresholdSettings};
use nextevent_core::thresholds::render_thresholds;

use super::print_payload;

pub fn run(config_path: &Path, json: bool) -> Result<()> {
    let config = NextEventConfig::load(config_path)?;
    let settings = ThresholdSettings::from_config(&config)?;

    let payload = render_thresholds(&settings, Utc::now()).with_context(|| {
        format!(
            "Could not read charge thresholds from {}",
            settings.battery_dir.display()
        )
    })?;

    print_payload(&payload, &payload.full_text, json)
}
