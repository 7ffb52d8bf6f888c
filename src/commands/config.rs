use std::path::Path;

use anyhow::Result;
use nextevent_core::config::{FeedSettings, NextEventConfig, config_epoch};

pub fn run(config_path: &Path) -> Result<()> {
    println!("{}", config_path.display());

    let config = NextEventConfig::load(config_path)?;
    if let Err(e) = FeedSettings::from_config(&config, config_epoch(config_path)) {
        log::warn!("{} is not usable yet: {e}", config_path.display());
    }

    Ok(())
}
