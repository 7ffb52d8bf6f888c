//! Configuration types for nextevent.

mod file_config;
mod settings;

pub use file_config::{NextEventConfig, ThresholdsConfig, config_epoch};
pub use settings::{FeedSettings, ThresholdSettings, system_timezone};
