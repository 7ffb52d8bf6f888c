pub mod config;
pub mod next;
pub mod thresholds;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write a payload to stdout: just the text, or the whole payload as JSON.
fn print_payload<P: Serialize>(payload: &P, full_text: &str, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string(payload).context("Failed to serialize output")?;
        println!("{out}");
    } else {
        println!("{full_text}");
    }

    Ok(())
}
