mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nextevent_core::config::NextEventConfig;

#[derive(Parser)]
#[command(name = "nextevent")]
#[command(version, about = "Show the next event of a remote iCalendar feed in your status bar")]
struct Cli {
    /// Config file (defaults to ~/.config/nextevent/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the next upcoming event
    Next {
        /// Print the full status bar payload as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the battery charge thresholds
    Thresholds {
        /// Print the full status bar payload as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the config file location, creating a default one if missing
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = resolve_config_path(cli.config)?;

    match cli.command {
        Commands::Next { json } => commands::next::run(&config_path, json).await,
        Commands::Thresholds { json } => commands::thresholds::run(&config_path, json),
        Commands::Config => commands::config::run(&config_path),
    }
}

/// Logs go to stderr; stdout is reserved for the status bar text.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let path = NextEventConfig::config_path()?;
    if !path.exists() {
        NextEventConfig::create_default_config(&path)?;
        log::info!("Created default config at {}", path.display());
    }

    Ok(path)
}
