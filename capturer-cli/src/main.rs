//! Capturer CLI
//!
//! Screen, window and audio source picker for desktop capture dialogs.
//!
//! # Usage
//!
//! ```bash
//! # Serve a host endpoint with sources from a fixture
//! capturer host --sources sources.toml
//!
//! # In another terminal, run the picker dialog against it
//! capturer pick
//!
//! # Manage the config file
//! capturer config init
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Capturer - pick what to share
#[derive(Parser)]
#[command(name = "capturer")]
#[command(author = "GhostKellz")]
#[command(version)]
#[command(about = "Screen, window and audio source picker for capture dialogs", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve sources to picker dialogs and collect their outcome
    Host(commands::HostArgs),

    /// Run the picker dialog in this terminal
    Pick(commands::PickArgs),

    /// Manage the configuration file
    Config(commands::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("capturer_core={}", level).parse()?)
                .add_directive(format!("capturer={}", level).parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Host(args) => commands::host(args).await?,
        Commands::Pick(args) => commands::pick(args).await?,
        Commands::Config(args) => commands::config(args).await?,
    }

    Ok(())
}
