//! Config command - manage the picker's config file

use anyhow::{Context, Result};
use capturer_core::config::{sample_config, ConfigFile};
use clap::{Args, Subcommand};

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print where the config file lives
    Path,

    /// Print the effective configuration
    Show,

    /// Write the default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the sample configuration
    Sample,
}

/// Run config subcommand
pub async fn config(args: ConfigArgs) -> Result<()> {
    let path = ConfigFile::default_path();

    match args.command {
        ConfigCommand::Path => {
            let state = if path.exists() { "exists" } else { "missing" };
            println!("{} ({})", path.display(), state);
        }
        ConfigCommand::Show => {
            let (config, source) = if path.exists() {
                let config = ConfigFile::load_from(path.clone())
                    .with_context(|| format!("Failed to load {}", path.display()))?;
                (config, path.display().to_string())
            } else {
                (ConfigFile::default(), "built-in defaults".to_string())
            };

            println!("# {}\n", source);
            print!("{}", toml::to_string_pretty(&config).context("Failed to render config")?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                println!("{} already exists, use --force to overwrite", path.display());
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
            std::fs::write(&path, sample_config()).context("Failed to write config file")?;
            println!("Created {}", path.display());
        }
        ConfigCommand::Sample => {
            print!("{}", sample_config());
        }
    }

    Ok(())
}
