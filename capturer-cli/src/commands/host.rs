//! Host command - serve sources to picker dialogs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use capturer_core::bridge::HostBackend;
use capturer_core::config::ConfigFile;
use capturer_core::ipc::HostServer;
use capturer_core::protocol::{AudioSettings, Outcome, SourceList};
use capturer_core::types::VideoSource;
use clap::Args;
use tokio::signal;
use tracing::{info, warn};

/// Arguments for the host command
#[derive(Args)]
pub struct HostArgs {
    /// Source list fixture (TOML or JSON, same keys as the getSources reply)
    #[arg(short, long)]
    sources: Option<PathBuf>,

    /// Socket path (default: config [host] socket, then $XDG_RUNTIME_DIR/capturer.sock)
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Answer getSources with null, as if enumeration failed
    #[arg(long)]
    fail_enumeration: bool,

    /// Keep serving dialogs after the first outcome
    #[arg(long)]
    keep_running: bool,
}

/// Host backed by a fixture, persisting the audio switch in the config file
struct FixtureHost {
    list: Option<SourceList>,
    config: ConfigFile,
    config_path: PathBuf,
}

impl HostBackend for FixtureHost {
    fn sources(&mut self) -> Option<SourceList> {
        self.list.clone()
    }

    fn audio_settings(&mut self) -> capturer_core::Result<AudioSettings> {
        Ok(self.config.screen_share)
    }

    fn settings_changed(&mut self, settings: AudioSettings) {
        info!("Persisting screen share audio = {}", settings.audio);
        self.config.screen_share = settings;
        if let Err(e) = self.config.save_to(self.config_path.clone()) {
            warn!("Failed to persist audio setting: {}", e);
        }
    }

    fn close_view(&mut self, outcome: &Outcome) {
        match serde_json::to_string_pretty(outcome) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!("Failed to print outcome: {}", e),
        }
    }
}

/// Load a source list fixture
fn load_fixture(path: &Path) -> Result<SourceList> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read source fixture {}", path.display()))?;

    let list = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content).context("Failed to parse JSON source fixture")?
    } else {
        toml::from_str(&content).context("Failed to parse TOML source fixture")?
    };
    Ok(list)
}

/// Sources offered when no fixture is given
fn demo_sources() -> SourceList {
    SourceList::new(vec![
        VideoSource::new("screen:0:0", "Entire Screen"),
        VideoSource::new("screen:1:0", "Screen 2"),
    ])
}

/// Serve picker dialogs
pub async fn host(args: HostArgs) -> Result<()> {
    let config_path = ConfigFile::default_path();
    let config = ConfigFile::load_from(config_path.clone()).context("Failed to load config")?;

    let list = if args.fail_enumeration {
        None
    } else {
        let mut list = match &args.sources {
            Some(path) => load_fixture(path)?,
            None => demo_sources(),
        };
        list.audio_forced |= config.host.audio_forced;
        Some(list)
    };

    let socket = args
        .socket
        .clone()
        .unwrap_or_else(|| config.host.socket_path());

    let mut server = HostServer::with_path(socket);
    server.start().context("Failed to start host endpoint")?;

    println!("Capturer - Host\n");
    match &list {
        Some(list) => println!(
            "Offering {} sources ({} audio nodes) on {}",
            list.sources.len(),
            list.audio_nodes.as_ref().map_or(0, Vec::len),
            server.path().display()
        ),
        None => println!(
            "Simulating failed enumeration on {}",
            server.path().display()
        ),
    }
    println!("Run 'capturer pick' to open a dialog. Press Ctrl+C to stop.\n");

    let mut backend = FixtureHost {
        list,
        config,
        config_path,
    };

    let serve = async {
        loop {
            let outcome = server.serve(&mut backend).await?;
            match &outcome {
                Outcome::Accept(payload) => info!("Dialog picked {:?}", payload.source_id()),
                Outcome::Reject(reason) => info!("Dialog closed: {}", reason),
            }
            if !args.keep_running {
                return Ok::<_, anyhow::Error>(());
            }
        }
    };

    tokio::select! {
        result = serve => result?,
        _ = signal::ctrl_c() => println!("\nReceived interrupt signal..."),
    }

    server.cleanup();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_fixture_keys() {
        let list: SourceList = toml::from_str(
            r#"
audioForced = true
audioNodes = ["alsa_output.monitor"]

[[sources]]
id = "window:7:0"
name = "Editor"
appIcon = "data:image/png;base64,AA=="
"#,
        )
        .unwrap();
        assert!(list.audio_forced);
        assert_eq!(list.sources[0].id, "window:7:0");
        assert!(list.sources[0].app_icon.is_some());
    }

    #[test]
    fn test_demo_sources_have_entire_screen() {
        assert!(demo_sources().find("screen:0:0").is_some());
    }
}
