//! Pick command - run the picker dialog in the terminal

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use capturer_core::config::ConfigFile;
use capturer_core::ipc::IpcClient;
use capturer_core::protocol::Outcome;
use capturer_core::types::Platform;
use capturer_core::{Dialog, UiEvent};
use clap::Args;
use tokio::sync::mpsc;
use tracing::debug;

use super::terminal::TerminalSurface;

/// Arguments for the pick command
#[derive(Args)]
pub struct PickArgs {
    /// Socket path of the host endpoint
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Platform whose audio rules apply (windows, linux, macos, auto)
    #[arg(long)]
    platform: Option<Platform>,
}

/// Forward stdin lines as UI events until EOF or the dialog goes away
fn spawn_input_reader(surface: TerminalSurface, tx: mpsc::UnboundedSender<UiEvent>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match surface.parse_command(&line) {
                Some(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                None => println!("?  v <n> | a <n> | s | q"),
            }
        }
        debug!("Input reader finished");
    });
}

/// Run the picker dialog against a host endpoint
pub async fn pick(args: PickArgs) -> Result<()> {
    let config = ConfigFile::load_or_default();
    let platform = match args.platform {
        Some(platform) => platform,
        None => config.dialog.platform()?,
    };
    let socket = args.socket.unwrap_or_else(|| config.host.socket_path());

    let client = IpcClient::connect(&socket)
        .await
        .with_context(|| format!("Is 'capturer host' running on {}?", socket.display()))?;

    println!("Capturer - Pick ({})\n", platform);

    let surface = TerminalSurface::new();
    let (tx, rx) = mpsc::unbounded_channel();
    spawn_input_reader(surface.clone(), tx);

    let mut dialog = Dialog::new(client.bridge(), surface)
        .with_platform(platform)
        .with_strings(config.strings);
    let outcome = dialog.run(rx).await?;
    drop(dialog);
    client.shutdown().await.context("Failed to flush the outcome")?;

    println!();
    match &outcome {
        Outcome::Accept(payload) => {
            println!("Sharing {}", payload.source_id().unwrap_or("?"));
            if let Some(nodes) = &payload.selected_audio_nodes {
                println!("Audio nodes: {}", nodes.join(", "));
            }
        }
        Outcome::Reject(reason) => println!("Closed: {}", reason),
    }

    Ok(())
}
