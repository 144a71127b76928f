//! Dialog side of the socket transport
//!
//! Connects to the host and pumps bridge envelopes over the socket from a
//! background task.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::bridge::{Envelope, HostBridge};
use crate::error::{CapturerError, Result};
use crate::protocol::{DialogMessage, HostReply};

/// Default connection timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long a closing connection waits for outstanding replies
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Socket connection to a host
pub struct IpcClient {
    bridge: HostBridge,
    task: JoinHandle<Result<()>>,
}

impl IpcClient {
    /// Connect to the host with default timeout
    pub async fn connect(path: &Path) -> Result<Self> {
        Self::connect_with_timeout(path, CONNECT_TIMEOUT).await
    }

    /// Connect to the host with custom timeout
    pub async fn connect_with_timeout(path: &Path, timeout: Duration) -> Result<Self> {
        if !path.exists() {
            return Err(CapturerError::ipc(format!("No host listening at {:?}", path)));
        }

        let stream = tokio::time::timeout(timeout, UnixStream::connect(path))
            .await
            .map_err(|_| CapturerError::ipc("Connection timed out"))?
            .map_err(|e| CapturerError::ipc(format!("Failed to connect to host: {}", e)))?;

        debug!("Connected to host at {:?}", path);

        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(pump(stream, rx));

        Ok(Self {
            bridge: HostBridge::from_sender(tx),
            task,
        })
    }

    /// Bridge for a dialog to use
    pub fn bridge(&self) -> HostBridge {
        self.bridge.clone()
    }

    /// Wait until everything queued has been written
    ///
    /// Call after the dialog finished and dropped its bridge.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.bridge);
        self.task
            .await
            .map_err(|e| CapturerError::ipc(format!("Connection task failed: {}", e)))?
    }
}

/// Move envelopes to the socket and replies back to their requesters
///
/// The host answers requests in order, so replies are matched FIFO. After
/// `closeView` (or once every bridge is gone) the connection stays open until
/// outstanding replies arrived or [`DRAIN_TIMEOUT`] passed.
async fn pump(stream: UnixStream, mut rx: mpsc::UnboundedReceiver<Envelope>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    let mut waiting: VecDeque<oneshot::Sender<HostReply>> = VecDeque::new();

    loop {
        tokio::select! {
            envelope = rx.recv() => {
                let Some(envelope) = envelope else {
                    debug!("All bridges dropped, closing host connection");
                    break;
                };

                let closing = matches!(envelope.message, DialogMessage::CloseView { .. });
                writer
                    .write_all(&envelope.message.to_bytes())
                    .await
                    .map_err(|e| CapturerError::ipc(format!("Failed to send message: {}", e)))?;

                if let Some(reply) = envelope.reply {
                    waiting.push_back(reply);
                }
                if closing {
                    break;
                }
            }
            line = lines.next_line(), if !waiting.is_empty() => {
                let line = line
                    .map_err(|e| CapturerError::ipc(format!("Failed to read reply: {}", e)))?
                    .ok_or_else(|| CapturerError::ipc("Host closed the connection"))?;
                deliver(&mut waiting, &line)?;
            }
        }
    }

    if !waiting.is_empty() {
        debug!("Waiting for {} outstanding host replies", waiting.len());
        let drain = async {
            while !waiting.is_empty() {
                match lines.next_line().await {
                    Ok(Some(line)) => deliver(&mut waiting, &line)?,
                    Ok(None) => break,
                    Err(e) => {
                        return Err(CapturerError::ipc(format!("Failed to read reply: {}", e)));
                    }
                }
            }
            Ok(())
        };
        match tokio::time::timeout(DRAIN_TIMEOUT, drain).await {
            Ok(result) => result?,
            Err(_) => warn!("Timed out waiting for host replies"),
        }
    }

    writer
        .shutdown()
        .await
        .map_err(|e| CapturerError::ipc(format!("Failed to close connection: {}", e)))?;

    if !waiting.is_empty() {
        warn!("{} host replies never arrived", waiting.len());
    }
    Ok(())
}

/// Hand one reply line to the oldest waiting request
fn deliver(waiting: &mut VecDeque<oneshot::Sender<HostReply>>, line: &str) -> Result<()> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    let reply = HostReply::from_bytes(trimmed.as_bytes())?;
    if let Some(tx) = waiting.pop_front() {
        if tx.send(reply).is_err() {
            debug!("Reply arrived after its requester went away");
        }
    }
    Ok(())
}
