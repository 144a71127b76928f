//! Host side of the socket transport
//!
//! Listens on a Unix socket and serves picker dialogs from a
//! [`HostBackend`], one connection at a time.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, info, warn};

use crate::bridge::{dispatch, Dispatch, HostBackend};
use crate::error::{CapturerError, Result};
use crate::protocol::{DialogMessage, Outcome};

/// Socket server answering dialog requests
pub struct HostServer {
    /// Path to the Unix socket
    socket_path: PathBuf,
    /// Listener for incoming connections
    listener: Option<UnixListener>,
}

impl HostServer {
    /// Create a server on the default socket path
    pub fn new() -> Self {
        Self::with_path(super::socket_path())
    }

    /// Create a server on a specific socket path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            socket_path: path,
            listener: None,
        }
    }

    /// Path the server binds to
    pub fn path(&self) -> &PathBuf {
        &self.socket_path
    }

    /// Start listening for connections
    pub fn start(&mut self) -> Result<()> {
        // Remove existing socket if present
        if self.socket_path.exists() {
            std::fs::remove_file(&self.socket_path).map_err(|e| {
                CapturerError::ipc(format!("Failed to remove old socket: {}", e))
            })?;
        }

        if let Some(parent) = self.socket_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CapturerError::ipc(format!("Failed to create socket directory: {}", e))
                })?;
            }
        }

        let listener = UnixListener::bind(&self.socket_path).map_err(|e| {
            CapturerError::ipc(format!(
                "Failed to bind socket at {:?}: {}",
                self.socket_path, e
            ))
        })?;

        // Owner-only: dialogs run as the same user
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&self.socket_path, permissions).map_err(|e| {
            warn!("Failed to set socket permissions: {}", e);
            CapturerError::ipc(format!("Failed to set socket permissions: {}", e))
        })?;

        info!("Host listening on {:?}", self.socket_path);
        self.listener = Some(listener);

        Ok(())
    }

    /// Accept one dialog connection and serve it to the end
    ///
    /// Returns the dialog's outcome, or `None` if it disconnected without one.
    pub async fn accept_one<B: HostBackend>(&self, backend: &mut B) -> Result<Option<Outcome>> {
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| CapturerError::ipc("Server not started"))?;

        let (stream, _addr) = listener
            .accept()
            .await
            .map_err(|e| CapturerError::ipc(format!("Failed to accept connection: {}", e)))?;

        debug!("Dialog connected");
        Ok(self.handle_connection(stream, backend).await)
    }

    /// Serve dialogs until one reports an outcome
    pub async fn serve<B: HostBackend>(&self, backend: &mut B) -> Result<Outcome> {
        loop {
            if let Some(outcome) = self.accept_one(backend).await? {
                return Ok(outcome);
            }
        }
    }

    async fn handle_connection<B: HostBackend>(
        &self,
        stream: UnixStream,
        backend: &mut B,
    ) -> Option<Outcome> {
        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);
        let mut line = String::new();

        loop {
            line.clear();
            match reader.read_line(&mut line).await {
                Ok(0) => {
                    debug!("Dialog disconnected");
                    return None;
                }
                Ok(_) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    // Replies are matched by order, so an unreadable line gets
                    // no reply: it may have been a notification.
                    let message = match DialogMessage::from_bytes(trimmed.as_bytes()) {
                        Ok(message) => message,
                        Err(e) => {
                            warn!("Dropping invalid dialog message: {}", e);
                            continue;
                        }
                    };

                    match dispatch(backend, message) {
                        Dispatch::Reply(reply) => {
                            // The dialog may have closed its read side already;
                            // its closeView can still be buffered behind this.
                            if let Err(e) = writer.write_all(&reply.to_bytes()).await {
                                warn!("Failed to send reply: {}", e);
                            }
                        }
                        Dispatch::Ack => {}
                        Dispatch::Closed(outcome) => return Some(outcome),
                    }
                }
                Err(e) => {
                    error!("Error reading from dialog: {}", e);
                    return None;
                }
            }
        }
    }

    /// Clean up the socket file
    pub fn cleanup(&self) {
        if self.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.socket_path) {
                warn!("Failed to remove socket file: {}", e);
            } else {
                debug!("Removed socket file {:?}", self.socket_path);
            }
        }
    }
}

impl Default for HostServer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for HostServer {
    fn drop(&mut self) {
        self.cleanup();
    }
}
