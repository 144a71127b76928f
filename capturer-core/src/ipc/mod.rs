//! Socket transport between dialog and host
//!
//! The host listens on a Unix socket; a dialog process connects, sends
//! newline-delimited [`DialogMessage`](crate::protocol::DialogMessage)s and
//! reads [`HostReply`](crate::protocol::HostReply)s back in request order.

mod client;
mod server;

pub use client::IpcClient;
pub use server::HostServer;

use std::path::PathBuf;

/// Get the IPC socket path
///
/// Uses XDG_RUNTIME_DIR if available, otherwise /tmp
pub fn socket_path() -> PathBuf {
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(runtime_dir).join("capturer.sock")
    } else {
        // SAFETY: libc::getuid() is a simple syscall that returns the real user ID.
        // It has no preconditions and cannot fail (always returns a valid uid_t).
        let uid = unsafe { libc::getuid() };
        PathBuf::from(format!("/tmp/capturer-{}.sock", uid))
    }
}
