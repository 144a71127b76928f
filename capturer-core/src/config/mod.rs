//! Configuration types for Capturer
//!
//! Provides dialog settings, host endpoint settings and the on-disk config
//! file.

mod file;

pub use file::{sample_config, ConfigFile};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{CapturerError, Result};
use crate::types::Platform;

/// Dialog behaviour settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogSettings {
    /// Platform override ("auto" detects at runtime)
    #[serde(default = "default_platform")]
    pub platform: String,
}

fn default_platform() -> String {
    "auto".to_string()
}

impl Default for DialogSettings {
    fn default() -> Self {
        Self {
            platform: default_platform(),
        }
    }
}

impl DialogSettings {
    /// Resolve the configured platform
    pub fn platform(&self) -> Result<Platform> {
        self.platform.parse().map_err(CapturerError::Config)
    }
}

/// Host endpoint settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSettings {
    /// Socket path override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<PathBuf>,

    /// Report audio as forced available to dialogs
    #[serde(default)]
    pub audio_forced: bool,
}

impl HostSettings {
    /// Socket the host listens on
    pub fn socket_path(&self) -> PathBuf {
        self.socket.clone().unwrap_or_else(crate::ipc::socket_path)
    }
}
