//! Configuration file loading and saving
//!
//! Loads user configuration from `~/.config/capturer/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::{DialogSettings, HostSettings};
use crate::error::{CapturerError, Result};
use crate::l10n::Strings;
use crate::protocol::AudioSettings;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Dialog behaviour
    #[serde(default)]
    pub dialog: DialogSettings,

    /// Localized labels
    #[serde(default)]
    pub strings: Strings,

    /// Persisted screen share choices
    #[serde(default)]
    pub screen_share: AudioSettings,

    /// Host endpoint settings
    #[serde(default)]
    pub host: HostSettings,
}

impl ConfigFile {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("capturer").join("config.toml")
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("capturer")
                .join("config.toml")
        } else {
            PathBuf::from("/etc/capturer/config.toml")
        }
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| CapturerError::Config(format!("Failed to read config file: {}", e)))?;

        let config: ConfigFile = toml::from_str(&content)?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration, logging warnings but returning defaults on error
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::default_path())
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CapturerError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)?;

        std::fs::write(&path, content)
            .map_err(|e| CapturerError::Config(format!("Failed to write config file: {}", e)))?;

        info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

/// Generate a sample configuration file
pub fn sample_config() -> String {
    r#"# Capturer Configuration

[dialog]
# Platform used to decide whether system audio is offered:
# auto, windows, linux, macos, other
platform = "auto"

[strings]
# Labels shown in the picker. "entire" and "screen" replace the host's
# "Entire Screen" and "Screen" source names.
entire = "Entire Screen"
screen = "Screen"
sound_system = "Share system audio"
sound_unavailable = "System audio is not available on this platform"
close = "Close"

[screen_share]
# Last state of the master audio switch, updated by the host
audio = false

[host]
# Socket path override (default: $XDG_RUNTIME_DIR/capturer.sock)
# socket = "/run/user/1000/capturer.sock"

# Offer audio even where whole-system capture is not implicit
audio_forced = false
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert_eq!(config.dialog.platform, "auto");
        assert!(!config.screen_share.audio);
        assert!(!config.host.audio_forced);
        assert_eq!(config.strings, Strings::default());
    }

    #[test]
    fn test_sample_config_parses() {
        let sample = sample_config();
        let config: ConfigFile = toml::from_str(&sample).unwrap();
        assert_eq!(config, ConfigFile::default());
    }
}
