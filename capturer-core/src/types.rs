//! Core types for Capturer
//!
//! These types describe what the host offers to the picker dialog.

use serde::{Deserialize, Serialize};

/// Identifier of a host-enumerated audio node
pub type AudioNodeId = String;

/// Encoded image as handed over by the host (usually a `data:` URL)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Image(String);

impl Image {
    /// Wrap an already encoded image
    pub fn new(data_url: impl Into<String>) -> Self {
        Self(data_url.into())
    }

    /// Build a data URL from a MIME type and base64 payload
    pub fn from_base64(mime: &str, payload: &str) -> Self {
        Self(format!("data:{};base64,{}", mime, payload))
    }

    /// The image as a data URL
    pub fn to_data_url(&self) -> &str {
        &self.0
    }

    /// True when the host sent no image data
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A capturable screen or window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSource {
    /// Opaque source identifier (e.g. "screen:0:0", "window:1234:0")
    pub id: String,
    /// Raw, untranslated name
    pub name: String,
    /// Preview of the source
    #[serde(default)]
    pub thumbnail: Image,
    /// Icon of the owning application, windows only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_icon: Option<Image>,
}

impl VideoSource {
    /// Create a new video source without images
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            thumbnail: Image::default(),
            app_icon: None,
        }
    }

    /// Set the thumbnail
    pub fn with_thumbnail(mut self, thumbnail: Image) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    /// Set the application icon
    pub fn with_app_icon(mut self, icon: Image) -> Self {
        self.app_icon = Some(icon);
        self
    }
}

impl std::fmt::Display for VideoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.id, self.name)
    }
}

/// Platform the dialog runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    Other,
}

impl Platform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }

    /// Whether whole-system audio is always capturable here
    pub fn has_system_audio(&self) -> bool {
        matches!(self, Self::Windows)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Windows => write!(f, "windows"),
            Self::Linux => write!(f, "linux"),
            Self::MacOs => write!(f, "macos"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" | "win32" => Ok(Self::Windows),
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" => Ok(Self::MacOs),
            "other" => Ok(Self::Other),
            "auto" => Ok(Self::current()),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_windows_has_system_audio() {
        assert!(Platform::Windows.has_system_audio());
        assert!(!Platform::Linux.has_system_audio());
        assert!(!Platform::MacOs.has_system_audio());
        assert!(!Platform::Other.has_system_audio());
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("win32".parse::<Platform>().ok(), Some(Platform::Windows));
        assert_eq!("Linux".parse::<Platform>().ok(), Some(Platform::Linux));
        assert_eq!("auto".parse::<Platform>().ok(), Some(Platform::current()));
        assert!("beos".parse::<Platform>().is_err());
    }

    #[test]
    fn test_video_source_wire_names() {
        let source = VideoSource::new("window:42:0", "Terminal")
            .with_app_icon(Image::from_base64("image/png", "AAAA"));
        let json = serde_json::to_string(&source).unwrap();
        assert!(json.contains("\"appIcon\":\"data:image/png;base64,AAAA\""));
    }
}
