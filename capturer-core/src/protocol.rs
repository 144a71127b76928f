//! Dialog/host wire protocol
//!
//! Messages are newline-terminated JSON objects tagged by `"type"`. The
//! dialog sends [`DialogMessage`]s; the host answers requests with a
//! [`HostReply`]. Notifications (`settingsChanged`, `closeView`) get no reply.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CapturerError;
use crate::types::{AudioNodeId, VideoSource};

/// Media source name understood by the host's capturer
pub const DESKTOP_MEDIA_SOURCE: &str = "desktop";

/// Messages sent from the dialog to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DialogMessage {
    /// Request the list of capturable sources
    GetSources,
    /// Request the persisted audio setting
    GetAudioSettings,
    /// The user flipped the master audio switch
    SettingsChanged {
        #[serde(rename = "screenShareStore")]
        screen_share_store: AudioSettings,
    },
    /// Terminal message carrying the user's decision
    CloseView { outcome: Outcome },
}

impl DialogMessage {
    /// Whether the host answers this message
    pub fn expects_reply(&self) -> bool {
        matches!(self, Self::GetSources | Self::GetAudioSettings)
    }

    /// Serialize message to JSON bytes with newline terminator
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = serde_json::to_vec(self).unwrap_or_default();
        bytes.push(b'\n');
        bytes
    }

    /// Deserialize message from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Replies from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostReply {
    /// Answer to `getSources`; `None` when enumeration failed
    Sources { list: Option<SourceList> },
    /// Answer to `getAudioSettings`
    AudioSettings(AudioSettings),
    /// The host could not handle the request
    Error { message: String },
}

impl HostReply {
    /// Serialize reply to JSON bytes with newline terminator
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = serde_json::to_vec(self).unwrap_or_default();
        bytes.push(b'\n');
        bytes
    }

    /// Deserialize reply from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Create an error reply
    pub fn error(message: impl Into<String>) -> Self {
        HostReply::Error {
            message: message.into(),
        }
    }
}

/// Everything the host enumerated for one dialog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceList {
    /// Screens and windows
    pub sources: Vec<VideoSource>,
    /// Audio was enabled from the host's command line
    #[serde(default)]
    pub audio_forced: bool,
    /// Selectable audio nodes, on platforms without whole-system capture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_nodes: Option<Vec<AudioNodeId>>,
}

impl SourceList {
    /// Create a list of video sources without audio information
    pub fn new(sources: Vec<VideoSource>) -> Self {
        Self {
            sources,
            audio_forced: false,
            audio_nodes: None,
        }
    }

    /// Mark audio as forced available
    pub fn with_audio_forced(mut self, forced: bool) -> Self {
        self.audio_forced = forced;
        self
    }

    /// Offer a list of audio nodes
    pub fn with_audio_nodes(mut self, nodes: Vec<AudioNodeId>) -> Self {
        self.audio_nodes = Some(nodes);
        self
    }

    /// Look up a video source by id
    pub fn find(&self, id: &str) -> Option<&VideoSource> {
        self.sources.iter().find(|source| source.id == id)
    }
}

/// Persisted screen-share audio setting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Audio was enabled last time
    pub audio: bool,
}

/// Terminal result of a dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outcome {
    /// The user picked a source
    Accept(CapturePayload),
    /// The dialog closed without a pick
    Reject(Rejection),
}

impl Outcome {
    /// Rejection carrying a plain reason
    pub fn reason(reason: impl Into<String>) -> Self {
        Self::Reject(Rejection::Reason(reason.into()))
    }

    /// Rejection carrying an error
    pub fn error(err: &CapturerError) -> Self {
        Self::Reject(Rejection::Error {
            message: err.to_string(),
        })
    }

    /// Rejection for an explicit close
    pub fn cancelled() -> Self {
        Self::reason(CapturerError::PermissionDenied.to_string())
    }

    /// Whether the user picked a source
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept(_))
    }

    /// The accept payload, if any
    pub fn payload(&self) -> Option<&CapturePayload> {
        match self {
            Self::Accept(payload) => Some(payload),
            Self::Reject(_) => None,
        }
    }
}

/// Why the dialog closed without a pick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rejection {
    Reason(String),
    Error { message: String },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reason(reason) => write!(f, "{}", reason),
            Self::Error { message } => write!(f, "{}", message),
        }
    }
}

/// Accepted capture request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturePayload {
    /// Video constraint naming the picked source
    pub video: MediaConstraint,
    /// Audio constraint, or off
    pub audio: AudioConstraint,
    /// `None` when no node list was offered, otherwise the picked nodes
    pub selected_audio_nodes: Option<Vec<AudioNodeId>>,
}

impl CapturePayload {
    /// Id of the picked video source
    pub fn source_id(&self) -> Option<&str> {
        self.video.mandatory.chrome_media_source_id.as_deref()
    }
}

/// getUserMedia-style mandatory constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConstraint {
    pub mandatory: Mandatory,
}

impl MediaConstraint {
    /// Desktop capture, optionally pinned to one source
    pub fn desktop(source_id: Option<String>) -> Self {
        Self {
            mandatory: Mandatory {
                chrome_media_source: DESKTOP_MEDIA_SOURCE.to_string(),
                chrome_media_source_id: source_id,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mandatory {
    pub chrome_media_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_media_source_id: Option<String>,
}

/// Audio part of an accepted request: `false` or a desktop constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioConstraint {
    Off,
    Desktop,
}

impl AudioConstraint {
    pub fn is_on(&self) -> bool {
        matches!(self, Self::Desktop)
    }
}

impl Serialize for AudioConstraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Off => serializer.serialize_bool(false),
            Self::Desktop => MediaConstraint::desktop(None).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for AudioConstraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Constraint(MediaConstraint),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => Ok(Self::Off),
            Raw::Flag(true) => Ok(Self::Desktop),
            Raw::Constraint(constraint)
                if constraint.mandatory.chrome_media_source == DESKTOP_MEDIA_SOURCE =>
            {
                Ok(Self::Desktop)
            }
            Raw::Constraint(constraint) => Err(serde::de::Error::custom(format!(
                "unsupported audio media source {:?}",
                constraint.mandatory.chrome_media_source
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization() {
        let msg = DialogMessage::GetSources;
        let bytes = msg.to_bytes();
        let parsed = DialogMessage::from_bytes(&bytes[..bytes.len() - 1]).unwrap();
        assert_eq!(parsed, DialogMessage::GetSources);
    }

    #[test]
    fn test_audio_off_is_false() {
        let json = serde_json::to_string(&AudioConstraint::Off).unwrap();
        assert_eq!(json, "false");
    }

    #[test]
    fn test_audio_on_is_desktop_constraint() {
        let json = serde_json::to_string(&AudioConstraint::Desktop).unwrap();
        assert_eq!(json, r#"{"mandatory":{"chromeMediaSource":"desktop"}}"#);
    }

    #[test]
    fn test_audio_constraint_checks_media_source() {
        let desktop: AudioConstraint =
            serde_json::from_str(r#"{"mandatory":{"chromeMediaSource":"desktop"}}"#).unwrap();
        assert_eq!(desktop, AudioConstraint::Desktop);

        let tab = serde_json::from_str::<AudioConstraint>(
            r#"{"mandatory":{"chromeMediaSource":"tab"}}"#,
        );
        assert!(tab.is_err());
    }

    #[test]
    fn test_only_requests_expect_reply() {
        assert!(DialogMessage::GetSources.expects_reply());
        assert!(DialogMessage::GetAudioSettings.expects_reply());
        assert!(!DialogMessage::SettingsChanged {
            screen_share_store: AudioSettings { audio: true }
        }
        .expects_reply());
        assert!(!DialogMessage::CloseView {
            outcome: Outcome::cancelled()
        }
        .expects_reply());
    }
}
