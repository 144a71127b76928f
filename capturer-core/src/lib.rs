//! Capturer Core Library
//!
//! Source picker for screen, window and audio capture dialogs.
//!
//! This library provides:
//! - The picker's selection state machine (video pick, audio node toggles)
//! - The audio capability gate driven by the master audio switch
//! - The dialog/host message protocol and its socket transport
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐ getSources       ┌──────────────┐    ┌──────────────┐
//! │    Host    │◀────────────────▶│ Dialog state │───▶│   Surface    │
//! │ (backend)  │ closeView        │  (dispatch)  │◀───│ (UI events)  │
//! └────────────┘                  └──────────────┘    └──────────────┘
//! ```

pub mod bridge;
pub mod config;
pub mod dialog;
pub mod error;
pub mod gate;
pub mod ipc;
pub mod l10n;
pub mod protocol;
pub mod render;
pub mod selection;
pub mod types;

pub use bridge::{HostBackend, HostBridge, HostEndpoint, StaticHost};
pub use config::ConfigFile;
pub use dialog::{Dialog, DialogState, UiEvent};
pub use error::{CapturerError, Result};
pub use protocol::{AudioSettings, CapturePayload, Outcome, SourceList};
pub use types::{AudioNodeId, Image, Platform, VideoSource};
