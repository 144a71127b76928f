//! Host-side request handling

use tracing::{debug, warn};

use crate::error::{CapturerError, Result};
use crate::protocol::{AudioSettings, DialogMessage, HostReply, Outcome, SourceList};

/// What a host provides to a picker dialog
pub trait HostBackend {
    /// Enumerate sources; `None` when enumeration failed
    fn sources(&mut self) -> Option<SourceList>;

    /// Read the persisted audio setting
    fn audio_settings(&mut self) -> Result<AudioSettings>;

    /// Persist a changed audio setting
    fn settings_changed(&mut self, settings: AudioSettings);

    /// Receive the dialog's terminal outcome
    fn close_view(&mut self, outcome: &Outcome);
}

/// How a message was handled
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Send this back to the dialog
    Reply(HostReply),
    /// Notification consumed
    Ack,
    /// Dialog finished
    Closed(Outcome),
}

/// Route one dialog message to a backend
pub fn dispatch<B: HostBackend + ?Sized>(backend: &mut B, message: DialogMessage) -> Dispatch {
    debug!("<- dialog {:?}", message);
    match message {
        DialogMessage::GetSources => Dispatch::Reply(HostReply::Sources {
            list: backend.sources(),
        }),
        DialogMessage::GetAudioSettings => match backend.audio_settings() {
            Ok(settings) => Dispatch::Reply(HostReply::AudioSettings(settings)),
            Err(e) => {
                warn!("Failed to read audio settings: {}", e);
                Dispatch::Reply(HostReply::error(e.to_string()))
            }
        },
        DialogMessage::SettingsChanged { screen_share_store } => {
            backend.settings_changed(screen_share_store);
            Dispatch::Ack
        }
        DialogMessage::CloseView { outcome } => {
            backend.close_view(&outcome);
            Dispatch::Closed(outcome)
        }
    }
}

/// Host backed by fixed data, recording what the dialog sends
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    list: Option<SourceList>,
    settings: Option<AudioSettings>,
    changes: Vec<AudioSettings>,
    outcome: Option<Outcome>,
}

impl StaticHost {
    /// Host offering `list`; `None` simulates failed enumeration
    pub fn new(list: Option<SourceList>) -> Self {
        Self {
            list,
            settings: Some(AudioSettings::default()),
            changes: Vec::new(),
            outcome: None,
        }
    }

    /// Set the persisted audio setting; `None` makes the fetch fail
    pub fn with_settings(mut self, settings: Option<AudioSettings>) -> Self {
        self.settings = settings;
        self
    }

    /// Current persisted setting
    pub fn settings(&self) -> Option<AudioSettings> {
        self.settings
    }

    /// Every settingsChanged notification, in order
    pub fn changes(&self) -> &[AudioSettings] {
        &self.changes
    }

    /// The outcome, once received
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }
}

impl HostBackend for StaticHost {
    fn sources(&mut self) -> Option<SourceList> {
        self.list.clone()
    }

    fn audio_settings(&mut self) -> Result<AudioSettings> {
        self.settings
            .ok_or_else(|| CapturerError::config("No stored screen share settings"))
    }

    fn settings_changed(&mut self, settings: AudioSettings) {
        self.changes.push(settings);
        self.settings = Some(settings);
    }

    fn close_view(&mut self, outcome: &Outcome) {
        self.outcome = Some(outcome.clone());
    }
}
