//! Picker dialog driver
//!
//! Runs one dialog from source fetch to outcome on a single task:
//!
//! ```text
//! getSources ──▶ gate + render ──▶ ┌ UI events ─────────┐ ──▶ closeView
//!                                  └ getAudioSettings ──┘
//! ```
//!
//! Every failure along the way ends in a rejection outcome; the only error
//! returned to the caller is a lost host connection.

mod state;

pub use state::{DialogState, Effect, Event, UiEvent};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::bridge::{HostBridge, PendingReply};
use crate::error::{CapturerError, Result};
use crate::l10n::Strings;
use crate::protocol::{AudioSettings, Outcome};
use crate::render::{self, Anchor, Surface};
use crate::types::Platform;

/// One picker dialog bound to a host and a surface
pub struct Dialog<S: Surface> {
    bridge: HostBridge,
    surface: S,
    platform: Platform,
    strings: Strings,
}

impl<S: Surface> Dialog<S> {
    /// Create a dialog for the current platform with default strings
    pub fn new(bridge: HostBridge, surface: S) -> Self {
        Self {
            bridge,
            surface,
            platform: Platform::current(),
            strings: Strings::default(),
        }
    }

    /// Override the platform used for the audio capability decision
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Use a localized string table
    pub fn with_strings(mut self, strings: Strings) -> Self {
        self.strings = strings;
        self
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Give back the surface after the dialog finished
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Run the dialog until it has reported its outcome
    ///
    /// `events` carries user interaction; if it closes before a pick, the
    /// dialog counts as cancelled.
    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<UiEvent>) -> Result<Outcome> {
        let list = match self.bridge.request_sources().await {
            Ok(Some(list)) => list,
            Ok(None) => return self.finish(Outcome::error(&CapturerError::EnumerationFailure)),
            Err(e) if e.is_disconnect() => return Err(e),
            Err(e) => return self.finish(Outcome::error(&e)),
        };

        let has_switch = self.surface.has_anchor(Anchor::MasterSwitch);
        let mut state = DialogState::new(list, self.platform, has_switch, self.strings.clone());

        let mut pending = match self.wire(&mut state) {
            Ok(pending) => pending,
            Err(e) if e.is_disconnect() => return Err(e),
            Err(e) => return self.finish(Outcome::error(&e)),
        };

        loop {
            let event = tokio::select! {
                settings = settings_ready(&mut pending) => {
                    pending = None;
                    if let Err(e) = &settings {
                        warn!("Audio settings unavailable, keeping default: {}", e);
                    }
                    Event::SettingsResolved(settings.ok())
                }
                event = events.recv() => match event {
                    Some(event) => Event::Ui(event),
                    None => {
                        debug!("UI event stream ended, treating as close");
                        Event::Ui(UiEvent::CloseClicked)
                    }
                },
            };

            let effects = match state.dispatch(event) {
                Ok(effects) => effects,
                Err(e) => state.close(Outcome::error(&e)),
            };

            if let Some(outcome) = self.apply(effects)? {
                return Ok(outcome);
            }
        }
    }

    /// Configure controls and render both lists
    ///
    /// Returns the in-flight settings request when audio is available.
    fn wire(&mut self, state: &mut DialogState) -> Result<Option<PendingReply<AudioSettings>>> {
        self.surface.update_master_switch(&state.switch_view());
        self.surface.set_close_title(&state.strings().close);

        let pending = if state.needs_settings() {
            Some(self.bridge.request_audio_settings()?)
        } else {
            None
        };

        render::render_sources(&mut self.surface, &state.sources().sources, state.strings())?;

        if let Some(nodes) = state.renderable_nodes().map(<[_]>::to_vec) {
            let enablement = state.attach_nodes(&nodes);
            if !render::render_audio_nodes(&mut self.surface, &nodes, enablement) {
                warn!(
                    "No '{}' container, {} audio nodes not shown",
                    Anchor::AudioList.id(),
                    nodes.len()
                );
            }
        }

        Ok(pending)
    }

    /// Carry out effects; returns the outcome once it was sent
    fn apply(&mut self, effects: Vec<Effect>) -> Result<Option<Outcome>> {
        for effect in effects {
            match effect {
                Effect::PushAudioSetting(enabled) => {
                    self.bridge.push_audio_setting_changed(enabled)?
                }
                Effect::UpdateSwitch(view) => self.surface.update_master_switch(&view),
                Effect::UpdateNode {
                    id,
                    enablement,
                    selected,
                } => self.surface.update_audio_node(&id, enablement, selected),
                Effect::Emit(outcome) => return self.finish(outcome).map(Some),
            }
        }
        Ok(None)
    }

    fn finish(&self, outcome: Outcome) -> Result<Outcome> {
        self.bridge.emit_outcome(outcome.clone())?;
        Ok(outcome)
    }
}

/// Resolve the pending settings request, or never if there is none
async fn settings_ready(
    pending: &mut Option<PendingReply<AudioSettings>>,
) -> Result<AudioSettings> {
    match pending {
        Some(reply) => reply.await,
        None => std::future::pending().await,
    }
}
