//! Per-dialog state and its transitions
//!
//! Every external event (host reply or user click) is applied with
//! [`DialogState::dispatch`], which returns the effects the driver must carry
//! out. Nothing in here touches the host or the surface.

use tracing::{debug, info, warn};

use crate::error::{CapturerError, Result};
use crate::gate::{AudioCapability, AudioGate, NodeUpdate};
use crate::l10n::Strings;
use crate::protocol::{
    AudioConstraint, AudioSettings, CapturePayload, MediaConstraint, Outcome, SourceList,
};
use crate::render::{Enablement, SwitchView};
use crate::selection::Selection;
use crate::types::{AudioNodeId, Platform};

/// User interaction delivered by the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A video source control was clicked
    VideoClicked(String),
    /// An audio node control was clicked
    AudioNodeClicked(AudioNodeId),
    /// The master audio switch changed
    MasterToggled(bool),
    /// The close button was clicked
    CloseClicked,
}

/// Anything the dialog reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Ui(UiEvent),
    /// Persisted audio setting arrived; `None` if the fetch failed
    SettingsResolved(Option<AudioSettings>),
}

impl From<UiEvent> for Event {
    fn from(event: UiEvent) -> Self {
        Self::Ui(event)
    }
}

/// Work the driver performs after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Tell the host the switch changed so it can persist it
    PushAudioSetting(bool),
    /// Redraw the master switch
    UpdateSwitch(SwitchView),
    /// Redraw one audio node
    UpdateNode {
        id: AudioNodeId,
        enablement: Enablement,
        selected: bool,
    },
    /// Report the terminal outcome
    Emit(Outcome),
}

/// State of one picker dialog
#[derive(Debug, Clone)]
pub struct DialogState {
    list: SourceList,
    strings: Strings,
    gate: AudioGate,
    selection: Selection,
    closed: bool,
}

impl DialogState {
    /// Build the state from the host's source list
    pub fn new(list: SourceList, platform: Platform, has_switch: bool, strings: Strings) -> Self {
        let capability = AudioCapability::determine(platform, list.audio_forced, has_switch);
        info!(
            "Loaded {} sources, {} audio nodes, audio {:?}",
            list.sources.len(),
            list.audio_nodes.as_ref().map_or(0, Vec::len),
            capability
        );

        Self {
            list,
            strings,
            gate: AudioGate::new(capability),
            selection: Selection::new(),
            closed: false,
        }
    }

    pub fn sources(&self) -> &SourceList {
        &self.list
    }

    pub fn strings(&self) -> &Strings {
        &self.strings
    }

    pub fn gate(&self) -> &AudioGate {
        &self.gate
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// An outcome has been produced
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the persisted setting must be fetched
    pub fn needs_settings(&self) -> bool {
        self.gate.is_available() && !self.gate.is_resolved()
    }

    /// Audio nodes to render, if any
    pub fn renderable_nodes(&self) -> Option<&[AudioNodeId]> {
        self.list
            .audio_nodes
            .as_deref()
            .filter(|nodes| !nodes.is_empty())
    }

    /// Register rendered audio nodes with the gate
    pub fn attach_nodes(&mut self, nodes: &[AudioNodeId]) -> Enablement {
        self.gate.attach_nodes(nodes)
    }

    /// Current master switch view
    pub fn switch_view(&self) -> SwitchView {
        self.gate.switch_view(&self.strings)
    }

    /// Apply one event
    ///
    /// Events after the outcome are ignored. Errors are meant to be turned
    /// into a rejection by the caller.
    pub fn dispatch(&mut self, event: Event) -> Result<Vec<Effect>> {
        if self.closed {
            debug!("Dialog closed, dropping {:?}", event);
            return Ok(Vec::new());
        }

        let effects = match event {
            Event::SettingsResolved(settings) => self.settings_resolved(settings),
            Event::Ui(UiEvent::MasterToggled(checked)) => self.master_toggled(checked),
            Event::Ui(UiEvent::AudioNodeClicked(id)) => self.audio_node_clicked(&id),
            Event::Ui(UiEvent::VideoClicked(id)) => {
                let payload = self.pick_video(&id)?;
                self.close(Outcome::Accept(payload))
            }
            Event::Ui(UiEvent::CloseClicked) => self.close(Outcome::cancelled()),
        };
        Ok(effects)
    }

    /// Produce the terminal outcome effect
    pub fn close(&mut self, outcome: Outcome) -> Vec<Effect> {
        if self.closed {
            return Vec::new();
        }
        self.closed = true;
        vec![Effect::Emit(outcome)]
    }

    fn settings_resolved(&mut self, settings: Option<AudioSettings>) -> Vec<Effect> {
        let updates = self.gate.resolve(settings);
        let mut effects = vec![Effect::UpdateSwitch(self.switch_view())];
        effects.extend(updates.into_iter().map(|update| self.node_effect(update)));
        effects
    }

    fn master_toggled(&mut self, checked: bool) -> Vec<Effect> {
        let Some(change) = self.gate.toggle(checked) else {
            return vec![Effect::UpdateSwitch(self.switch_view())];
        };
        debug!("Master audio switch {}", if checked { "on" } else { "off" });

        if !change.checked {
            let dropped = self.selection.clear();
            if !dropped.is_empty() {
                debug!("Cleared {} selected audio nodes", dropped.len());
            }
        }

        let mut effects = vec![
            Effect::PushAudioSetting(change.checked),
            Effect::UpdateSwitch(self.switch_view()),
        ];
        effects.extend(change.nodes.into_iter().map(|update| self.node_effect(update)));
        effects
    }

    fn audio_node_clicked(&mut self, id: &str) -> Vec<Effect> {
        match self.gate.enablement(id) {
            None => {
                warn!("Click on unknown audio node {:?}", id);
                Vec::new()
            }
            Some(enablement) if !enablement.accepts_clicks() => {
                warn!("Ignoring click on disabled audio node {:?}", id);
                Vec::new()
            }
            Some(enablement) => {
                let selected = self.selection.toggle(id);
                debug!("Audio node {:?} selected={}", id, selected);
                vec![Effect::UpdateNode {
                    id: id.to_string(),
                    enablement,
                    selected,
                }]
            }
        }
    }

    /// Build the accept payload for a clicked video source
    pub fn pick_video(&self, id: &str) -> Result<CapturePayload> {
        let source = self
            .list
            .find(id)
            .ok_or_else(|| CapturerError::SourceNotFound(id.to_string()))?;

        let capture_audio =
            self.gate.is_available() && self.gate.is_checked() && !self.selection.is_empty();
        let audio = if capture_audio {
            AudioConstraint::Desktop
        } else {
            AudioConstraint::Off
        };

        Ok(CapturePayload {
            video: MediaConstraint::desktop(Some(source.id.clone())),
            audio,
            selected_audio_nodes: self
                .list
                .audio_nodes
                .as_ref()
                .map(|_| self.selection.as_slice().to_vec()),
        })
    }

    fn node_effect(&self, update: NodeUpdate) -> Effect {
        let selected = self.selection.contains(&update.id);
        Effect::UpdateNode {
            id: update.id,
            enablement: update.enablement,
            selected,
        }
    }
}
