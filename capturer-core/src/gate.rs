//! Audio capability gate
//!
//! Decides whether system audio is offered at all and keeps every audio
//! node control's enabled state in lockstep with the master switch.

use tracing::{debug, warn};

use crate::l10n::Strings;
use crate::protocol::AudioSettings;
use crate::render::{Enablement, SwitchView};
use crate::types::{AudioNodeId, Platform};

/// Whether audio capture is offered, and if so whether it is switched on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCapability {
    /// Master switch permanently disabled
    Unavailable,
    /// Master switch usable; `checked` is its current state
    Available { checked: bool },
}

impl AudioCapability {
    /// Derive the capability once sources are known
    ///
    /// Audio is offered when the platform always captures system audio or
    /// the host forced it on, and only if there is a switch to control it.
    pub fn determine(platform: Platform, audio_forced: bool, has_switch: bool) -> Self {
        if (platform.has_system_audio() || audio_forced) && has_switch {
            Self::Available { checked: false }
        } else {
            Self::Unavailable
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Available and switched on
    pub fn is_checked(&self) -> bool {
        matches!(self, Self::Available { checked: true })
    }
}

/// Enablement change for one rendered node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeUpdate {
    pub id: AudioNodeId,
    pub enablement: Enablement,
}

/// Result of flipping the master switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchChange {
    /// New switch state
    pub checked: bool,
    /// Every rendered node, re-enabled or disabled
    pub nodes: Vec<NodeUpdate>,
}

/// Master switch plus the enablement of every rendered node
#[derive(Debug, Clone)]
pub struct AudioGate {
    capability: AudioCapability,
    /// Persisted setting has been applied (or given up on)
    resolved: bool,
    /// User flipped the switch before the persisted setting arrived
    toggled: bool,
    nodes: Vec<NodeUpdate>,
}

impl AudioGate {
    /// Create a gate for a freshly loaded dialog
    pub fn new(capability: AudioCapability) -> Self {
        Self {
            capability,
            resolved: !capability.is_available(),
            toggled: false,
            nodes: Vec::new(),
        }
    }

    pub fn capability(&self) -> AudioCapability {
        self.capability
    }

    pub fn is_available(&self) -> bool {
        self.capability.is_available()
    }

    pub fn is_checked(&self) -> bool {
        self.capability.is_checked()
    }

    /// Whether the switch state is final
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    /// Enablement a node gets when it is rendered now
    pub fn initial_enablement(&self) -> Enablement {
        if self.resolved {
            Enablement::from_checked(self.is_checked())
        } else {
            Enablement::Pending
        }
    }

    /// Register rendered nodes and return their initial enablement
    pub fn attach_nodes(&mut self, ids: &[AudioNodeId]) -> Enablement {
        let enablement = self.initial_enablement();
        self.nodes.extend(ids.iter().map(|id| NodeUpdate {
            id: id.clone(),
            enablement,
        }));
        enablement
    }

    /// Current enablement of a rendered node
    pub fn enablement(&self, id: &str) -> Option<Enablement> {
        self.nodes
            .iter()
            .find(|node| node.id == id)
            .map(|node| node.enablement)
    }

    /// Apply the persisted setting and reconcile pending nodes
    ///
    /// `None` means the fetch failed; the switch keeps its default state.
    /// A flip made by the user while the fetch was in flight wins over the
    /// stored value, so the stored value is not always applied. The host
    /// has already been sent the user's choice as `settingsChanged`.
    /// Selection is never touched here.
    pub fn resolve(&mut self, settings: Option<AudioSettings>) -> Vec<NodeUpdate> {
        if self.resolved {
            return Vec::new();
        }
        self.resolved = true;

        if let (Some(settings), false) = (settings, self.toggled) {
            debug!("Applying persisted audio setting: {}", settings.audio);
            self.capability = AudioCapability::Available {
                checked: settings.audio,
            };
        }

        let target = Enablement::from_checked(self.is_checked());
        self.nodes
            .iter_mut()
            .filter(|node| node.enablement == Enablement::Pending)
            .map(|node| {
                node.enablement = target;
                node.clone()
            })
            .collect()
    }

    /// Flip the master switch and cascade to every node
    ///
    /// Returns `None` when audio is unavailable and the switch is inert.
    pub fn toggle(&mut self, checked: bool) -> Option<SwitchChange> {
        if !self.is_available() {
            warn!("Ignoring master switch change, audio is unavailable");
            return None;
        }

        self.capability = AudioCapability::Available { checked };
        if !self.resolved {
            self.toggled = true;
        }

        let enablement = Enablement::from_checked(checked);
        for node in &mut self.nodes {
            node.enablement = enablement;
        }

        Some(SwitchChange {
            checked,
            nodes: self.nodes.clone(),
        })
    }

    /// View of the master switch for rendering
    pub fn switch_view(&self, strings: &Strings) -> SwitchView {
        let available = self.is_available();
        SwitchView {
            enabled: available,
            checked: self.is_checked(),
            title: strings.sound_title(available).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes() -> Vec<AudioNodeId> {
        vec!["node:a".to_string(), "node:b".to_string()]
    }

    #[test]
    fn test_capability_rules() {
        assert!(AudioCapability::determine(Platform::Windows, false, true).is_available());
        assert!(AudioCapability::determine(Platform::Linux, true, true).is_available());
        assert!(!AudioCapability::determine(Platform::Linux, false, true).is_available());
        assert!(!AudioCapability::determine(Platform::Windows, true, false).is_available());
    }

    #[test]
    fn test_available_starts_unchecked() {
        let cap = AudioCapability::determine(Platform::Linux, true, true);
        assert_eq!(cap, AudioCapability::Available { checked: false });
        assert!(!cap.is_checked());
    }

    #[test]
    fn test_nodes_pending_until_resolved() {
        let mut gate = AudioGate::new(AudioCapability::Available { checked: false });
        assert_eq!(gate.attach_nodes(&nodes()), Enablement::Pending);

        let updates = gate.resolve(Some(AudioSettings { audio: true }));
        assert_eq!(updates.len(), 2);
        assert!(updates.iter().all(|u| u.enablement == Enablement::Enabled));
        assert!(gate.is_checked());
    }

    #[test]
    fn test_failed_fetch_disables_pending_nodes() {
        let mut gate = AudioGate::new(AudioCapability::Available { checked: false });
        gate.attach_nodes(&nodes());
        let updates = gate.resolve(None);
        assert!(updates.iter().all(|u| u.enablement == Enablement::Disabled));
        assert!(!gate.is_checked());
    }

    #[test]
    fn test_unavailable_nodes_disabled_immediately() {
        let mut gate = AudioGate::new(AudioCapability::Unavailable);
        assert_eq!(gate.attach_nodes(&nodes()), Enablement::Disabled);
        assert!(gate.toggle(true).is_none());
        assert_eq!(gate.enablement("node:a"), Some(Enablement::Disabled));
    }

    #[test]
    fn test_toggle_before_resolution_wins() {
        let mut gate = AudioGate::new(AudioCapability::Available { checked: false });
        gate.attach_nodes(&nodes());
        gate.toggle(true).unwrap();

        let updates = gate.resolve(Some(AudioSettings { audio: false }));
        assert!(updates.is_empty());
        assert!(gate.is_checked());
        assert_eq!(gate.enablement("node:b"), Some(Enablement::Enabled));
    }

    #[test]
    fn test_resolve_is_once() {
        let mut gate = AudioGate::new(AudioCapability::Available { checked: false });
        gate.attach_nodes(&nodes());
        gate.resolve(Some(AudioSettings { audio: true }));
        assert!(gate.resolve(Some(AudioSettings { audio: false })).is_empty());
        assert!(gate.is_checked());
    }

    #[test]
    fn test_switch_view_titles() {
        let strings = Strings::default();
        let off = AudioGate::new(AudioCapability::Unavailable).switch_view(&strings);
        assert!(!off.enabled);
        assert_eq!(off.title, strings.sound_unavailable);

        let on = AudioGate::new(AudioCapability::Available { checked: true }).switch_view(&strings);
        assert!(on.enabled && on.checked);
        assert_eq!(on.title, strings.sound_system);
    }
}
