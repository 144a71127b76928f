//! List rendering
//!
//! The dialog does not draw anything itself. It projects sources and audio
//! nodes into view models and hands them to a [`Surface`], the toolkit
//! specific collaborator that owns the actual widgets.

mod memory;

pub use memory::MemorySurface;

use tracing::debug;

use crate::error::{CapturerError, Result};
use crate::l10n::Strings;
use crate::types::{AudioNodeId, Image, VideoSource};

/// Named anchors a surface may provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Container for video source items (required)
    VideoList,
    /// Container for audio node items
    AudioList,
    /// Master audio toggle
    MasterSwitch,
    /// Close button
    CloseButton,
}

impl Anchor {
    /// Element id of the anchor in the dialog document
    pub fn id(&self) -> &'static str {
        match self {
            Self::VideoList => "capturer-list",
            Self::AudioList => "capturer-audio-list",
            Self::MasterSwitch => "capturer-sound",
            Self::CloseButton => "capturer-close",
        }
    }
}

/// Enabled state of an audio node control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Enablement {
    /// Not yet reconciled with the master switch
    #[default]
    Pending,
    Enabled,
    Disabled,
}

impl Enablement {
    /// Enablement mirroring the master switch
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }

    /// Whether clicks are delivered to the control
    pub fn accepts_clicks(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

/// A selectable screen or window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoItem {
    pub id: String,
    pub title: String,
    pub label: String,
    pub thumbnail: Image,
    pub icon: Option<Image>,
}

/// A selectable audio node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioItem {
    pub id: AudioNodeId,
    pub title: String,
    pub label: String,
    pub enablement: Enablement,
    pub selected: bool,
}

/// State of the master audio switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchView {
    pub enabled: bool,
    pub checked: bool,
    pub title: String,
}

/// Rendering collaborator
pub trait Surface {
    /// Whether the document provides an anchor
    fn has_anchor(&self, anchor: Anchor) -> bool;

    /// Fill the video list container
    fn render_video_list(&mut self, items: Vec<VideoItem>);

    /// Fill the audio list container
    fn render_audio_list(&mut self, items: Vec<AudioItem>);

    /// Reflect the master switch state
    fn update_master_switch(&mut self, view: &SwitchView);

    /// Reflect one audio node's enabled and selected markers
    fn update_audio_node(&mut self, id: &str, enablement: Enablement, selected: bool);

    /// Set the close button title
    fn set_close_title(&mut self, title: &str);
}

/// Project video sources into list items
pub fn video_items(sources: &[VideoSource], strings: &Strings) -> Vec<VideoItem> {
    sources
        .iter()
        .map(|source| {
            let label = strings.translate(&source.name);
            VideoItem {
                id: source.id.clone(),
                title: label.clone(),
                label,
                thumbnail: source.thumbnail.clone(),
                icon: source.app_icon.clone(),
            }
        })
        .collect()
}

/// Project audio node ids into list items
pub fn audio_items(nodes: &[AudioNodeId], enablement: Enablement) -> Vec<AudioItem> {
    nodes
        .iter()
        .map(|id| AudioItem {
            id: id.clone(),
            title: id.clone(),
            label: id.clone(),
            enablement,
            selected: false,
        })
        .collect()
}

/// Render the video list, failing when its container is missing
pub fn render_sources<S: Surface>(
    surface: &mut S,
    sources: &[VideoSource],
    strings: &Strings,
) -> Result<()> {
    if !surface.has_anchor(Anchor::VideoList) {
        return Err(CapturerError::MissingAnchor(Anchor::VideoList.id().into()));
    }
    debug!("Rendering {} video sources", sources.len());
    surface.render_video_list(video_items(sources, strings));
    Ok(())
}

/// Render the audio node list
///
/// Returns false when the surface has no audio container.
pub fn render_audio_nodes<S: Surface>(
    surface: &mut S,
    nodes: &[AudioNodeId],
    enablement: Enablement,
) -> bool {
    if !surface.has_anchor(Anchor::AudioList) {
        return false;
    }
    debug!("Rendering {} audio nodes ({:?})", nodes.len(), enablement);
    surface.render_audio_list(audio_items(nodes, enablement));
    true
}
