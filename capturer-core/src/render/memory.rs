//! In-memory surface
//!
//! Keeps the rendered widget state in plain structs. Used headless and by
//! terminal front-ends that redraw from this state.

use std::collections::HashSet;

use super::{Anchor, AudioItem, Enablement, Surface, SwitchView, VideoItem};

/// Surface that stores what it was asked to render
#[derive(Debug, Clone)]
pub struct MemorySurface {
    anchors: HashSet<Anchor>,
    video: Vec<VideoItem>,
    audio: Vec<AudioItem>,
    switch: Option<SwitchView>,
    close_title: Option<String>,
}

impl MemorySurface {
    /// Create a surface providing every anchor
    pub fn new() -> Self {
        Self {
            anchors: [
                Anchor::VideoList,
                Anchor::AudioList,
                Anchor::MasterSwitch,
                Anchor::CloseButton,
            ]
            .into_iter()
            .collect(),
            video: Vec::new(),
            audio: Vec::new(),
            switch: None,
            close_title: None,
        }
    }

    /// Drop an anchor from the document
    pub fn without(mut self, anchor: Anchor) -> Self {
        self.anchors.remove(&anchor);
        self
    }

    /// Rendered video items
    pub fn video_items(&self) -> &[VideoItem] {
        &self.video
    }

    /// Rendered audio items
    pub fn audio_items(&self) -> &[AudioItem] {
        &self.audio
    }

    /// Rendered audio item by id
    pub fn audio_item(&self, id: &str) -> Option<&AudioItem> {
        self.audio.iter().find(|item| item.id == id)
    }

    /// Master switch state, if configured
    pub fn switch(&self) -> Option<&SwitchView> {
        self.switch.as_ref()
    }

    /// Close button title, if set
    pub fn close_title(&self) -> Option<&str> {
        self.close_title.as_deref()
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for MemorySurface {
    fn has_anchor(&self, anchor: Anchor) -> bool {
        self.anchors.contains(&anchor)
    }

    fn render_video_list(&mut self, items: Vec<VideoItem>) {
        self.video.extend(items);
    }

    fn render_audio_list(&mut self, items: Vec<AudioItem>) {
        self.audio.extend(items);
    }

    fn update_master_switch(&mut self, view: &SwitchView) {
        if self.has_anchor(Anchor::MasterSwitch) {
            self.switch = Some(view.clone());
        }
    }

    fn update_audio_node(&mut self, id: &str, enablement: Enablement, selected: bool) {
        if let Some(item) = self.audio.iter_mut().find(|item| item.id == id) {
            item.enablement = enablement;
            item.selected = selected;
        }
    }

    fn set_close_title(&mut self, title: &str) {
        if self.has_anchor(Anchor::CloseButton) {
            self.close_title = Some(title.to_string());
        }
    }
}
