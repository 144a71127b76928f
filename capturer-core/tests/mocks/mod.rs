//! Mock infrastructure for testing
//!
//! Provides an observable surface, a scripted host and source fixtures.

#![allow(dead_code)]

use capturer_core::bridge::{Envelope, HostEndpoint};
use capturer_core::protocol::{AudioSettings, DialogMessage, HostReply, Outcome, SourceList};
use capturer_core::render::{
    Anchor, AudioItem, Enablement, MemorySurface, Surface, SwitchView, VideoItem,
};
use capturer_core::types::{Image, Platform, VideoSource};
use capturer_core::{Dialog, HostBridge, Result, UiEvent};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

/// How long a test waits for the dialog before failing
pub const STEP_TIMEOUT: Duration = Duration::from_secs(5);

/// Single entire-screen source list
pub fn screen_list() -> SourceList {
    SourceList::new(vec![VideoSource::new("screen:0", "Entire Screen")
        .with_thumbnail(Image::from_base64("image/png", "iVBORw0KGgo="))])
}

/// Screens plus a window with an icon
pub fn mixed_list() -> SourceList {
    SourceList::new(vec![
        VideoSource::new("screen:0", "Screen 1"),
        VideoSource::new("screen:1", "Screen 2"),
        VideoSource::new("window:77:0", "Terminal")
            .with_app_icon(Image::from_base64("image/png", "AAAA")),
    ])
}

/// Surface whose state tests can watch while the dialog runs
#[derive(Clone)]
pub struct ObservedSurface {
    tx: watch::Sender<MemorySurface>,
}

impl ObservedSurface {
    pub fn new(inner: MemorySurface) -> (Self, watch::Receiver<MemorySurface>) {
        let (tx, rx) = watch::channel(inner);
        (Self { tx }, rx)
    }
}

impl Surface for ObservedSurface {
    fn has_anchor(&self, anchor: Anchor) -> bool {
        self.tx.borrow().has_anchor(anchor)
    }

    fn render_video_list(&mut self, items: Vec<VideoItem>) {
        self.tx.send_modify(|s| s.render_video_list(items));
    }

    fn render_audio_list(&mut self, items: Vec<AudioItem>) {
        self.tx.send_modify(|s| s.render_audio_list(items));
    }

    fn update_master_switch(&mut self, view: &SwitchView) {
        self.tx.send_modify(|s| s.update_master_switch(view));
    }

    fn update_audio_node(&mut self, id: &str, enablement: Enablement, selected: bool) {
        self.tx
            .send_modify(|s| s.update_audio_node(id, enablement, selected));
    }

    fn set_close_title(&mut self, title: &str) {
        self.tx.send_modify(|s| s.set_close_title(title));
    }
}

/// A running dialog and the handles to drive it
pub struct Harness {
    pub host: ScriptedHost,
    pub ui: mpsc::UnboundedSender<UiEvent>,
    pub view: watch::Receiver<MemorySurface>,
    pub task: JoinHandle<Result<Outcome>>,
}

impl Harness {
    /// Start a dialog on `platform` against a scripted host
    pub fn start(platform: Platform, surface: MemorySurface) -> Self {
        let (bridge, endpoint) = HostBridge::pair();
        let (surface, view) = ObservedSurface::new(surface);
        let (ui, events) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut dialog = Dialog::new(bridge, surface).with_platform(platform);
            dialog.run(events).await
        });

        Self {
            host: ScriptedHost { endpoint },
            ui,
            view,
            task,
        }
    }

    /// Send a user event
    pub fn click(&self, event: UiEvent) {
        self.ui.send(event).expect("dialog stopped listening");
    }

    /// Wait until the rendered state satisfies `f`
    pub async fn wait_view(&mut self, f: impl FnMut(&MemorySurface) -> bool) {
        tokio::time::timeout(STEP_TIMEOUT, self.view.wait_for(f))
            .await
            .expect("timed out waiting for surface")
            .expect("surface dropped");
    }

    /// Wait until an audio node shows `enablement`
    pub async fn wait_node(&mut self, id: &str, enablement: Enablement) {
        let id = id.to_string();
        self.wait_view(move |s| s.audio_item(&id).map(|i| i.enablement) == Some(enablement))
            .await;
    }

    /// Wait for the dialog task to finish
    pub async fn finish(self) -> Result<Outcome> {
        tokio::time::timeout(STEP_TIMEOUT, self.task)
            .await
            .expect("dialog did not finish")
            .expect("dialog task panicked")
    }
}

/// Host that answers by hand, one expected message at a time
pub struct ScriptedHost {
    endpoint: HostEndpoint,
}

impl ScriptedHost {
    /// Next envelope from the dialog
    pub async fn next(&mut self) -> Option<Envelope> {
        tokio::time::timeout(STEP_TIMEOUT, self.endpoint.recv())
            .await
            .expect("timed out waiting for dialog message")
    }

    /// Expect `getSources` and answer it
    pub async fn answer_sources(&mut self, list: Option<SourceList>) {
        let envelope = self.next().await.expect("dialog gone");
        assert_eq!(envelope.message, DialogMessage::GetSources);
        let _ = envelope
            .reply
            .expect("getSources without reply slot")
            .send(HostReply::Sources { list });
    }

    /// Expect `getAudioSettings` and hand back its reply slot
    pub async fn expect_settings_request(&mut self) -> oneshot::Sender<HostReply> {
        let envelope = self.next().await.expect("dialog gone");
        assert_eq!(envelope.message, DialogMessage::GetAudioSettings);
        envelope.reply.expect("getAudioSettings without reply slot")
    }

    /// Expect `getAudioSettings` and answer it
    pub async fn answer_settings(&mut self, audio: bool) {
        let _ = self
            .expect_settings_request()
            .await
            .send(HostReply::AudioSettings(AudioSettings { audio }));
    }

    /// Expect a `settingsChanged` notification
    pub async fn expect_settings_changed(&mut self) -> bool {
        match self.next().await.map(|e| e.message) {
            Some(DialogMessage::SettingsChanged { screen_share_store }) => screen_share_store.audio,
            other => panic!("expected settingsChanged, got {:?}", other),
        }
    }

    /// Expect the terminal `closeView`
    pub async fn expect_outcome(&mut self) -> Outcome {
        match self.next().await.map(|e| e.message) {
            Some(DialogMessage::CloseView { outcome }) => outcome,
            other => panic!("expected closeView, got {:?}", other),
        }
    }

    /// Expect the dialog to have hung up
    pub async fn expect_hangup(&mut self) {
        if let Some(envelope) = self.next().await {
            panic!("expected no more messages, got {:?}", envelope.message);
        }
    }

    /// Drop the host side entirely
    pub fn disconnect(self) {
        drop(self.endpoint);
    }
}
