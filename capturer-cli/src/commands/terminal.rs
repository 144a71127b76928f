//! Terminal front-end for the picker dialog

use std::sync::Arc;

use capturer_core::render::{
    Anchor, AudioItem, Enablement, MemorySurface, Surface, SwitchView, VideoItem,
};
use capturer_core::UiEvent;
use parking_lot::Mutex;

/// Surface that prints every update and keeps the state for the input reader
#[derive(Clone)]
pub struct TerminalSurface {
    state: Arc<Mutex<MemorySurface>>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemorySurface::new())),
        }
    }

    /// Translate one input line into a UI event
    pub fn parse_command(&self, line: &str) -> Option<UiEvent> {
        parse_command(line, &self.state.lock())
    }
}

fn marker(enablement: Enablement, selected: bool) -> &'static str {
    match (enablement, selected) {
        (Enablement::Disabled, _) => "[-]",
        (_, true) => "[x]",
        (_, false) => "[ ]",
    }
}

fn print_switch(view: &SwitchView) {
    if view.enabled {
        let mark = if view.checked { "[x]" } else { "[ ]" };
        println!("  s {} {}", mark, view.title);
    } else {
        println!("    [-] {}", view.title);
    }
}

impl Surface for TerminalSurface {
    fn has_anchor(&self, anchor: Anchor) -> bool {
        self.state.lock().has_anchor(anchor)
    }

    fn render_video_list(&mut self, items: Vec<VideoItem>) {
        println!("Sources:");
        for (i, item) in items.iter().enumerate() {
            let icon = if item.icon.is_some() { " *" } else { "" };
            println!("  v {:<3} {}{}", i, item.label, icon);
        }
        self.state.lock().render_video_list(items);
    }

    fn render_audio_list(&mut self, items: Vec<AudioItem>) {
        println!("Audio nodes:");
        for (i, item) in items.iter().enumerate() {
            println!("  a {:<3} {} {}", i, marker(item.enablement, item.selected), item.label);
        }
        self.state.lock().render_audio_list(items);
    }

    fn update_master_switch(&mut self, view: &SwitchView) {
        print_switch(view);
        self.state.lock().update_master_switch(view);
    }

    fn update_audio_node(&mut self, id: &str, enablement: Enablement, selected: bool) {
        println!("    {} {}", marker(enablement, selected), id);
        self.state.lock().update_audio_node(id, enablement, selected);
    }

    fn set_close_title(&mut self, title: &str) {
        println!("  q     {}", title);
        self.state.lock().set_close_title(title);
    }
}

/// Map `v <n>`, `a <n>`, `s` and `q` onto the rendered widgets
fn parse_command(line: &str, view: &MemorySurface) -> Option<UiEvent> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?;
    let index = parts.next().and_then(|n| n.parse::<usize>().ok());

    match (command, index) {
        ("v", Some(i)) => view
            .video_items()
            .get(i)
            .map(|item| UiEvent::VideoClicked(item.id.clone())),
        ("a", Some(i)) => view
            .audio_items()
            .get(i)
            .map(|item| UiEvent::AudioNodeClicked(item.id.clone())),
        ("s", None) => view
            .switch()
            .filter(|switch| switch.enabled)
            .map(|switch| UiEvent::MasterToggled(!switch.checked)),
        ("q", None) => Some(UiEvent::CloseClicked),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capturer_core::l10n::Strings;
    use capturer_core::render::{audio_items, video_items};
    use capturer_core::VideoSource;

    fn populated() -> MemorySurface {
        let mut view = MemorySurface::new();
        view.render_video_list(video_items(
            &[
                VideoSource::new("screen:0", "Entire Screen"),
                VideoSource::new("window:3:0", "Terminal"),
            ],
            &Strings::default(),
        ));
        view.render_audio_list(audio_items(&["node:a".to_string()], Enablement::Enabled));
        view.update_master_switch(&SwitchView {
            enabled: true,
            checked: true,
            title: "Share system audio".into(),
        });
        view
    }

    #[test]
    fn test_parse_indexes_rendered_items() {
        let view = populated();
        assert_eq!(
            parse_command("v 1", &view),
            Some(UiEvent::VideoClicked("window:3:0".into()))
        );
        assert_eq!(
            parse_command("a 0", &view),
            Some(UiEvent::AudioNodeClicked("node:a".into()))
        );
        assert_eq!(parse_command("v 9", &view), None);
    }

    #[test]
    fn test_parse_switch_flips_current_state() {
        let view = populated();
        assert_eq!(parse_command("s", &view), Some(UiEvent::MasterToggled(false)));
    }

    #[test]
    fn test_parse_switch_ignored_when_disabled() {
        let mut view = populated();
        view.update_master_switch(&SwitchView {
            enabled: false,
            checked: false,
            title: "unavailable".into(),
        });
        assert_eq!(parse_command("s", &view), None);
    }

    #[test]
    fn test_parse_quit_and_garbage() {
        let view = populated();
        assert_eq!(parse_command("q", &view), Some(UiEvent::CloseClicked));
        assert_eq!(parse_command("", &view), None);
        assert_eq!(parse_command("x 1", &view), None);
    }
}
