//! Localized dialog strings
//!
//! Source names come from the host in English; only the generic screen
//! labels are translated.

use serde::{Deserialize, Serialize};

/// Label the host uses for the whole desktop
const ENTIRE_SCREEN: &str = "Entire Screen";
/// Label prefix the host uses for individual monitors
const SCREEN: &str = "Screen";

/// String table for the picker dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strings {
    /// Replacement for "Entire Screen"
    #[serde(default = "default_entire")]
    pub entire: String,

    /// Replacement for "Screen"
    #[serde(default = "default_screen")]
    pub screen: String,

    /// Master switch title when system audio can be captured
    #[serde(default = "default_sound_system")]
    pub sound_system: String,

    /// Master switch title when it cannot
    #[serde(default = "default_sound_unavailable")]
    pub sound_unavailable: String,

    /// Close button title
    #[serde(default = "default_close")]
    pub close: String,
}

fn default_entire() -> String {
    ENTIRE_SCREEN.to_string()
}

fn default_screen() -> String {
    SCREEN.to_string()
}

fn default_sound_system() -> String {
    "Share system audio".to_string()
}

fn default_sound_unavailable() -> String {
    "System audio is not available on this platform".to_string()
}

fn default_close() -> String {
    "Close".to_string()
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            entire: default_entire(),
            screen: default_screen(),
            sound_system: default_sound_system(),
            sound_unavailable: default_sound_unavailable(),
            close: default_close(),
        }
    }
}

impl Strings {
    /// Localize a raw source name
    ///
    /// Only the first occurrence of each label is replaced, "Entire Screen"
    /// before "Screen".
    pub fn translate(&self, name: &str) -> String {
        name.replacen(ENTIRE_SCREEN, &self.entire, 1)
            .replacen(SCREEN, &self.screen, 1)
    }

    /// Title for the master audio switch
    pub fn sound_title(&self, available: bool) -> &str {
        if available {
            &self.sound_system
        } else {
            &self.sound_unavailable
        }
    }
}
