//! Audio node selection
//!
//! Insertion order is click order; ids are unique.

use crate::types::AudioNodeId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: Vec<AudioNodeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the id if selected, append it otherwise
    ///
    /// Returns whether the id is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.nodes.iter().position(|node| node == id) {
            self.nodes.remove(pos);
            false
        } else {
            self.nodes.push(id.to_string());
            true
        }
    }

    /// Drop every selected id, returning what was selected
    pub fn clear(&mut self) -> Vec<AudioNodeId> {
        std::mem::take(&mut self.nodes)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn as_slice(&self) -> &[AudioNodeId] {
        &self.nodes
    }
}
