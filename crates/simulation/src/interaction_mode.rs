//! Preview (read-only) mode.
//!
//! While preview mode is on, tiles cannot be selected, dragged or recycled
//! and nothing can be dragged out of the inventory. Harvesting still works.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionMode {
    preview: bool,
}

impl InteractionMode {
    pub fn is_preview(&self) -> bool {
        self.preview
    }

    pub fn set_preview(&mut self, preview: bool) {
        if self.preview != preview {
            info!("Preview mode {}", if preview { "on" } else { "off" });
        }
        self.preview = preview;
    }
}
