use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::host::DropEffect;

use super::defaults::{
    clamp_header_height, default_effect, default_header_height, default_preview_offset,
    default_true,
};

/// Settings persisted in `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DndSettings {
    #[serde(default)]
    pub drag: DragSettings,
    #[serde(default)]
    pub panel: PanelSettings,
}

impl DndSettings {
    pub(super) fn normalized(mut self) -> Self {
        self.panel.header_height = clamp_header_height(self.panel.header_height);
        self
    }
}

/// Defaults applied to drag sources and drop targets.
///
/// Config keys: `effect_allowed`, `drop_effect`, `preview_offset`,
/// `trace_over_events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSettings {
    /// Effect advertised by sources on drag-start.
    #[serde(default = "default_effect")]
    pub effect_allowed: DropEffect,
    /// Effect requested by accepting targets on drag-over.
    #[serde(default = "default_effect")]
    pub drop_effect: DropEffect,
    /// Cursor offset inside a custom drag image.
    #[serde(default = "default_preview_offset")]
    pub preview_offset: [f32; 2],
    /// Trace every accepted drag-over (high frequency).
    #[serde(default)]
    pub trace_over_events: bool,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            effect_allowed: default_effect(),
            drop_effect: default_effect(),
            preview_offset: default_preview_offset(),
            trace_over_events: false,
        }
    }
}

impl DragSettings {
    pub fn preview_vec(&self) -> Vec2 {
        Vec2::new(self.preview_offset[0], self.preview_offset[1])
    }
}

/// Floating panel behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSettings {
    /// Height of the header strip that starts a panel drag.
    #[serde(default = "default_header_height")]
    pub header_height: f32,
    /// Keep the panel header inside the viewport while dragging.
    #[serde(default = "default_true")]
    pub clamp_to_viewport: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            header_height: default_header_height(),
            clamp_to_viewport: true,
        }
    }
}
