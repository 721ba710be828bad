//! Free-floating panels moved by dragging their header.
//!
//! This is direct manipulation of the panel's position and is unrelated to
//! the drag-and-drop context: no payload, no type filtering.

mod view;

pub use view::show_panel;

use egui::{Pos2, Rect, Vec2};

use crate::config::PanelSettings;

/// Position tracker for one floating panel.
#[derive(Clone, Debug)]
pub struct DraggablePanel {
    origin: Pos2,
    size: Vec2,
    header_height: f32,
    bounds: Option<Rect>,
    clamp: bool,
    last_pointer: Option<Pos2>,
}

impl DraggablePanel {
    pub fn new(origin: Pos2, size: Vec2) -> Self {
        Self::with_settings(origin, size, &PanelSettings::default())
    }

    pub fn with_settings(origin: Pos2, size: Vec2, settings: &PanelSettings) -> Self {
        Self {
            origin,
            size,
            header_height: settings.header_height.min(size.y),
            bounds: None,
            clamp: settings.clamp_to_viewport,
            last_pointer: None,
        }
    }

    pub fn origin(&self) -> Pos2 {
        self.origin
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.origin, self.size)
    }

    pub fn header_rect(&self) -> Rect {
        Rect::from_min_size(self.origin, Vec2::new(self.size.x, self.header_height))
    }

    pub fn is_dragging(&self) -> bool {
        self.last_pointer.is_some()
    }

    /// Area the header must stay inside when clamping is enabled.
    pub fn set_bounds(&mut self, bounds: Option<Rect>) {
        self.bounds = bounds;
        self.apply_clamp();
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
        self.header_height = self.header_height.min(size.y);
    }

    /// Start a panel drag when `pos` lands on the header; returns whether it did.
    pub fn pointer_down(&mut self, pos: Pos2) -> bool {
        if !self.header_rect().contains(pos) {
            return false;
        }
        self.last_pointer = Some(pos);
        true
    }

    /// Translate the panel by the pointer delta since the previous event.
    pub fn pointer_move(&mut self, pos: Pos2) {
        let Some(last) = self.last_pointer else {
            return;
        };
        self.origin += pos - last;
        self.last_pointer = Some(pos);
        self.apply_clamp();
    }

    pub fn pointer_up(&mut self) {
        self.last_pointer = None;
    }

    fn apply_clamp(&mut self) {
        let Some(bounds) = self.bounds.filter(|_| self.clamp) else {
            return;
        };
        let max_x = (bounds.max.x - self.size.x).max(bounds.min.x);
        let max_y = (bounds.max.y - self.header_height).max(bounds.min.y);
        self.origin.x = self.origin.x.clamp(bounds.min.x, max_x);
        self.origin.y = self.origin.y.clamp(bounds.min.y, max_y);
    }
}
