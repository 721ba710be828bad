use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::ElementId;

/// Native drag events understood by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    DragStart,
    DragEnd,
    DragEnter,
    DragLeave,
    DragOver,
    Drop,
}

impl DragEventKind {
    /// Lowercase event name, matching the platform event names.
    pub fn name(self) -> &'static str {
        match self {
            Self::DragStart => "dragstart",
            Self::DragEnd => "dragend",
            Self::DragEnter => "dragenter",
            Self::DragLeave => "dragleave",
            Self::DragOver => "dragover",
            Self::Drop => "drop",
        }
    }
}

/// Transfer effect advertised by a source or requested by a target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropEffect {
    #[default]
    None,
    Copy,
    Link,
    Move,
}

/// Element used as the drag image, with the cursor offset inside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragImage {
    pub element: ElementId,
    pub offset: Vec2,
}

/// Mutable transfer record carried by every drag event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataTransfer {
    pub effect_allowed: DropEffect,
    pub drop_effect: DropEffect,
    drag_image: Option<DragImage>,
}

impl DataTransfer {
    /// Use `element` as the drag image, anchored at `offset` from the cursor.
    pub fn set_drag_image(&mut self, element: ElementId, offset: Vec2) {
        self.drag_image = Some(DragImage { element, offset });
    }

    pub fn drag_image(&self) -> Option<DragImage> {
        self.drag_image
    }
}

/// A native drag event as seen by listeners while it propagates.
#[derive(Clone, Debug)]
pub struct DragEvent {
    pub kind: DragEventKind,
    /// Element the event was dispatched to.
    pub target: ElementId,
    /// Element whose listeners are currently running.
    pub current_target: Option<ElementId>,
    pub position: Option<Pos2>,
    pub data_transfer: DataTransfer,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl DragEvent {
    pub fn new(kind: DragEventKind, target: ElementId) -> Self {
        Self {
            kind,
            target,
            current_target: None,
            position: None,
            data_transfer: DataTransfer::default(),
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// Attach a pointer position to the event.
    pub fn at(mut self, position: Pos2) -> Self {
        self.position = Some(position);
        self
    }

    /// Carry an existing transfer record (the platform keeps one per gesture).
    pub fn with_transfer(mut self, data_transfer: DataTransfer) -> Self {
        self.data_transfer = data_transfer;
        self
    }

    /// Keep the event from reaching ancestors of the current element.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
