//! Bridge from egui pointer input to the host's native drag events.
//!
//! Widgets register the screen rectangle of their element every frame; at the
//! end of the frame the driver compares pointer state with the previous frame
//! and dispatches the drag-start / enter / leave / over / drop / end sequence
//! a browser would produce for the same gesture.

use eframe::egui;
use egui::{Pos2, Rect};
use tracing::{debug, info};

use crate::host::{DataTransfer, Document, DragEvent, DragEventKind, ElementId};

/// Pointer state sampled once per frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerFrame {
    pub pos: Option<Pos2>,
    pub pressed: bool,
    pub down: bool,
    pub released: bool,
    pub escape: bool,
    /// The pointer moved far enough from the press to count as a drag.
    pub dragging: bool,
    /// A layer above the background (window, popup, floating panel) is under
    /// the pointer, so the registered elements beneath it are hidden.
    pub occluded: bool,
}

impl PointerFrame {
    pub fn capture(ctx: &egui::Context) -> Self {
        let frame = ctx.input(|i| Self {
            pos: i.pointer.interact_pos(),
            pressed: i.pointer.primary_pressed(),
            down: i.pointer.primary_down(),
            released: i.pointer.primary_released(),
            escape: i.key_pressed(egui::Key::Escape),
            dragging: i.pointer.is_decidedly_dragging(),
            occluded: false,
        });
        let occluded = frame
            .pos
            .and_then(|pos| ctx.layer_id_at(pos))
            .is_some_and(|layer| layer.order != egui::Order::Background);
        Self { occluded, ..frame }
    }
}

/// How a gesture driven by [`EguiDragDriver`] finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The hovered element accepted the drag and received the drop.
    Dropped { target: ElementId },
    /// Released where nothing accepted the drag.
    Released,
    /// Escape pressed mid-drag.
    Escaped,
}

struct Gesture {
    source: ElementId,
    hovered: Option<ElementId>,
    transfer: DataTransfer,
    over_accepted: bool,
    last_pos: Pos2,
}

/// Per-window driver turning egui pointer input into document dispatches.
pub struct EguiDragDriver {
    document: Document,
    regions: Vec<(ElementId, Rect)>,
    press: Option<ElementId>,
    gesture: Option<Gesture>,
}

impl EguiDragDriver {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            regions: Vec::new(),
            press: None,
            gesture: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Forget last frame's layout; call before laying out widgets.
    pub fn begin_frame(&mut self) {
        self.regions.clear();
    }

    /// Record where `element` was laid out this frame.
    pub fn register(&mut self, element: ElementId, rect: Rect) {
        self.regions.push((element, rect));
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    pub fn hovered(&self) -> Option<ElementId> {
        self.gesture.as_ref().and_then(|gesture| gesture.hovered)
    }

    /// Sample egui input and dispatch whatever the frame implies.
    pub fn end_frame(&mut self, ctx: &egui::Context) -> Option<GestureOutcome> {
        self.step(PointerFrame::capture(ctx))
    }

    /// Advance the gesture by one frame of pointer input.
    pub fn step(&mut self, frame: PointerFrame) -> Option<GestureOutcome> {
        if self.gesture.is_some() {
            if frame.escape {
                return Some(self.finish(false, GestureOutcome::Escaped));
            }
            if frame.released || !frame.down {
                return Some(self.finish(true, GestureOutcome::Released));
            }
            if let Some(pos) = frame.pos {
                self.track(pos, frame.occluded);
            }
            return None;
        }

        if frame.pressed {
            self.press = frame
                .pos
                .filter(|_| !frame.occluded)
                .and_then(|pos| self.hit_test(pos));
        }
        if !frame.down {
            self.press = None;
            return None;
        }
        if frame.dragging
            && let (Some(press), Some(pos)) = (self.press.take(), frame.pos)
        {
            self.start(press, pos, frame.occluded);
        }
        None
    }

    /// Deepest registered element under `pos`; later registrations win ties.
    pub fn hit_test(&self, pos: Pos2) -> Option<ElementId> {
        self.regions
            .iter()
            .enumerate()
            .filter(|(_, (element, rect))| rect.contains(pos) && self.document.contains(*element))
            .max_by_key(|(order, (element, _))| {
                (self.document.propagation_path(*element).len(), *order)
            })
            .map(|(_, (element, _))| *element)
    }

    fn start(&mut self, press: ElementId, pos: Pos2, occluded: bool) {
        let event = self
            .document
            .dispatch(DragEvent::new(DragEventKind::DragStart, press).at(pos));
        let source = self
            .document
            .propagation_path(press)
            .into_iter()
            .find(|element| self.document.is_draggable(*element));
        let Some(source) = source else {
            debug!("Pointer drag from {:?} not claimed by any source", press);
            return;
        };
        info!("Native drag started from {:?}", source);
        self.gesture = Some(Gesture {
            source,
            hovered: None,
            transfer: event.data_transfer,
            over_accepted: false,
            last_pos: pos,
        });
        self.track(pos, occluded);
    }

    /// Hover follows the hit test; an occluded pointer hovers nothing.
    fn track(&mut self, pos: Pos2, occluded: bool) {
        let next = if occluded { None } else { self.hit_test(pos) };
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        let previous = gesture.hovered;
        let transfer = gesture.transfer.clone();
        if next != previous {
            if let Some(entered) = next {
                self.fire(DragEventKind::DragEnter, entered, pos, &transfer);
            }
            if let Some(left) = previous {
                self.fire(DragEventKind::DragLeave, left, pos, &transfer);
            }
        }
        let over = next.map(|hovered| self.fire(DragEventKind::DragOver, hovered, pos, &transfer));
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.hovered = next;
            gesture.last_pos = pos;
            gesture.over_accepted = over.as_ref().is_some_and(DragEvent::default_prevented);
            if let Some(over) = over {
                gesture.transfer.drop_effect = over.data_transfer.drop_effect;
            }
        }
    }

    fn finish(&mut self, allow_drop: bool, fallback: GestureOutcome) -> GestureOutcome {
        let Some(gesture) = self.gesture.take() else {
            return fallback;
        };
        let pos = gesture.last_pos;
        let mut outcome = fallback;
        match gesture.hovered {
            Some(hovered) if allow_drop && gesture.over_accepted => {
                self.fire(DragEventKind::Drop, hovered, pos, &gesture.transfer);
                outcome = GestureOutcome::Dropped { target: hovered };
            }
            Some(hovered) => {
                self.fire(DragEventKind::DragLeave, hovered, pos, &gesture.transfer);
            }
            None => {}
        }
        self.fire(DragEventKind::DragEnd, gesture.source, pos, &gesture.transfer);
        info!("Native drag from {:?} finished: {:?}", gesture.source, outcome);
        outcome
    }

    fn fire(
        &self,
        kind: DragEventKind,
        target: ElementId,
        pos: Pos2,
        transfer: &DataTransfer,
    ) -> DragEvent {
        self.document.dispatch(
            DragEvent::new(kind, target)
                .at(pos)
                .with_transfer(transfer.clone()),
        )
    }
}
