use std::time::Instant;

use super::DragKind;

/// Lifecycle phase of one drag gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragState {
    #[default]
    None,
    Dragging,
    Dropped,
    Cancelled,
}

impl DragState {
    pub fn is_dragging(self) -> bool {
        matches!(self, Self::Dragging)
    }
}

/// The record shared by every source and target of a scope.
#[derive(Clone, Debug, PartialEq)]
pub struct DragContextValue<T> {
    pub kind: DragKind,
    pub item: Option<T>,
    pub state: DragState,
}

impl<T> Default for DragContextValue<T> {
    fn default() -> Self {
        Self {
            kind: DragKind::NONE,
            item: None,
            state: DragState::None,
        }
    }
}

impl<T> DragContextValue<T> {
    /// Value written by a source when its gesture ends or it is torn down.
    pub fn terminal() -> Self {
        Self {
            kind: DragKind::RESET,
            item: None,
            state: DragState::Cancelled,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state == DragState::Cancelled && self.kind == DragKind::RESET && self.item.is_none()
    }
}

/// Recorded state change used for debugging and host UX decisions.
#[derive(Clone, Debug)]
pub struct DragTransition {
    pub from: DragState,
    pub to: DragState,
    pub kind: DragKind,
    pub recorded_at: Instant,
}

#[derive(Debug, Default)]
pub(super) struct TransitionLog {
    entries: Vec<DragTransition>,
}

impl TransitionLog {
    const MAX_HISTORY: usize = 64;

    pub(super) fn record(&mut self, from: DragState, to: DragState, kind: DragKind) {
        self.entries.push(DragTransition {
            from,
            to,
            kind,
            recorded_at: Instant::now(),
        });
        if self.entries.len() > Self::MAX_HISTORY {
            let excess = self.entries.len() - Self::MAX_HISTORY;
            self.entries.drain(..excess);
        }
    }

    pub(super) fn entries(&self) -> &[DragTransition] {
        &self.entries
    }
}
