use std::{cell::RefCell, rc::Rc};

use tracing::{debug, info};

use super::state::TransitionLog;
use super::{
    DragContextValue, DragKind, DragSource, DragSourceConfig, DragState, DragTransition,
    DropTarget, DropTargetConfig,
};

struct ScopeInner<T> {
    value: DragContextValue<T>,
    transitions: TransitionLog,
}

/// Provider scope owning one shared drag context.
///
/// Every source and target created from the same scope (or a clone of it)
/// observes the same record; separate scopes are isolated drag domains. The
/// handle is single-threaded and never holds a borrow across user callbacks.
pub struct DndScope<T> {
    inner: Rc<RefCell<ScopeInner<T>>>,
}

impl<T> Clone for DndScope<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Default for DndScope<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DndScope<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ScopeInner {
                value: DragContextValue::default(),
                transitions: TransitionLog::default(),
            })),
        }
    }

    pub fn kind(&self) -> DragKind {
        self.inner.borrow().value.kind
    }

    pub fn state(&self) -> DragState {
        self.inner.borrow().value.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state().is_dragging()
    }

    /// Bitwise acceptance test of `accept` against the published kind.
    pub fn accepts(&self, accept: DragKind) -> bool {
        accept.intersects(self.kind())
    }

    /// True when both handles point at the same context.
    pub fn same_scope(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Publish a new gesture, overwriting whatever was there before.
    pub fn begin(&self, kind: DragKind, item: Option<T>) {
        let mut inner = self.inner.borrow_mut();
        let previous = inner.value.state;
        if previous.is_dragging() {
            debug!(
                "Drag start overwrites active drag of {:?} with {:?}",
                inner.value.kind, kind
            );
        }
        inner.value = DragContextValue {
            kind,
            item,
            state: DragState::Dragging,
        };
        inner.transitions.record(previous, DragState::Dragging, kind);
        info!("Drag started kind={:?}", kind);
    }

    /// Record that an accepting target received the drop.
    pub fn mark_dropped(&self) {
        let mut inner = self.inner.borrow_mut();
        let previous = inner.value.state;
        let kind = inner.value.kind;
        inner.value.state = DragState::Dropped;
        inner.transitions.record(previous, DragState::Dropped, kind);
    }

    /// Write the terminal value used after every gesture end and on source teardown.
    pub fn reset(&self) {
        let mut inner = self.inner.borrow_mut();
        let previous = inner.value.state;
        inner.value = DragContextValue::terminal();
        inner
            .transitions
            .record(previous, DragState::Cancelled, DragKind::RESET);
    }

    /// Recent state transitions, oldest first.
    pub fn transitions(&self) -> Vec<DragTransition> {
        self.inner.borrow().transitions.entries().to_vec()
    }
}

impl<T: Clone> DndScope<T> {
    pub fn item(&self) -> Option<T> {
        self.inner.borrow().value.item.clone()
    }

    pub fn snapshot(&self) -> DragContextValue<T> {
        self.inner.borrow().value.clone()
    }
}

impl<T: Clone + 'static> DndScope<T> {
    /// Create a drag source bound to this scope.
    pub fn drag_source(&self, config: DragSourceConfig<T>) -> DragSource<T> {
        DragSource::new(self.clone(), config)
    }

    /// Create a drop target bound to this scope.
    pub fn drop_target(&self, config: DropTargetConfig<T>) -> DropTarget<T> {
        DropTarget::new(self.clone(), config)
    }
}
