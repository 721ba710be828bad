use std::{cell::Cell, rc::Rc};

use tracing::{debug, trace};

use crate::config::DragSettings;
use crate::host::{
    Document, DragEvent, DragEventKind, DropEffect, ElementId, ElementRef, Listener, ListenerId,
};

use super::{DndScope, DragKind};

/// Target callback: `(event, item, element)`, where `element` is the target's
/// own element rather than the descendant the event was dispatched to.
pub type TargetCallback<T> = Rc<dyn Fn(&DragEvent, Option<&T>, ElementId)>;

/// Configuration for a [`DropTarget`].
pub struct DropTargetConfig<T> {
    pub accept: DragKind,
    pub on_drop: Option<TargetCallback<T>>,
    pub on_leave: Option<TargetCallback<T>>,
    pub on_enter: Option<TargetCallback<T>>,
    pub on_over: Option<TargetCallback<T>>,
    pub disable: bool,
    pub drop_effect: DropEffect,
}

impl<T> DropTargetConfig<T> {
    pub fn new(accept: DragKind) -> Self {
        Self {
            accept,
            on_drop: None,
            on_leave: None,
            on_enter: None,
            on_over: None,
            disable: false,
            drop_effect: DropEffect::Move,
        }
    }

    pub fn on_drop(
        mut self,
        callback: impl Fn(&DragEvent, Option<&T>, ElementId) + 'static,
    ) -> Self {
        self.on_drop = Some(Rc::new(callback));
        self
    }

    pub fn on_leave(
        mut self,
        callback: impl Fn(&DragEvent, Option<&T>, ElementId) + 'static,
    ) -> Self {
        self.on_leave = Some(Rc::new(callback));
        self
    }

    pub fn on_enter(
        mut self,
        callback: impl Fn(&DragEvent, Option<&T>, ElementId) + 'static,
    ) -> Self {
        self.on_enter = Some(Rc::new(callback));
        self
    }

    pub fn on_over(
        mut self,
        callback: impl Fn(&DragEvent, Option<&T>, ElementId) + 'static,
    ) -> Self {
        self.on_over = Some(Rc::new(callback));
        self
    }

    pub fn disable(mut self, disable: bool) -> Self {
        self.disable = disable;
        self
    }

    pub fn with_settings(mut self, settings: &DragSettings) -> Self {
        self.drop_effect = settings.drop_effect;
        self
    }
}

struct TargetHandlers<T> {
    scope: DndScope<T>,
    element: ElementId,
    accept: DragKind,
    drop_effect: DropEffect,
    depth: Rc<Cell<u32>>,
    trace_over: Rc<Cell<bool>>,
    on_drop: Option<TargetCallback<T>>,
    on_leave: Option<TargetCallback<T>>,
    on_enter: Option<TargetCallback<T>>,
    on_over: Option<TargetCallback<T>>,
}

impl<T: Clone> TargetHandlers<T> {
    fn accepted(&self, event: &DragEvent) -> bool {
        let accepted = self.scope.accepts(self.accept);
        if !accepted && event.kind != DragEventKind::DragOver {
            debug!(
                "{} ignored at {:?}: accept={:?} kind={:?}",
                event.kind.name(),
                self.element,
                self.accept,
                self.scope.kind()
            );
        }
        accepted
    }

    fn notify(&self, callback: &Option<TargetCallback<T>>, event: &DragEvent) {
        if let Some(callback) = callback {
            let item = self.scope.item();
            callback(event, item.as_ref(), self.element);
        }
    }

    fn drag_over(&self, event: &mut DragEvent) {
        if !self.accepted(event) {
            return;
        }
        event.stop_propagation();
        event.prevent_default();
        event.data_transfer.drop_effect = self.drop_effect;
        if self.trace_over.get() {
            trace!("dragover accepted at {:?}", self.element);
        }
        self.notify(&self.on_over, event);
    }

    fn drag_enter(&self, event: &mut DragEvent) {
        if !self.accepted(event) {
            return;
        }
        event.stop_propagation();
        event.prevent_default();
        let depth = self.depth.get() + 1;
        self.depth.set(depth);
        if depth == 1 {
            debug!("Drag entered {:?}", self.element);
            self.notify(&self.on_enter, event);
        }
    }

    fn drag_leave(&self, event: &mut DragEvent) {
        if !self.accepted(event) {
            return;
        }
        event.prevent_default();
        event.stop_propagation();
        let previous = self.depth.get();
        self.depth.set(previous.saturating_sub(1));
        if previous == 1 {
            debug!("Drag left {:?}", self.element);
            self.notify(&self.on_leave, event);
        }
    }

    fn drop_event(&self, event: &mut DragEvent) {
        if !self.accepted(event) {
            return;
        }
        self.scope.mark_dropped();
        event.prevent_default();
        event.stop_propagation();
        self.depth.set(0);
        debug!("Drop accepted at {:?}", self.element);
        self.notify(&self.on_drop, event);
    }
}

struct MountedTarget {
    document: Document,
    listeners: Vec<ListenerId>,
}

/// Binding that lets an element receive drags whose kind matches its filter.
///
/// Enter and leave events bubbling up from descendants are collapsed by a
/// per-target nesting counter, so callers see one logical enter and one
/// logical leave per crossing of the element's outer boundary.
pub struct DropTarget<T: Clone + 'static> {
    scope: DndScope<T>,
    config: DropTargetConfig<T>,
    element: ElementRef,
    depth: Rc<Cell<u32>>,
    trace_over: Rc<Cell<bool>>,
    mounted: Option<MountedTarget>,
}

impl<T: Clone + 'static> DropTarget<T> {
    pub fn new(scope: DndScope<T>, config: DropTargetConfig<T>) -> Self {
        Self {
            scope,
            config,
            element: ElementRef::new(),
            depth: Rc::new(Cell::new(0)),
            trace_over: Rc::new(Cell::new(false)),
            mounted: None,
        }
    }

    pub fn element_ref(&self) -> ElementRef {
        self.element.clone()
    }

    pub fn config(&self) -> &DropTargetConfig<T> {
        &self.config
    }

    /// Emit a trace event for every accepted drag-over (very chatty).
    ///
    /// The flag is shared with the mounted listeners, so it takes effect
    /// immediately, before or after `mount`.
    pub fn set_trace_over(&mut self, enabled: bool) {
        self.trace_over.set(enabled);
    }

    /// Current nesting depth of the drag inside this target's subtree.
    pub fn depth(&self) -> u32 {
        self.depth.get()
    }

    /// True while an accepted drag is inside the target.
    pub fn is_over(&self) -> bool {
        self.depth() > 0
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Attach the enter/leave/over/drop listeners to the bound element.
    pub fn mount(&mut self, document: &Document) {
        if self.mounted.is_some() {
            return;
        }
        if self.config.disable {
            debug!("Drop target accept={:?} disabled; not binding", self.config.accept);
            return;
        }
        let Some(element) = self.element.get().filter(|id| document.contains(*id)) else {
            debug!("Drop target accept={:?} has no element to bind", self.config.accept);
            return;
        };

        let handlers = Rc::new(TargetHandlers {
            scope: self.scope.clone(),
            element,
            accept: self.config.accept,
            drop_effect: self.config.drop_effect,
            depth: Rc::clone(&self.depth),
            trace_over: Rc::clone(&self.trace_over),
            on_drop: self.config.on_drop.clone(),
            on_leave: self.config.on_leave.clone(),
            on_enter: self.config.on_enter.clone(),
            on_over: self.config.on_over.clone(),
        });

        let listener = |handle: fn(&TargetHandlers<T>, &mut DragEvent)| -> Listener {
            let handlers = Rc::clone(&handlers);
            Rc::new(move |event: &mut DragEvent| handle(&*handlers, event))
        };
        let bindings = [
            (DragEventKind::DragOver, listener(TargetHandlers::drag_over)),
            (DragEventKind::DragEnter, listener(TargetHandlers::drag_enter)),
            (DragEventKind::DragLeave, listener(TargetHandlers::drag_leave)),
            (DragEventKind::Drop, listener(TargetHandlers::drop_event)),
        ];
        let listeners = bindings
            .into_iter()
            .filter_map(|(kind, listener)| document.add_listener(element, kind, listener).ok())
            .collect();
        self.mounted = Some(MountedTarget {
            document: document.clone(),
            listeners,
        });
        debug!("Drop target accept={:?} bound to {:?}", self.config.accept, element);
    }

    /// Detach all listeners. The shared context is left untouched.
    pub fn unmount(&mut self) {
        let Some(mounted) = self.mounted.take() else {
            return;
        };
        for id in mounted.listeners {
            mounted.document.remove_listener(id);
        }
        self.depth.set(0);
    }
}

impl<T: Clone + 'static> Drop for DropTarget<T> {
    fn drop(&mut self) {
        self.unmount();
    }
}
