use std::rc::Rc;

use egui::Vec2;
use tracing::{debug, info};

use crate::config::DragSettings;
use crate::host::{
    Document, DragEvent, DragEventKind, DropEffect, ElementId, ElementRef, Listener, ListenerId,
    WeakDocument,
};

use super::{DndScope, DragKind, DragState};

/// Source lifecycle callback: `(event, item)`.
pub type SourceCallback<T> = Rc<dyn Fn(&DragEvent, Option<&T>)>;

/// Configuration for a [`DragSource`].
pub struct DragSourceConfig<T> {
    pub kind: DragKind,
    pub item: Option<T>,
    pub on_start: Option<SourceCallback<T>>,
    pub on_end: Option<SourceCallback<T>>,
    pub on_cancel: Option<SourceCallback<T>>,
    pub disable: bool,
    pub effect_allowed: DropEffect,
    pub preview_offset: Vec2,
}

impl<T> DragSourceConfig<T> {
    pub fn new(kind: DragKind) -> Self {
        Self {
            kind,
            item: None,
            on_start: None,
            on_end: None,
            on_cancel: None,
            disable: false,
            effect_allowed: DropEffect::Move,
            preview_offset: Vec2::ZERO,
        }
    }

    pub fn item(mut self, item: T) -> Self {
        self.item = Some(item);
        self
    }

    pub fn on_start(mut self, callback: impl Fn(&DragEvent, Option<&T>) + 'static) -> Self {
        self.on_start = Some(Rc::new(callback));
        self
    }

    pub fn on_end(mut self, callback: impl Fn(&DragEvent, Option<&T>) + 'static) -> Self {
        self.on_end = Some(Rc::new(callback));
        self
    }

    pub fn on_cancel(mut self, callback: impl Fn(&DragEvent, Option<&T>) + 'static) -> Self {
        self.on_cancel = Some(Rc::new(callback));
        self
    }

    pub fn disable(mut self, disable: bool) -> Self {
        self.disable = disable;
        self
    }

    /// Apply the configured effect and preview offset defaults.
    pub fn with_settings(mut self, settings: &DragSettings) -> Self {
        self.effect_allowed = settings.effect_allowed;
        self.preview_offset = settings.preview_vec();
        self
    }
}

/// Everything the native listeners capture when the source mounts.
struct SourceHandlers<T> {
    scope: DndScope<T>,
    element: ElementId,
    document: WeakDocument,
    preview: ElementRef,
    kind: DragKind,
    item: Option<T>,
    effect_allowed: DropEffect,
    preview_offset: Vec2,
    on_start: Option<SourceCallback<T>>,
    on_end: Option<SourceCallback<T>>,
    on_cancel: Option<SourceCallback<T>>,
}

impl<T: Clone> SourceHandlers<T> {
    fn drag_start(&self, event: &mut DragEvent) {
        event.stop_propagation();
        if let Some(document) = self.document.upgrade() {
            document.set_draggable(self.element, true);
        }
        event.data_transfer.effect_allowed = self.effect_allowed;
        self.scope.begin(self.kind, self.item.clone());
        if let Some(preview) = self.preview.get() {
            event
                .data_transfer
                .set_drag_image(preview, self.preview_offset);
        }
        if let Some(on_start) = &self.on_start {
            on_start(event, self.item.as_ref());
        }
    }

    fn drag_end(&self, event: &mut DragEvent) {
        event.prevent_default();
        event.stop_propagation();
        let dropped = self.scope.state() == DragState::Dropped;
        info!(
            "Drag finished kind={:?} element={:?} dropped={}",
            self.kind, self.element, dropped
        );
        if !dropped && let Some(on_cancel) = &self.on_cancel {
            on_cancel(event, self.item.as_ref());
        }
        if let Some(on_end) = &self.on_end {
            on_end(event, self.item.as_ref());
        }
        self.scope.reset();
    }
}

struct MountedSource {
    document: Document,
    element: ElementId,
    listeners: Vec<ListenerId>,
}

/// Binding that turns an element into the origin of drag gestures.
///
/// Listeners and the callbacks they call are captured once, when the binding
/// mounts. Changing the configuration afterwards has no effect until the
/// binding is re-created or remounted.
pub struct DragSource<T: Clone + 'static> {
    scope: DndScope<T>,
    config: DragSourceConfig<T>,
    element: ElementRef,
    preview: ElementRef,
    mounted: Option<MountedSource>,
}

impl<T: Clone + 'static> DragSource<T> {
    pub fn new(scope: DndScope<T>, config: DragSourceConfig<T>) -> Self {
        Self {
            scope,
            config,
            element: ElementRef::new(),
            preview: ElementRef::new(),
            mounted: None,
        }
    }

    /// Handle for the draggable element.
    pub fn element_ref(&self) -> ElementRef {
        self.element.clone()
    }

    /// Handle for an optional custom drag-image element.
    pub fn preview_ref(&self) -> ElementRef {
        self.preview.clone()
    }

    pub fn config(&self) -> &DragSourceConfig<T> {
        &self.config
    }

    /// Replace the configuration; live listeners keep the mount-time values.
    pub fn set_config(&mut self, config: DragSourceConfig<T>) {
        self.config = config;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Attach the native listeners to the bound element.
    ///
    /// No-op when disabled, already mounted, or when the element handle is
    /// empty or points at an element the document no longer has.
    pub fn mount(&mut self, document: &Document) {
        if self.mounted.is_some() {
            return;
        }
        if self.config.disable {
            debug!("Drag source kind={:?} disabled; not binding", self.config.kind);
            return;
        }
        let Some(element) = self.element.get().filter(|id| document.contains(*id)) else {
            debug!("Drag source kind={:?} has no element to bind", self.config.kind);
            return;
        };

        let handlers = Rc::new(SourceHandlers {
            scope: self.scope.clone(),
            element,
            document: document.downgrade(),
            preview: self.preview.clone(),
            kind: self.config.kind,
            item: self.config.item.clone(),
            effect_allowed: self.config.effect_allowed,
            preview_offset: self.config.preview_offset,
            on_start: self.config.on_start.clone(),
            on_end: self.config.on_end.clone(),
            on_cancel: self.config.on_cancel.clone(),
        });

        let start: Listener = {
            let handlers = Rc::clone(&handlers);
            Rc::new(move |event: &mut DragEvent| handlers.drag_start(event))
        };
        let end: Listener = Rc::new(move |event: &mut DragEvent| handlers.drag_end(event));

        let listeners = [(DragEventKind::DragStart, start), (DragEventKind::DragEnd, end)]
            .into_iter()
            .filter_map(|(kind, listener)| document.add_listener(element, kind, listener).ok())
            .collect();
        self.mounted = Some(MountedSource {
            document: document.clone(),
            element,
            listeners,
        });
        debug!("Drag source kind={:?} bound to {:?}", self.config.kind, element);
    }

    /// Detach listeners and reset the shared context.
    pub fn unmount(&mut self) {
        let Some(mounted) = self.mounted.take() else {
            return;
        };
        for id in mounted.listeners {
            mounted.document.remove_listener(id);
        }
        mounted.document.set_draggable(mounted.element, false);
        self.scope.reset();
        debug!("Drag source unbound from {:?}", mounted.element);
    }
}

impl<T: Clone + 'static> Drop for DragSource<T> {
    fn drop(&mut self) {
        self.unmount();
    }
}
