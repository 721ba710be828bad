//! Headless element host supplying the native drag-event surface.
//!
//! Bindings attach listeners to elements of a [`Document`]; hosts (the egui
//! bridge, tests) feed events through [`Document::dispatch`], which bubbles
//! them from the target element towards the root.

mod document;
mod element_ref;
mod event;

pub use document::{Document, ElementId, HostError, Listener, ListenerId, WeakDocument};
pub use element_ref::ElementRef;
pub use event::{DataTransfer, DragEvent, DragEventKind, DragImage, DropEffect};
