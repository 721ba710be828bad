//! Drag-and-drop coordination between drag sources and drop targets.
//!
//! A [`DndScope`] owns the shared drag context. Sources publish the in-flight
//! drag into it on drag-start; targets read it on every native event to decide
//! whether to accept, and publish [`DragState::Dropped`] on drop. The source's
//! drag-end handler then picks between its cancel and completion callbacks and
//! resets the context.
//!
//! Lifecycle of the shared record:
//!
//! ```text
//! None ──start──▶ Dragging ──drop──▶ Dropped ──end──▶ Cancelled (reset)
//!                    └──────────end (no drop)───────▶ Cancelled (reset)
//! ```

mod context;
mod kind;
mod source;
mod state;
mod target;

pub use context::DndScope;
pub use kind::DragKind;
pub use source::{DragSource, DragSourceConfig, SourceCallback};
pub use state::{DragContextValue, DragState, DragTransition};
pub use target::{DropTarget, DropTargetConfig, TargetCallback};
