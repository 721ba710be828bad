//! Library exports for reuse in benchmarks, tests, and the demo binary.
/// Application directory resolution.
pub mod app_dirs;
/// Persisted drag and panel settings.
pub mod config;
/// Demo window exercising the drag-and-drop runtime.
pub mod demo;
/// Drag context, sources, and drop targets.
pub mod dnd;
/// Pointer sampling that turns egui input into host drag events.
pub mod egui_host;
/// Headless element tree with drag event dispatch.
pub mod host;
/// Tracing setup for stdout and rolling log files.
pub mod logging;
/// Floating panels moved by their header strip.
pub mod panel;
