//! Persisted settings for drag defaults and panel behaviour.

mod defaults;
mod errors;
mod io;
mod types;

pub use errors::ConfigError;
pub use io::{CONFIG_FILE_NAME, config_path, load_from, load_or_default, save, save_to_path};
pub use types::{DndSettings, DragSettings, PanelSettings};
