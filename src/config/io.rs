use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::app_dirs::{AppDirError, AppDirs};

use super::{ConfigError, DndSettings};

/// Default filename used to store settings.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dirs = AppDirs::resolve().map_err(map_app_dir_error)?;
    Ok(dirs.root().join(CONFIG_FILE_NAME))
}

/// Load settings from disk, returning defaults if the file is missing.
pub fn load_or_default() -> Result<DndSettings, ConfigError> {
    load_from(&config_path()?)
}

/// Load settings from `path`; missing keys fall back to their defaults.
pub fn load_from(path: &Path) -> Result<DndSettings, ConfigError> {
    if !path.exists() {
        return Ok(DndSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<DndSettings>(&text)
        .map(DndSettings::normalized)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
}

/// Persist settings to the default location.
pub fn save(settings: &DndSettings) -> Result<(), ConfigError> {
    save_to_path(settings, &config_path()?)
}

/// Write settings atomically so a crash never leaves a partial file.
pub fn save_to_path(settings: &DndSettings, path: &Path) -> Result<(), ConfigError> {
    let dir = path.parent().ok_or_else(|| ConfigError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other("config path has no parent directory"),
    })?;
    std::fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    let write_error = |source: std::io::Error| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(data.as_bytes()).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|err| write_error(err.error))?;
    info!("Saved settings to {}", path.display());
    Ok(())
}

fn map_app_dir_error(error: AppDirError) -> ConfigError {
    match error {
        AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        AppDirError::CreateDir { path, source } => ConfigError::CreateDir { path, source },
    }
}
