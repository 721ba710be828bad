//! Resolution of the `.dropkit` application folder.
//!
//! Settings and log files share one root. It sits under the OS config
//! directory unless `DROPKIT_CONFIG_HOME` names another base, which portable
//! installs and integration tests use.

use std::{
    path::{Path, PathBuf},
    sync::{LazyLock, Mutex},
};

use directories::BaseDirs;
use thiserror::Error;
use tracing::debug;

/// Folder created under the chosen base directory.
pub const APP_DIR_NAME: &str = ".dropkit";
/// Environment variable that replaces the OS config directory as the base.
pub const CONFIG_HOME_ENV: &str = "DROPKIT_CONFIG_HOME";
const LOGS_DIR_NAME: &str = "logs";

static CONFIG_BASE_OVERRIDE: LazyLock<Mutex<Option<PathBuf>>> = LazyLock::new(|| Mutex::new(None));

#[derive(Debug, Error)]
pub enum AppDirError {
    /// Neither the override nor the OS provided a base directory.
    #[error("No base directory available for dropkit files")]
    NoBaseDir,
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Which rule picked the base directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaseSource {
    /// In-process override installed by unit tests.
    Override,
    /// `DROPKIT_CONFIG_HOME`.
    Env,
    /// The platform config directory.
    Os,
}

/// The application root, created on resolution.
#[derive(Clone, Debug)]
pub struct AppDirs {
    root: PathBuf,
    source: BaseSource,
}

impl AppDirs {
    /// Resolve the base (override, then env, then OS) and create the root.
    pub fn resolve() -> Result<Self, AppDirError> {
        let (base, source) = config_base_dir().ok_or(AppDirError::NoBaseDir)?;
        let root = base.join(APP_DIR_NAME);
        ensure_dir(&root)?;
        debug!("Application root {} ({:?})", root.display(), source);
        Ok(Self { root, source })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source(&self) -> BaseSource {
        self.source
    }

    /// `<root>/logs`, created if missing.
    pub fn logs(&self) -> Result<PathBuf, AppDirError> {
        let path = self.root.join(LOGS_DIR_NAME);
        ensure_dir(&path)?;
        Ok(path)
    }
}

fn ensure_dir(path: &Path) -> Result<(), AppDirError> {
    std::fs::create_dir_all(path).map_err(|source| AppDirError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

fn config_base_dir() -> Option<(PathBuf, BaseSource)> {
    let overridden = CONFIG_BASE_OVERRIDE
        .lock()
        .ok()
        .and_then(|guard| guard.clone());
    if let Some(path) = overridden {
        return Some((path, BaseSource::Override));
    }
    // An empty value counts as unset so `DROPKIT_CONFIG_HOME=` restores the default.
    if let Some(path) = std::env::var_os(CONFIG_HOME_ENV).filter(|value| !value.is_empty()) {
        return Some((PathBuf::from(path), BaseSource::Env));
    }
    BaseDirs::new().map(|dirs| (dirs.config_dir().to_path_buf(), BaseSource::Os))
}

#[cfg(test)]
static OVERRIDE_TEST_LOCK: Mutex<()> = Mutex::new(());

/// Point the config base at `path` for the lifetime of the guard.
///
/// Guards serialize on a test-wide lock so parallel tests never observe each
/// other's override.
#[cfg(test)]
pub(crate) struct ConfigBaseGuard {
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[cfg(test)]
impl ConfigBaseGuard {
    pub(crate) fn set(path: PathBuf) -> Self {
        let lock = OVERRIDE_TEST_LOCK
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        *CONFIG_BASE_OVERRIDE
            .lock()
            .unwrap_or_else(|err| err.into_inner()) = Some(path);
        Self { _lock: lock }
    }
}

#[cfg(test)]
impl Drop for ConfigBaseGuard {
    fn drop(&mut self) {
        *CONFIG_BASE_OVERRIDE
            .lock()
            .unwrap_or_else(|err| err.into_inner()) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn override_wins_and_root_is_created() {
        let base = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(base.path().to_path_buf());

        let dirs = AppDirs::resolve().unwrap();

        assert_eq!(dirs.root(), base.path().join(APP_DIR_NAME));
        assert_eq!(dirs.source(), BaseSource::Override);
        assert!(dirs.root().is_dir());
    }

    #[test]
    fn logs_dir_nests_under_root() {
        let base = tempdir().unwrap();
        let _guard = ConfigBaseGuard::set(base.path().to_path_buf());

        let logs = AppDirs::resolve().unwrap().logs().unwrap();

        assert_eq!(logs, base.path().join(APP_DIR_NAME).join("logs"));
        assert!(logs.is_dir());
    }

    #[test]
    fn unwritable_base_reports_the_failing_path() {
        let base = tempdir().unwrap();
        let blocker = base.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();
        let _guard = ConfigBaseGuard::set(blocker.clone());

        match AppDirs::resolve() {
            Err(AppDirError::CreateDir { path, .. }) => {
                assert_eq!(path, blocker.join(APP_DIR_NAME))
            }
            other => panic!("expected CreateDir, got {other:?}"),
        }
    }
}
