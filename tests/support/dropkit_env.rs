use std::{
    ffi::OsString,
    path::PathBuf,
    sync::{Mutex, MutexGuard},
};

use dropkit::app_dirs::CONFIG_HOME_ENV;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes every test that touches process environment variables.
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|err| err.into_inner())
}

/// `DROPKIT_CONFIG_HOME` pointed at a path, put back as it was on drop.
///
/// Callers must hold [`env_lock`] for the value's whole lifetime.
pub struct ConfigHome {
    saved: Option<OsString>,
}

impl ConfigHome {
    pub fn point_at(path: PathBuf) -> Self {
        let saved = std::env::var_os(CONFIG_HOME_ENV);
        write_config_home(Some(path.into_os_string()));
        Self { saved }
    }
}

impl Drop for ConfigHome {
    fn drop(&mut self) {
        write_config_home(self.saved.take());
    }
}

fn write_config_home(value: Option<OsString>) {
    // SAFETY: only reached through `ConfigHome`, whose owners hold `ENV_LOCK`.
    unsafe {
        if let Some(value) = value {
            std::env::set_var(CONFIG_HOME_ENV, value);
        } else {
            std::env::remove_var(CONFIG_HOME_ENV);
        }
    }
}

/// Points `DROPKIT_CONFIG_HOME` at a test directory for the guard's lifetime.
pub struct DropkitEnvGuard {
    // Declared first so the variable is restored before the lock is released.
    _home: ConfigHome,
    _lock: MutexGuard<'static, ()>,
}

impl DropkitEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        let lock = env_lock();
        Self {
            _home: ConfigHome::point_at(path),
            _lock: lock,
        }
    }
}
