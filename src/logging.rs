//! Tracing setup for the demo and for hosts embedding the runtime.
//!
//! Events go to stdout and to one file per launch under `<app root>/logs`.
//! `RUST_LOG` replaces the default `info` filter. With `trace_over_events`
//! enabled the drop-target module is raised to `trace` so per-frame
//! drag-over arbitration shows up without flooding everything else.

use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use time::{OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};
use tracing::info;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    EnvFilter, Registry,
    filter::{Directive, ParseError},
    fmt::{self, time::OffsetTime},
    prelude::*,
};

use crate::app_dirs::{AppDirError, AppDirs};
use crate::config::DragSettings;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";
/// Log files kept after pruning, including the current launch.
pub const MAX_LOG_FILES: usize = 10;
const LOG_FILE_PREFIX: &str = "dropkit_";
const OVER_EVENT_DIRECTIVE: &str = "dropkit::dnd::target=trace";

const FILE_STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
const LINE_STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The application or logs directory could not be resolved or created.
    #[error(transparent)]
    Dirs(#[from] AppDirError),
    /// A filesystem step on the log directory failed; `action` names it.
    #[error("Failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },
    /// The launch timestamp could not be rendered into a file name.
    #[error("Failed to format log file timestamp: {0}")]
    FormatTime(#[from] time::error::Format),
    /// A built-in filter directive failed to parse.
    #[error("Invalid log filter directive: {0}")]
    Filter(#[from] ParseError),
    /// Another global subscriber is already installed.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Where and how much to log.
#[derive(Clone, Debug)]
pub struct LogOptions {
    pub directory: PathBuf,
    pub max_files: usize,
    pub trace_over_events: bool,
}

impl LogOptions {
    /// Options for the standard logs folder, honouring the drag settings.
    pub fn from_settings(settings: &DragSettings) -> Result<Self, LoggingError> {
        Ok(Self {
            directory: AppDirs::resolve()?.logs()?,
            max_files: MAX_LOG_FILES,
            trace_over_events: settings.trace_over_events,
        })
    }
}

/// Install the global subscriber using the standard logs folder.
pub fn init(settings: &DragSettings) -> Result<Option<PathBuf>, LoggingError> {
    init_with(LogOptions::from_settings(settings)?)
}

/// Install the global subscriber.
///
/// Returns the new log file, or `None` when logging was already installed by
/// an earlier call.
pub fn init_with(options: LogOptions) -> Result<Option<PathBuf>, LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(None);
    }

    let file_name = log_file_name(now_local_or_utc())?;
    let log_path = options.directory.join(&file_name);
    create_log_file(&log_path)?;
    prune_old_logs(&options.directory, options.max_files)?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(rolling::never(&options.directory, &file_name));
    let timer = local_timer();
    let subscriber = Registry::default()
        .with(env_filter(options.trace_over_events)?)
        .with(
            fmt::layer()
                .with_timer(timer.clone())
                .with_writer(io::stdout),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = LOG_GUARD.set(guard);

    info!("Logging to {}", log_path.display());
    Ok(Some(log_path))
}

fn env_filter(trace_over_events: bool) -> Result<EnvFilter, LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if !trace_over_events {
        return Ok(filter);
    }
    let directive: Directive = OVER_EVENT_DIRECTIVE.parse()?;
    Ok(filter.add_directive(directive))
}

fn log_file_name(now: OffsetDateTime) -> Result<String, LoggingError> {
    Ok(format!("{LOG_FILE_PREFIX}{}.log", now.format(FILE_STAMP)?))
}

fn local_timer() -> OffsetTime<&'static [BorrowedFormatItem<'static>]> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, LINE_STAMP)
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn create_log_file(path: &Path) -> Result<(), LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(drop)
        .map_err(|source| LoggingError::Io {
            action: "create log file",
            path: path.to_path_buf(),
            source,
        })
}

fn is_own_log(path: &Path) -> bool {
    let name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
    name.starts_with(LOG_FILE_PREFIX) && name.ends_with(".log")
}

/// Delete the oldest `dropkit_*.log` files until at most `keep` remain.
///
/// Other files in the folder are never touched.
fn prune_old_logs(dir: &Path, keep: usize) -> Result<(), LoggingError> {
    let read_dir = fs::read_dir(dir).map_err(|source| LoggingError::Io {
        action: "read log directory",
        path: dir.to_path_buf(),
        source,
    })?;
    let mut logs: Vec<(SystemTime, PathBuf)> = read_dir
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_file()))
        .map(|entry| entry.path())
        .filter(|path| is_own_log(path))
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .collect();
    if logs.len() <= keep {
        return Ok(());
    }
    logs.sort();
    let excess = logs.len() - keep;
    for (_, path) in logs.drain(..excess) {
        fs::remove_file(&path).map_err(|source| LoggingError::Io {
            action: "remove old log file",
            path,
            source,
        })?;
    }
    Ok(())
}
