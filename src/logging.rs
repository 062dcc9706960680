//! File logging for the terminal front-end.
//!
//! The TUI owns stdout, so events go to a log file through a non-blocking
//! writer. Keep the returned guard alive for the whole process or buffered
//! lines are lost on exit.

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// Install the global subscriber. Returns `None` (logging disabled) when no
/// log path can be resolved or its directory cannot be created.
pub fn init(settings: &Settings) -> Option<WorkerGuard> {
    let path = settings.log_path()?;
    let dir = path.parent().filter(|d| !d.as_os_str().is_empty())?;
    let file_name = path.file_name()?;

    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("spindle: logging disabled, cannot create {}: {e}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(filter)
        .try_init();
    if installed.is_err() {
        // Someone else already set a global subscriber.
        return None;
    }

    Some(guard)
}
