//! File logging setup.
//!
//! Log records go to a file through a non-blocking writer so console
//! output stays reserved for progress messages. `RUST_LOG` overrides the
//! configured level.

use std::fs;
use std::io;
use std::path::Path;

use time::format_description::well_known::Rfc3339;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Keeps the background log writer alive; drop it at exit to flush.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Fails if the log file's directory cannot be created, or if a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> io::Result<LoggingGuard> {
    let (directory, file_name) = split_log_path(&config.file)?;
    fs::create_dir_all(&directory)?;

    let appender = tracing_appender::rolling::never(&directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let timer = OffsetTime::local_rfc_3339()
        .unwrap_or_else(|_| OffsetTime::new(UtcOffset::UTC, Rfc3339));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_timer(timer)
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))?;

    Ok(LoggingGuard { _guard: guard })
}

fn split_log_path(path: &Path) -> io::Result<(std::path::PathBuf, std::ffi::OsString)> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log path has no file name: {}", path.display()),
        )
    })?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    Ok((directory, file_name.to_os_string()))
}
