//! Logging setup: tracing events go to a log file, never to the terminal.
//!
//! ## Filter priority
//!
//! 1. **`PTE_LOG`**
//! 2. **`RUST_LOG`**
//! 3. `log.level` from the config file (default `info`)
//!
//! ## Log file location
//!
//! Default: `$XDG_DATA_HOME/pte/log/log.txt`, else `<data_local_dir>/pte/log/log.txt`.
//! Override with `--log-file <path>`.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const LOG_FILE_NAME: &str = "log.txt";

/// Returned from [`init`]; must be held alive so buffered lines get flushed.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

pub struct LogConfig {
    /// Explicit log file, e.g. from `--log-file`
    pub log_file_path: Option<PathBuf>,
    /// Filter used when neither `PTE_LOG` nor `RUST_LOG` is set
    pub default_level: String,
}

/// Install the global subscriber writing to the log file
pub fn init(config: LogConfig) -> anyhow::Result<LogGuard> {
    let log_file = resolve_log_path(config.log_file_path);
    let log_dir = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let filename = log_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| LOG_FILE_NAME.to_string());

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory '{}'", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer().with_writer(non_blocking_file).with_ansi(false);

    Registry::default()
        .with(create_filter(&config.default_level))
        .with(file_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

fn create_filter(default_level: &str) -> EnvFilter {
    let directives = env::var("PTE_LOG")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_level.to_string());

    EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Warning: Invalid log filter '{}': {}", directives, e);
        EnvFilter::new("info")
    })
}

fn resolve_log_path(override_path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = override_path {
        return path;
    }
    default_log_dir().join(LOG_FILE_NAME)
}

fn default_log_dir() -> PathBuf {
    env::var_os("XDG_DATA_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pte")
        .join("log")
}
