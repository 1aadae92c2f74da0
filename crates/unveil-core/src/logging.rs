//! Tracing subscriber setup.
//!
//! The full-screen player owns the terminal, so it logs to a daily file under
//! the configured directory. Headless commands log to stderr. `UNVEIL_LOG`
//! overrides the configured level with any `EnvFilter` directive.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV: &str = "UNVEIL_LOG";
const LOG_FILE_PREFIX: &str = "unveil.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Daily-rolling file in this directory.
    File(PathBuf),
}

/// Keeps the background log writer alive; drop it last.
#[must_use = "logs are lost when the guard is dropped"]
#[derive(Debug)]
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

/// Builds the filter from `UNVEIL_LOG` (if set) or `level`.
///
/// # Errors
/// Returns an error if the chosen directive does not parse.
pub fn build_filter(level: &str, env_override: Option<&str>) -> Result<EnvFilter> {
    let directive = env_override
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(level);
    EnvFilter::try_new(directive).with_context(|| format!("Invalid log filter '{directive}'"))
}

/// Installs the global subscriber.
///
/// # Errors
/// Returns an error if the filter is invalid, the log directory cannot be
/// created, or a subscriber is already installed.
pub fn init(level: &str, target: LogTarget) -> Result<LogGuard> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(level, env.as_deref())?;

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr).with_target(false))
                .try_init()
                .context("Failed to install log subscriber")?;
            Ok(LogGuard { _worker: None })
        }
        LogTarget::File(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()
                .context("Failed to install log subscriber")?;
            tracing::debug!(dir = %dir.display(), "file logging enabled");
            Ok(LogGuard {
                _worker: Some(guard),
            })
        }
    }
}
