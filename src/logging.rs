//! Structured logging setup.
//!
//! Filter precedence: `--log-level`, then `MDA_LOG`, then `RUST_LOG`, then
//! `info`. Batch commands log to stderr; the interactive UI logs to a file so
//! log lines never land on the alternate screen.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::AppError;

pub const DEFAULT_FILTER: &str = "info";
pub const TUI_LOG_FILE: &str = "mda.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: String,
    pub target: LogTarget,
}

impl LoggingConfig {
    pub fn new(cli_level: Option<&str>, mda_log: Option<&str>, target: LogTarget) -> Self {
        let rust_log = std::env::var("RUST_LOG").ok();
        Self {
            filter: resolve_filter(cli_level, mda_log, rust_log.as_deref()),
            target,
        }
    }
}

/// First non-blank of the candidates, else [`DEFAULT_FILTER`].
pub fn resolve_filter(cli_level: Option<&str>, mda_log: Option<&str>, rust_log: Option<&str>) -> String {
    [cli_level, mda_log, rust_log]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

/// Install the global subscriber. Calling it twice is harmless; the first
/// subscriber stays.
pub fn init(config: &LoggingConfig) -> Result<(), AppError> {
    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match &config.target {
        LogTarget::Stderr => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::io(format!("failed to open log file '{}'", path.display()), e))?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
        }
    };

    if let Err(err) = result {
        // The existing subscriber keeps receiving events.
        tracing::debug!(error = %err, "tracing subscriber already installed");
    }
    Ok(())
}
