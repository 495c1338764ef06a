use crate::core::error::PxError;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter,
    filter::{self, LevelFilter},
    fmt,
    prelude::*,
};

/// Target for request/response dumps; routed to `api.log` only.
pub const API_TARGET: &str = "api";

const MAX_LOG_FILES: usize = 5;

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub dir: PathBuf,
    /// Used when RUST_LOG is unset
    pub default_filter: String,
}

/// Install the global subscriber: `debug.log` for everything but the API
/// dumps, `api.log` for those, and warnings on stderr.
///
/// `RUST_LOG` (or the configured level) only filters `debug.log`; request and
/// response dumps are always written to `api.log`.
pub fn init_tracing(settings: &LogSettings) -> Result<(), PxError> {
    std::fs::create_dir_all(&settings.dir)?;

    let debug_file = rolling_appender(settings, "debug")?;
    let api_file = rolling_appender(settings, "api")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.default_filter))
        .map_err(|e| PxError::Config(format!("invalid log filter: {}", e)))?;

    let debug_layer = fmt::Layer::new()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter)
        .with_filter(filter::filter_fn(|meta| meta.target() != API_TARGET));

    let api_layer = fmt::Layer::new()
        .with_writer(api_file)
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .with_filter(filter::filter_fn(|meta| {
            meta.target() == API_TARGET && *meta.level() <= Level::DEBUG
        }));

    let stderr_layer = fmt::Layer::new()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(LevelFilter::from_level(Level::WARN))
        .with_filter(filter::filter_fn(|meta| meta.target() != API_TARGET));

    tracing_subscriber::registry()
        .with(debug_layer)
        .with(api_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| PxError::Config(format!("failed to install logger: {}", e)))?;

    tracing::debug!(
        path = %settings.dir.display(),
        "Tracing initialized with file output. Filter configured via RUST_LOG env var."
    );
    Ok(())
}

fn rolling_appender(settings: &LogSettings, name: &str) -> Result<RollingFileAppender, PxError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(name)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(&settings.dir)
        .map_err(|e| PxError::Config(format!("cannot open log file in {}: {}", settings.dir.display(), e)))
}
