//! Structured logging setup.

use std::env;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const TRACE_ENV: &str = "BENCHTAB_TRACE";
pub const FORMAT_ENV: &str = "BENCHTAB_LOG_FORMAT";
pub const FILE_ENV: &str = "BENCHTAB_LOG_FILE";

/// Errors raised while installing the subscriber.
#[derive(Debug)]
pub enum LoggingError {
    InvalidFilter {
        filter: String,
        message: String,
    },
    InvalidFormat(String),
    LogFile {
        path: PathBuf,
        source: io::Error,
    },
    Init(String),
}

impl LoggingError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            LoggingError::InvalidFilter { .. } => "LOG_FILTER",
            LoggingError::InvalidFormat(_) => "LOG_FORMAT",
            LoggingError::LogFile { .. } => "LOG_FILE",
            LoggingError::Init(_) => "LOG_INIT",
        }
    }
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::InvalidFilter { filter, message } => write!(
                f,
                "[{}] Invalid log filter '{}': {}",
                self.code(),
                filter,
                message
            ),
            LoggingError::InvalidFormat(format) => write!(
                f,
                "[{}] Invalid {FORMAT_ENV} '{}' (expected 'json' or 'pretty')",
                self.code(),
                format
            ),
            LoggingError::LogFile { path, source } => write!(
                f,
                "[{}] Failed to open log file {}: {}",
                self.code(),
                path.display(),
                source
            ),
            LoggingError::Init(message) => {
                write!(f, "[{}] Failed to initialize logging: {}", self.code(), message)
            }
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggingError::LogFile { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Result<Self, LoggingError> {
        if value.eq_ignore_ascii_case("pretty") {
            Ok(LogFormat::Pretty)
        } else if value.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Err(LoggingError::InvalidFormat(value.to_string()))
        }
    }
}

/// Filter directive: `debug` when forced, else the environment value, else `off`.
pub fn resolve_level(debug: bool, from_env: Option<String>) -> String {
    if debug {
        return "debug".to_string();
    }
    from_env.unwrap_or_else(|| "off".to_string())
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if level.eq_ignore_ascii_case("off") {
        return Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()));
    }
    EnvFilter::try_new(level).map_err(|err| LoggingError::InvalidFilter {
        filter: level.to_string(),
        message: err.to_string(),
    })
}

fn open_log_file(path: &str) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::LogFile {
            path: PathBuf::from(path),
            source,
        })
}

fn map_init_err<E: std::fmt::Display>(err: E) -> LoggingError {
    LoggingError::Init(err.to_string())
}

/// Install the global subscriber.
///
/// Returns `false` without touching anything when a subscriber is already set.
pub fn init_logging(debug: bool) -> Result<bool, LoggingError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let filter = build_filter(&resolve_level(debug, env::var(TRACE_ENV).ok()))?;
    let format = LogFormat::parse(&env::var(FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string()))?;
    let log_file = env::var(FILE_ENV).ok().map(|path| open_log_file(&path)).transpose()?;

    match format {
        LogFormat::Json => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .json();
            let base = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer);
            if let Some(file) = log_file {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .json();
                base.with(file_layer).try_init().map_err(map_init_err)?;
            } else {
                base.try_init().map_err(map_init_err)?;
            }
        }
        LogFormat::Pretty => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .pretty();
            let base = tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer);
            if let Some(file) = log_file {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .pretty();
                base.with(file_layer).try_init().map_err(map_init_err)?;
            } else {
                base.try_init().map_err(map_init_err)?;
            }
        }
    }

    Ok(true)
}
