use crate::config::LogConfig;
use crate::error::{AppError, ConfigError, Result};
use crate::progress;
use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, fmt::MakeWriter, layer::SubscriberExt, Layer, Registry};

#[derive(Debug)]
pub struct LoggerConfig {
    pub directory: String,
    pub file_name: String,
    pub max_bytes: u64,
    pub backups: usize,
    pub level: Level,
}

impl TryFrom<&LogConfig> for LoggerConfig {
    type Error = AppError;

    fn try_from(config: &LogConfig) -> Result<Self> {
        Ok(Self {
            directory: config.directory.clone(),
            file_name: config.filename.clone(),
            max_bytes: config.max_bytes,
            backups: config.backups,
            level: parse_log_level(&config.level)?,
        })
    }
}

/// Installs the global subscriber. Keep the returned guard alive until exit,
/// dropping it flushes the file writer.
pub fn init_logging(config: LoggerConfig) -> Result<WorkerGuard> {
    fs::create_dir_all(&config.directory).map_err(|e| {
        AppError::Config(ConfigError::FileRead(io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to create log directory: {}", e),
        )))
    })?;

    let (file_writer, guard) = tracing_appender::non_blocking(open_log_file(&config)?);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_filter(tracing::level_filters::LevelFilter::from_level(
            config.level,
        ));

    // stdout carries scrape results, so console logs go to stderr
    let stderr_layer = fmt::layer()
        .with_writer(ConsoleWriter)
        .with_target(false)
        .with_level(true)
        .with_ansi(true)
        .with_filter(tracing::level_filters::LevelFilter::from_level(
            config.level,
        ));

    let subscriber = Registry::default().with(file_layer).with(stderr_layer);

    tracing::subscriber::set_global_default(subscriber).map_err(|e| {
        AppError::Config(ConfigError::InvalidValue(format!(
            "Failed to set global subscriber: {}",
            e
        )))
    })?;

    Ok(guard)
}

pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(AppError::Config(ConfigError::InvalidValue(format!(
            "Invalid log level: {}",
            level
        )))),
    }
}

/// Opens `parser.log` behind a size-rolling appender: once it reaches
/// `max_bytes` it becomes `parser.log.1`, older files shift up and only
/// `backups` of them are kept.
pub fn open_log_file(config: &LoggerConfig) -> Result<BasicRollingFileAppender> {
    let log_path = Path::new(&config.directory).join(&config.file_name);
    let condition = RollingConditionBasic::new().max_size(config.max_bytes);
    Ok(BasicRollingFileAppender::new(
        log_path,
        condition,
        config.backups,
    )?)
}

const CLEAR_LINE: &[u8] = b"\r\x1b[2K";

/// Stderr for the console layer. Wipes a half-drawn progress bar first so a
/// record never lands in the middle of it; the bar redraws on its next step.
struct ConsoleWriter;

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = io::StderrLock<'static>;

    fn make_writer(&'a self) -> Self::Writer {
        let mut stderr = io::stderr().lock();
        if progress::line_active() {
            let _ = stderr.write_all(CLEAR_LINE);
        }
        stderr
    }
}

// Helper macros for consistent logging with error handling
#[macro_export]
macro_rules! log_error {
    // Handle AppError values
    ($err:expr => $($arg:tt)*) => {{
        let err: &$crate::error::AppError = &$err;
        tracing::error!(error = %err, kind = err.kind(), $($arg)*)
    }};
    // Handle regular string messages
    ($($arg:tt)*) => {
        tracing::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}
