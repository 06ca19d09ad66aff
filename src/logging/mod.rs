use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::config::Config;

const LOG_FILE_NAME: &str = "volume-bridge.log";

/// Logging configuration
///
/// Console output always goes to stderr: stdout carries the bridge protocol.
pub struct LoggingConfig {
    pub level: Level,
    pub file_output: bool,
    pub log_dir: Option<PathBuf>,
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            file_output: false,
            log_dir: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// `verbose` forces debug level regardless of the configured one
    pub fn from_config(config: &Config, verbose: bool) -> Result<Self> {
        let level = if verbose {
            Level::DEBUG
        } else {
            Level::from_str(&config.general.log_level).with_context(|| {
                format!("Invalid log level: {}", config.general.log_level)
            })?
        };

        Ok(Self {
            level,
            file_output: config.logging.file_output,
            log_dir: config.logging.log_dir.clone(),
            json_format: config.logging.json_format,
        })
    }
}

/// Initialize logging with stderr output and optional daily-rotated files
///
/// Returns the file writer guard (keep it alive for the process lifetime)
/// and the log directory when file output is enabled.
pub fn initialize_logging(config: LoggingConfig) -> Result<(Option<WorkerGuard>, Option<PathBuf>)> {
    let mut layers = Vec::new();
    let mut guard = None;

    let env_filter = EnvFilter::new(format!(
        "volume_bridge={}",
        config.level.as_str().to_lowercase()
    ));

    let console_layer = if config.json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(std::io::stderr)
            .boxed()
    };
    layers.push(console_layer);

    let log_dir = if config.file_output {
        let dir = match config.log_dir.clone() {
            Some(dir) => dir,
            None => get_default_log_dir()?,
        };

        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

        let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE_NAME);
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker_guard);

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(non_blocking)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed()
        };
        layers.push(file_layer);

        Some(dir)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .init();

    Ok((guard, log_dir))
}

pub fn get_default_log_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir().context("Failed to get local data directory")?;
    Ok(data_dir.join("volume-bridge/logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_config() {
        let mut config = Config::default();
        config.general.log_level = "warn".to_string();

        let logging = LoggingConfig::from_config(&config, false).unwrap();
        assert_eq!(logging.level, Level::WARN);
        assert!(!logging.file_output);
    }

    #[test]
    fn test_verbose_overrides_level() {
        let mut config = Config::default();
        config.general.log_level = "error".to_string();

        let logging = LoggingConfig::from_config(&config, true).unwrap();
        assert_eq!(logging.level, Level::DEBUG);
    }

    #[test]
    fn test_unknown_level_is_an_error() {
        let mut config = Config::default();
        config.general.log_level = "chatty".to_string();
        assert!(LoggingConfig::from_config(&config, false).is_err());
    }
}
