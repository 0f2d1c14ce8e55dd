//! Serializable logger configuration

use super::{logger::LoggerBuilder, output_format::OutputFormat, timestamp::TimestampFormat};
use crate::handlers::RotationPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Logger settings in a form that can live in a config file
///
/// Missing fields take their defaults, so `{}` is a valid configuration
/// (console output at INFO).
///
/// # Example
///
/// ```
/// use fanout_logger::{LoggerBuilder, LoggerConfig};
///
/// let config: LoggerConfig =
///     serde_json::from_str(r#"{ "level": "debug", "console": false }"#).unwrap();
/// let logger = LoggerBuilder::from_config(&config).build().unwrap();
/// assert_eq!(logger.level(), fanout_logger::Level::DEBUG);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub console: bool,
    pub console_colors: bool,
    /// Minimum level name; unknown names leave INFO in place
    pub level: Option<String>,
    pub timestamp_format: TimestampFormat,
    pub output_format: OutputFormat,
    pub file: Option<FileConfig>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            console_colors: false,
            level: None,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
            file: None,
        }
    }
}

/// Rotating file backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub path: PathBuf,
    pub max_size_mb: u64,
    pub max_backups: usize,
    /// Zero keeps backups regardless of age
    pub max_age_days: u64,
    pub compress: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("app.log"),
            max_size_mb: 100,
            max_backups: 5,
            max_age_days: 0,
            compress: false,
        }
    }
}

impl FileConfig {
    pub fn policy(&self) -> RotationPolicy {
        let policy = RotationPolicy::new()
            .with_max_size_mb(self.max_size_mb)
            .with_max_backups(self.max_backups)
            .with_compression(self.compress);
        if self.max_age_days > 0 {
            policy.with_max_age(Duration::from_secs(self.max_age_days * 24 * 60 * 60))
        } else {
            policy
        }
    }
}

impl LoggerBuilder {
    /// Start a builder from a [`LoggerConfig`]; further options can follow
    #[must_use]
    pub fn from_config(config: &LoggerConfig) -> Self {
        let mut builder = LoggerBuilder::new()
            .console(config.console)
            .console_colors(config.console_colors)
            .timestamp_format(config.timestamp_format.clone())
            .output_format(config.output_format);

        if let Some(ref level) = config.level {
            builder = builder.level(level);
        }
        if let Some(ref file) = config.file {
            builder = builder.file(file.path.clone(), file.policy());
        }
        builder
    }
}
