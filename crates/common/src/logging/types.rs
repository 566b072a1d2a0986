//! Configuration types for the logging subsystem.

use std::path::PathBuf;

use anchor_config::LoggingConfig;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::fmt::format::FmtSpan;

use super::format_service_name;

/// Default file name prefix when file logging is enabled without one.
const DEFAULT_LOG_FILE_PREFIX: &str = "anchor";

/// Configuration for the stdout/stderr logging layer
#[derive(Debug, Clone)]
pub struct StdoutConfig {
    /// Use JSON format instead of compact format
    pub json_format: bool,
    /// Span events to log (ENTER, EXIT, CLOSE, etc.)
    pub fmt_span: FmtSpan,
}

impl Default for StdoutConfig {
    fn default() -> Self {
        Self {
            json_format: false,
            // Log CLOSE events to capture span duration
            fmt_span: FmtSpan::CLOSE,
        }
    }
}

/// Configuration for file-based logging with rotation
#[derive(Debug, Clone)]
pub struct FileLoggingConfig {
    /// Directory where log files will be written
    pub directory: PathBuf,
    /// Base filename prefix (e.g., "anchor" -> "anchor.2024-01-01")
    pub file_name_prefix: String,
    /// Rotation strategy
    pub rotation: Rotation,
    /// Use JSON format for file logs (default: false, uses compact)
    pub json_format: bool,
}

impl FileLoggingConfig {
    pub fn new(directory: PathBuf, file_name_prefix: String) -> Self {
        Self {
            directory,
            file_name_prefix,
            rotation: Rotation::DAILY,
            json_format: false,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_json_format(mut self, json_format: bool) -> Self {
        self.json_format = json_format;
        self
    }
}

/// Main logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Service name reported in the startup line
    pub service_name: String,
    /// Stdout logging configuration
    pub stdout_config: StdoutConfig,
    /// File logging configuration (optional)
    pub file_logging_config: Option<FileLoggingConfig>,
}

impl LoggerConfig {
    /// Creates a new configuration with service name
    pub fn new(service_name: String) -> Self {
        Self {
            service_name,
            stdout_config: StdoutConfig::default(),
            file_logging_config: None,
        }
    }

    /// Builds a logger config from the `[logging]` section of the node config.
    ///
    /// File logging is enabled iff `log_dir` is set. The JSON flag applies to
    /// both stdout and file output.
    pub fn from_logging_config(base_name: &str, cfg: &LoggingConfig) -> Self {
        let json = cfg.json_format.unwrap_or(false);
        let service_name = format_service_name(base_name, cfg.service_label.as_deref());
        let mut config = Self::new(service_name).with_json_logging(json);

        if let Some(dir) = &cfg.log_dir {
            let prefix = cfg
                .log_file_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_FILE_PREFIX.to_owned());
            config = config
                .with_file_logging(FileLoggingConfig::new(dir.clone(), prefix).with_json_format(json));
        }

        config
    }

    /// Enable JSON logging format
    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.stdout_config.json_format = enabled;
        self
    }

    /// Enable file logging with configuration
    pub fn with_file_logging(mut self, config: FileLoggingConfig) -> Self {
        self.file_logging_config = Some(config);
        self
    }

    /// Configure which span events to log
    pub fn with_fmt_span(mut self, fmt_span: FmtSpan) -> Self {
        self.stdout_config.fmt_span = fmt_span;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new("(anchor-service)".to_string())
    }
}
