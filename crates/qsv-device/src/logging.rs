//! Logging setup.
//!
//! Devices log through `tracing`; this module installs a subscriber for
//! applications that do not bring their own.

use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::error::{DeviceError, DeviceResult};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console output.
    #[default]
    Console,
    /// JSON structured logging.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (e.g. "info", "qsv_device=debug").
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Console,
        }
    }
}

impl LoggingConfig {
    /// Overlay `RUST_LOG` and `QSV_LOG_FORMAT` from `lookup`.
    pub(crate) fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("RUST_LOG") {
            self.level = level;
        }
        if let Some(format) = lookup("QSV_LOG_FORMAT") {
            self.format = match format.as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Console,
            };
        }
    }

    /// Logging configuration from environment variables.
    ///
    /// - `RUST_LOG`: filter directive (default: "info")
    /// - `QSV_LOG_FORMAT`: "console" or "json" (default: "console")
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(&|key| std::env::var(key).ok());
        config
    }
}

/// Install a global `tracing` subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> DeviceResult<()> {
    let env_filter = EnvFilter::try_new(&config.level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = match config.format {
        LogFormat::Console => fmt::layer().with_target(true).boxed(),
        LogFormat::Json => fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| DeviceError::Config(format!("tracing already initialized: {e}")))?;

    tracing::debug!(level = %config.level, format = ?config.format, "tracing initialized");
    Ok(())
}
