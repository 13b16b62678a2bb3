//! Device configuration.
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables (`QSV_*`, `RUST_LOG`)
//! 2. Configuration file (YAML)
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{DeviceError, DeviceResult};
use crate::logging::LoggingConfig;

/// Hard limit on register size.
pub const MAX_SUPPORTED_WIRES: usize = qsv_core::statevector::MAX_WIRES;

/// Settings for a [`crate::Device`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Shots for sampled read-out. `None` means analytic only.
    #[serde(default)]
    pub shots: Option<u32>,

    /// Seed for the sampling RNG. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Reject non-unitary matrices and non-normalized state vectors.
    #[serde(default)]
    pub strict: bool,

    /// Tolerance for strict checks.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Largest register a device may be created with.
    #[serde(default = "default_max_wires")]
    pub max_wires: usize,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_tolerance() -> f64 {
    1e-8
}

fn default_max_wires() -> usize {
    24
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            shots: None,
            seed: None,
            strict: false,
            tolerance: default_tolerance(),
            max_wires: default_max_wires(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DeviceConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> DeviceResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml(contents: &str) -> DeviceResult<Self> {
        let config: DeviceConfig = serde_yaml_ng::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by environment variables.
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&str>) -> DeviceResult<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => DeviceConfig::default(),
        };
        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    fn merge_env(self) -> Self {
        self.merge_with(|key| std::env::var(key).ok())
    }

    /// Overlay variables returned by `lookup`. Unset or unparsable values
    /// leave the field unchanged.
    pub(crate) fn merge_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("QSV_SHOTS") {
            if let Ok(val) = v.parse() {
                self.shots = Some(val);
            }
        }
        if let Some(v) = lookup("QSV_SEED") {
            if let Ok(val) = v.parse() {
                self.seed = Some(val);
            }
        }
        if let Some(v) = lookup("QSV_STRICT") {
            self.strict = matches!(v.as_str(), "1" | "true" | "yes");
        }
        if let Some(v) = lookup("QSV_TOLERANCE") {
            if let Ok(val) = v.parse() {
                self.tolerance = val;
            }
        }
        if let Some(v) = lookup("QSV_MAX_WIRES") {
            if let Ok(val) = v.parse() {
                self.max_wires = val;
            }
        }
        self.logging.apply_overrides(&lookup);
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> DeviceResult<()> {
        if self.shots == Some(0) {
            return Err(DeviceError::InvalidShots(
                "shots must be positive when set".to_string(),
            ));
        }
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(DeviceError::Config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_wires > MAX_SUPPORTED_WIRES {
            return Err(DeviceError::Config(format!(
                "max_wires cannot exceed {MAX_SUPPORTED_WIRES}, got {}",
                self.max_wires
            )));
        }
        Ok(())
    }

    /// Set the number of shots.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = Some(shots);
        self
    }

    /// Set the sampling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable strict unitarity and normalization checks.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}
