//! Error types for the device crate.

use qsv_core::SimError;
use thiserror::Error;

/// Errors that can occur while configuring or driving a device.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeviceError {
    /// An operation or read-out was rejected by the simulation core.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// The requested register is larger than the configured limit.
    #[error("Device supports at most {max} wires, requested {requested}")]
    TooManyWires {
        /// Number of wires requested.
        requested: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
}

impl DeviceError {
    /// The underlying core error, if this is one.
    pub fn as_sim(&self) -> Option<&SimError> {
        match self {
            DeviceError::Sim(e) => Some(e),
            _ => None,
        }
    }

    /// Whether a vector or matrix had the wrong size.
    pub fn is_dimension(&self) -> bool {
        self.as_sim().is_some_and(SimError::is_dimension)
    }

    /// Whether basis-state preparation came too late.
    pub fn is_operation_order(&self) -> bool {
        self.as_sim().is_some_and(SimError::is_operation_order)
    }

    /// Whether a named operation is not registered.
    pub fn is_unknown_operation(&self) -> bool {
        matches!(self, DeviceError::Sim(SimError::UnknownOperation(_)))
    }
}

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;
