//! Error types for the simulation core.

use thiserror::Error;

use crate::wire::Wire;

/// Errors produced while preparing, evolving or observing a state vector.
///
/// Every error is raised before the amplitude buffer is touched, so a failed
/// call always leaves the state exactly as it was.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A vector or matrix does not have the size implied by its wires.
    #[error("{0}")]
    Dimension(String),

    /// Basis-state preparation was requested after other operations.
    #[error(
        "Operation {0} cannot be used after other Operations have already been applied on this device"
    )]
    OperationOrder(String),

    /// A named operation has no registered matrix.
    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    /// The register is larger than a state vector can hold.
    #[error("Cannot simulate {requested} wires (maximum {max})")]
    TooManyWires {
        /// Number of wires asked for.
        requested: usize,
        /// Largest supported register.
        max: usize,
    },

    /// A wire label that is not part of the device.
    #[error("Wire {wire} is not on this device ({num_wires} wires)")]
    UnknownWire {
        /// The offending label.
        wire: Wire,
        /// Number of wires on the device.
        num_wires: usize,
    },

    /// The same wire appears twice in one operation.
    #[error("Duplicate wire {0} in operation")]
    DuplicateWire(Wire),

    /// A named gate was given the wrong number of wires.
    #[error("Gate '{gate}' acts on {expected} wires, got {got}")]
    WireCountMismatch {
        /// Name of the gate.
        gate: String,
        /// Number of wires the gate acts on.
        expected: usize,
        /// Number of wires supplied.
        got: usize,
    },

    /// A named gate was given the wrong number of parameters.
    #[error("Gate '{gate}' takes {expected} parameters, got {got}")]
    ParameterCountMismatch {
        /// Name of the gate.
        gate: String,
        /// Number of parameters the gate takes.
        expected: usize,
        /// Number of parameters supplied.
        got: usize,
    },

    /// A basis-state bit list contains something other than 0 or 1.
    #[error("Basis state bits must be 0 or 1, got {0}")]
    InvalidBasisBit(u8),

    /// Strict mode: the supplied matrix is not unitary.
    #[error("Matrix is not unitary (max deviation from identity {deviation:.3e})")]
    NotUnitary {
        /// Largest entry of |U†U − I|.
        deviation: f64,
    },

    /// Strict mode: the supplied state vector is not normalized.
    #[error("State vector is not normalized (norm {norm:.6})")]
    NotNormalized {
        /// Euclidean norm of the rejected vector.
        norm: f64,
    },

    /// An observable failed validation.
    #[error("{0}")]
    InvalidObservable(String),
}

impl SimError {
    /// Build a [`SimError::Dimension`] with the given message.
    pub fn dimension(msg: impl Into<String>) -> Self {
        SimError::Dimension(msg.into())
    }

    /// Whether this is a size mismatch.
    pub fn is_dimension(&self) -> bool {
        matches!(self, SimError::Dimension(_))
    }

    /// Whether this is an operation-ordering violation.
    pub fn is_operation_order(&self) -> bool {
        matches!(self, SimError::OperationOrder(_))
    }
}

/// Result type for simulation core operations.
pub type SimResult<T> = Result<T, SimError>;
