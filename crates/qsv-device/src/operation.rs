//! Operations that can be applied to a device.

use num_complex::Complex64;
use qsv_core::wire::index_for_bits;
use qsv_core::{GateKind, GateMatrix, SimResult, Wire};
use serde::{Deserialize, Serialize};

/// What an operation does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OperationKind {
    /// Prepare a computational basis state over all wires.
    BasisState {
        /// Basis index, most significant bit on the first wire.
        index: u64,
    },
    /// Load amplitudes for the listed wires.
    StateVector {
        /// `2^k` amplitudes in the external index order.
        amplitudes: Vec<Complex64>,
    },
    /// Apply a caller-supplied matrix.
    Unitary {
        /// `2^k × 2^k` matrix; rows and columns index the wires first-wire-MSB.
        matrix: GateMatrix,
    },
    /// Apply a gate from the library by name.
    Gate {
        /// Registered gate name.
        name: String,
        /// Gate parameters, in radians.
        params: Vec<f64>,
    },
}

/// An operation with its target wires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// The kind of operation.
    pub kind: OperationKind,
    /// Wires this operation acts on, in order.
    pub wires: Vec<Wire>,
}

impl Operation {
    /// Create a basis-state preparation.
    pub fn basis_state(wires: impl IntoIterator<Item = Wire>, index: u64) -> Self {
        Self {
            kind: OperationKind::BasisState { index },
            wires: wires.into_iter().collect(),
        }
    }

    /// Create a basis-state preparation from one bit per wire.
    pub fn basis_bits(wires: impl IntoIterator<Item = Wire>, bits: &[u8]) -> SimResult<Self> {
        Ok(Self::basis_state(wires, index_for_bits(bits)?))
    }

    /// Create a state-vector load.
    pub fn state_vector(wires: impl IntoIterator<Item = Wire>, amplitudes: Vec<Complex64>) -> Self {
        Self {
            kind: OperationKind::StateVector { amplitudes },
            wires: wires.into_iter().collect(),
        }
    }

    /// Create a unitary from an explicit matrix.
    pub fn unitary(matrix: GateMatrix, wires: impl IntoIterator<Item = Wire>) -> Self {
        Self {
            kind: OperationKind::Unitary { matrix },
            wires: wires.into_iter().collect(),
        }
    }

    /// Create a named gate. The name is resolved when the operation is applied.
    pub fn named(
        name: impl Into<String>,
        wires: impl IntoIterator<Item = Wire>,
        params: impl IntoIterator<Item = f64>,
    ) -> Self {
        Self {
            kind: OperationKind::Gate {
                name: name.into(),
                params: params.into_iter().collect(),
            },
            wires: wires.into_iter().collect(),
        }
    }

    /// Create a library gate without parameters.
    pub fn gate(gate: GateKind, wires: impl IntoIterator<Item = Wire>) -> Self {
        Self::named(gate.name(), wires, [])
    }

    /// Create a library gate with parameters.
    pub fn parameterized(
        gate: GateKind,
        wires: impl IntoIterator<Item = Wire>,
        params: impl IntoIterator<Item = f64>,
    ) -> Self {
        Self::named(gate.name(), wires, params)
    }

    /// Name used in logs and error messages.
    pub fn name(&self) -> &str {
        match &self.kind {
            OperationKind::BasisState { .. } => "BasisState",
            OperationKind::StateVector { .. } => "QubitStateVector",
            OperationKind::Unitary { .. } => "QubitUnitary",
            OperationKind::Gate { name, .. } => name,
        }
    }

    /// Whether this operation prepares the state rather than evolving it.
    pub fn is_preparation(&self) -> bool {
        matches!(
            self.kind,
            OperationKind::BasisState { .. } | OperationKind::StateVector { .. }
        )
    }
}
