//! The gate library: a closed set of named operations and their matrices.

use ndarray::{Array2, array};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SimError, SimResult};
use crate::matrix::{self, GateMatrix, I, ONE, ZERO, re};

/// Named operations understood by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    // Single-qubit, fixed
    /// Identity.
    Identity,
    /// Pauli-X.
    PauliX,
    /// Pauli-Y.
    PauliY,
    /// Pauli-Z.
    PauliZ,
    /// Hadamard.
    Hadamard,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger.
    Tdg,

    // Single-qubit, parametrized
    /// Phase shift diag(1, e^{iφ}).
    PhaseShift,
    /// Rotation around X.
    RX,
    /// Rotation around Y.
    RY,
    /// Rotation around Z.
    RZ,
    /// General rotation Rot(a, b, c) = RZ(c) · RY(b) · RZ(a).
    Rot,

    // Two-qubit
    /// Controlled-X.
    CNOT,
    /// Controlled-Z.
    CZ,
    /// SWAP.
    SWAP,
    /// Controlled RZ.
    CRZ,

    // Three-qubit
    /// Toffoli (CCX).
    Toffoli,
    /// Fredkin (controlled SWAP).
    CSWAP,
}

impl GateKind {
    /// Every registered gate.
    pub const ALL: [GateKind; 20] = [
        GateKind::Identity,
        GateKind::PauliX,
        GateKind::PauliY,
        GateKind::PauliZ,
        GateKind::Hadamard,
        GateKind::S,
        GateKind::Sdg,
        GateKind::T,
        GateKind::Tdg,
        GateKind::PhaseShift,
        GateKind::RX,
        GateKind::RY,
        GateKind::RZ,
        GateKind::Rot,
        GateKind::CNOT,
        GateKind::CZ,
        GateKind::SWAP,
        GateKind::CRZ,
        GateKind::Toffoli,
        GateKind::CSWAP,
    ];

    /// Look a gate up by its operation name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.name() == name)
    }

    /// Operation name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Identity => "Identity",
            GateKind::PauliX => "PauliX",
            GateKind::PauliY => "PauliY",
            GateKind::PauliZ => "PauliZ",
            GateKind::Hadamard => "Hadamard",
            GateKind::S => "S",
            GateKind::Sdg => "Sdg",
            GateKind::T => "T",
            GateKind::Tdg => "Tdg",
            GateKind::PhaseShift => "PhaseShift",
            GateKind::RX => "RX",
            GateKind::RY => "RY",
            GateKind::RZ => "RZ",
            GateKind::Rot => "Rot",
            GateKind::CNOT => "CNOT",
            GateKind::CZ => "CZ",
            GateKind::SWAP => "SWAP",
            GateKind::CRZ => "CRZ",
            GateKind::Toffoli => "Toffoli",
            GateKind::CSWAP => "CSWAP",
        }
    }

    /// Number of wires this gate acts on.
    #[inline]
    pub fn num_wires(&self) -> usize {
        match self {
            GateKind::CNOT | GateKind::CZ | GateKind::SWAP | GateKind::CRZ => 2,
            GateKind::Toffoli | GateKind::CSWAP => 3,
            _ => 1,
        }
    }

    /// Number of numeric parameters this gate takes.
    #[inline]
    pub fn num_params(&self) -> usize {
        match self {
            GateKind::PhaseShift | GateKind::RX | GateKind::RY | GateKind::RZ | GateKind::CRZ => 1,
            GateKind::Rot => 3,
            _ => 0,
        }
    }

    /// Build the gate's matrix for the given parameters.
    pub fn matrix(&self, params: &[f64]) -> SimResult<GateMatrix> {
        if params.len() != self.num_params() {
            return Err(SimError::ParameterCountMismatch {
                gate: self.name().to_string(),
                expected: self.num_params(),
                got: params.len(),
            });
        }

        let m = match self {
            GateKind::Identity => matrix::identity(2),
            GateKind::PauliX => matrix::pauli_x(),
            GateKind::PauliY => matrix::pauli_y(),
            GateKind::PauliZ => matrix::pauli_z(),
            GateKind::Hadamard => matrix::hadamard(),
            GateKind::S => matrix::diagonal(&[ONE, I]),
            GateKind::Sdg => matrix::diagonal(&[ONE, -I]),
            GateKind::T => phase_shift(std::f64::consts::FRAC_PI_4),
            GateKind::Tdg => phase_shift(-std::f64::consts::FRAC_PI_4),
            GateKind::PhaseShift => phase_shift(params[0]),
            GateKind::RX => rx(params[0]),
            GateKind::RY => ry(params[0]),
            GateKind::RZ => rz(params[0]),
            GateKind::Rot => rot(params[0], params[1], params[2]),
            GateKind::CNOT => controlled(&matrix::pauli_x()),
            GateKind::CZ => matrix::diagonal(&[ONE, ONE, ONE, -ONE]),
            GateKind::SWAP => swap(),
            GateKind::CRZ => controlled(&rz(params[0])),
            GateKind::Toffoli => controlled(&controlled(&matrix::pauli_x())),
            GateKind::CSWAP => controlled(&swap()),
        };
        Ok(m)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Phase shift diag(1, e^{iφ}).
pub fn phase_shift(phi: f64) -> GateMatrix {
    matrix::diagonal(&[ONE, Complex64::from_polar(1.0, phi)])
}

/// RX(θ) = cos(θ/2)·I − i·sin(θ/2)·X.
pub fn rx(theta: f64) -> GateMatrix {
    let c = re((theta / 2.0).cos());
    let s = Complex64::new(0.0, -(theta / 2.0).sin());
    array![[c, s], [s, c]]
}

/// RY(θ) = cos(θ/2)·I − i·sin(θ/2)·Y.
pub fn ry(theta: f64) -> GateMatrix {
    let c = re((theta / 2.0).cos());
    let s = re((theta / 2.0).sin());
    array![[c, -s], [s, c]]
}

/// RZ(θ) = diag(e^{−iθ/2}, e^{iθ/2}).
pub fn rz(theta: f64) -> GateMatrix {
    matrix::diagonal(&[
        Complex64::from_polar(1.0, -theta / 2.0),
        Complex64::from_polar(1.0, theta / 2.0),
    ])
}

/// Rot(a, b, c) = RZ(c) · RY(b) · RZ(a).
pub fn rot(a: f64, b: f64, c: f64) -> GateMatrix {
    rz(c).dot(&ry(b)).dot(&rz(a))
}

fn swap() -> GateMatrix {
    array![
        [ONE, ZERO, ZERO, ZERO],
        [ZERO, ZERO, ONE, ZERO],
        [ZERO, ONE, ZERO, ZERO],
        [ZERO, ZERO, ZERO, ONE],
    ]
}

/// Block-diagonal `I ⊕ u`: the first wire controls `u` on the rest.
pub fn controlled(u: &GateMatrix) -> GateMatrix {
    let n = u.nrows();
    let mut m = Array2::from_elem((2 * n, 2 * n), ZERO);
    for i in 0..n {
        m[[i, i]] = ONE;
    }
    m.slice_mut(ndarray::s![n.., n..]).assign(u);
    m
}
