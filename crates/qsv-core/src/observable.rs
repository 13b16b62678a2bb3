//! Observables and expectation values.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::matrix::{self, GateMatrix};
use crate::statevector::StateVector;
use crate::wire::{Wire, WireMap};

/// Tolerance used when checking that a user matrix is Hermitian.
const HERMITIAN_TOL: f64 = 1e-8;

/// A measurable quantity on one or more wires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Observable {
    /// Pauli-X.
    PauliX,
    /// Pauli-Y.
    PauliY,
    /// Pauli-Z.
    PauliZ,
    /// Hadamard.
    Hadamard,
    /// Identity.
    Identity,
    /// An arbitrary Hermitian matrix.
    Hermitian(GateMatrix),
}

impl Observable {
    /// Name of the observable.
    pub fn name(&self) -> &'static str {
        match self {
            Observable::PauliX => "PauliX",
            Observable::PauliY => "PauliY",
            Observable::PauliZ => "PauliZ",
            Observable::Hadamard => "Hadamard",
            Observable::Identity => "Identity",
            Observable::Hermitian(_) => "Hermitian",
        }
    }

    /// The observable's matrix, validated.
    pub fn matrix(&self) -> SimResult<GateMatrix> {
        let m = match self {
            Observable::PauliX => matrix::pauli_x(),
            Observable::PauliY => matrix::pauli_y(),
            Observable::PauliZ => matrix::pauli_z(),
            Observable::Hadamard => matrix::hadamard(),
            Observable::Identity => matrix::identity(2),
            Observable::Hermitian(a) => {
                if a.nrows() != a.ncols() {
                    return Err(SimError::InvalidObservable(
                        "Expectation must be a square matrix.".to_string(),
                    ));
                }
                if !matrix::is_hermitian(a, HERMITIAN_TOL) {
                    return Err(SimError::InvalidObservable(
                        "Expectation must be Hermitian.".to_string(),
                    ));
                }
                a.clone()
            }
        };
        Ok(m)
    }
}

/// One factor of a tensor-product observable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservableTerm {
    /// The observable.
    pub observable: Observable,
    /// Wires it acts on.
    pub wires: Vec<Wire>,
}

impl ObservableTerm {
    /// Create a term.
    pub fn new(observable: Observable, wires: impl IntoIterator<Item = Wire>) -> Self {
        Self {
            observable,
            wires: wires.into_iter().collect(),
        }
    }
}

/// `Re ⟨ψ|A|ψ⟩` for the tensor product `A` of `terms`.
///
/// Factors are combined with the Kronecker product in term order over the
/// concatenated wire lists. The state itself is not modified.
pub fn expectation(state: &StateVector, map: &WireMap, terms: &[ObservableTerm]) -> SimResult<f64> {
    let mut wires = Vec::new();
    let mut operator: Option<GateMatrix> = None;
    for term in terms {
        let m = term.observable.matrix()?;
        if m.nrows() != 1 << term.wires.len() {
            return Err(SimError::dimension(format!(
                "{} acts on {} wires but its matrix has {} rows",
                term.observable.name(),
                term.wires.len(),
                m.nrows()
            )));
        }
        operator = Some(match operator {
            Some(acc) => matrix::kron(&acc, &m),
            None => m,
        });
        wires.extend_from_slice(&term.wires);
    }
    let Some(operator) = operator else {
        return Ok(state.norm_sqr());
    };

    let positions = map.positions(&wires)?;
    let applied = state.contract(&operator, &positions)?;
    let value: Complex64 = state
        .amplitudes()
        .iter()
        .zip(&applied)
        .map(|(bra, ket)| bra.conj() * ket)
        .sum();
    Ok(value.re)
}
