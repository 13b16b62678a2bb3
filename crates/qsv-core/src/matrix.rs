//! Dense complex matrix helpers.
//!
//! Gate matrices are plain `ndarray` arrays in row-major order; row and
//! column indices follow the external wire convention described in
//! [`crate::wire`].

use ndarray::{Array2, array};
use num_complex::Complex64;

use crate::error::{SimError, SimResult};

/// A dense `2^k × 2^k` operator.
pub type GateMatrix = Array2<Complex64>;

pub(crate) const ZERO: Complex64 = Complex64::new(0.0, 0.0);
pub(crate) const ONE: Complex64 = Complex64::new(1.0, 0.0);
pub(crate) const I: Complex64 = Complex64::new(0.0, 1.0);

/// Shorthand for a real complex number.
#[inline]
pub(crate) fn re(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

/// The `dim × dim` identity.
pub fn identity(dim: usize) -> GateMatrix {
    Array2::from_diag_elem(dim, ONE)
}

/// Diagonal matrix from its entries.
pub fn diagonal(entries: &[Complex64]) -> GateMatrix {
    Array2::from_diag(&ndarray::Array1::from(entries.to_vec()))
}

/// Build a square matrix from row-major entries.
pub fn from_row_major(entries: Vec<Complex64>) -> SimResult<GateMatrix> {
    let dim = (entries.len() as f64).sqrt().round() as usize;
    Array2::from_shape_vec((dim, dim), entries).map_err(|_| {
        SimError::dimension("Matrix entries do not form a square matrix")
    })
}

/// Conjugate transpose.
pub fn dagger(m: &GateMatrix) -> GateMatrix {
    m.t().mapv(|z| z.conj())
}

/// Kronecker product `a ⊗ b`. The rows of `a` select the high bits.
pub fn kron(a: &GateMatrix, b: &GateMatrix) -> GateMatrix {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    Array2::from_shape_fn((ar * br, ac * bc), |(i, j)| {
        a[[i / br, j / bc]] * b[[i % br, j % bc]]
    })
}

/// Largest entry of `|m†m − I|`, or `None` if `m` is not square.
pub fn unitarity_deviation(m: &GateMatrix) -> Option<f64> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return None;
    }
    let product = dagger(m).dot(m);
    let deviation = product
        .indexed_iter()
        .map(|((i, j), z)| {
            let expected = if i == j { ONE } else { ZERO };
            (z - expected).norm()
        })
        .fold(0.0, f64::max);
    Some(deviation)
}

/// Whether `m` is square and equal to its conjugate transpose within `tol`.
pub fn is_hermitian(m: &GateMatrix, tol: f64) -> bool {
    let (rows, cols) = m.dim();
    rows == cols
        && m.indexed_iter()
            .all(|((i, j), z)| (z - m[[j, i]].conj()).norm() <= tol)
}

/// Pauli-X.
pub fn pauli_x() -> GateMatrix {
    array![[ZERO, ONE], [ONE, ZERO]]
}

/// Pauli-Y.
pub fn pauli_y() -> GateMatrix {
    array![[ZERO, -I], [I, ZERO]]
}

/// Pauli-Z.
pub fn pauli_z() -> GateMatrix {
    array![[ONE, ZERO], [ZERO, -ONE]]
}

/// Hadamard.
pub fn hadamard() -> GateMatrix {
    let s = re(std::f64::consts::FRAC_1_SQRT_2);
    array![[s, s], [s, -s]]
}
