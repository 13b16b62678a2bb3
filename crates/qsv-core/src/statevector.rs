//! The amplitude buffer and gate contraction.

use num_complex::Complex64;
use tracing::trace;

use crate::error::{SimError, SimResult};
use crate::matrix::{self, GateMatrix, ONE, ZERO};
use crate::wire::{base_indices, block_offsets, to_external_order};

/// Largest register a state vector will allocate (2^30 amplitudes, 16 GiB).
pub const MAX_WIRES: usize = 30;

/// A state vector over a fixed number of wires.
///
/// Operations address wires by axis position (see [`crate::wire::WireMap`]),
/// and every caller-facing index uses the external convention described in
/// [`crate::wire`].
#[derive(Debug, Clone)]
pub struct StateVector {
    /// The state amplitudes (2^n complex numbers), internal order.
    amplitudes: Vec<Complex64>,
    /// Number of wires.
    num_wires: usize,
    /// Set once any preparation or gate has been applied.
    active: bool,
}

impl StateVector {
    /// Create a state vector initialized to |0...0⟩.
    ///
    /// Fails with [`SimError::TooManyWires`] above [`MAX_WIRES`].
    pub fn new(num_wires: usize) -> SimResult<Self> {
        if num_wires > MAX_WIRES {
            return Err(SimError::TooManyWires {
                requested: num_wires,
                max: MAX_WIRES,
            });
        }
        Ok(Self {
            amplitudes: ground_state(num_wires),
            num_wires,
            active: false,
        })
    }

    /// Number of wires.
    #[inline]
    pub fn num_wires(&self) -> usize {
        self.num_wires
    }

    /// Whether anything has been applied since construction or the last reset.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Amplitudes in internal order.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Copy of the amplitudes in external order.
    pub fn to_external(&self) -> Vec<Complex64> {
        to_external_order(&self.amplitudes)
    }

    /// Sum of squared magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Return to |0...0⟩ and forget that anything was applied.
    pub fn reset(&mut self) {
        self.amplitudes = ground_state(self.num_wires);
        self.active = false;
    }

    /// Prepare the computational basis state `index`.
    ///
    /// `index` is read most-significant-bit first over `positions`, which must
    /// name every wire. Only allowed before anything else has been applied.
    pub fn initialize_basis(&mut self, positions: &[usize], index: u64) -> SimResult<()> {
        if self.active {
            return Err(SimError::OperationOrder("BasisState".to_string()));
        }
        self.check_positions(positions)?;
        if positions.len() != self.num_wires {
            return Err(SimError::dimension("Basis state must prepare all qubits."));
        }
        let k = positions.len();
        if k < 64 && index >> k != 0 {
            return Err(SimError::dimension(format!(
                "Basis state index {index} does not fit in {k} wires"
            )));
        }

        let target = positions
            .iter()
            .enumerate()
            .filter(|&(j, _)| (index >> (k - 1 - j)) & 1 == 1)
            .fold(0usize, |acc, (_, &pos)| acc | (1 << pos));

        let mut amplitudes = vec![ZERO; 1 << self.num_wires];
        amplitudes[target] = ONE;
        self.amplitudes = amplitudes;
        self.active = true;
        trace!(index, target, "prepared basis state");
        Ok(())
    }

    /// Load amplitudes for the wires at `positions`.
    ///
    /// `vector[e]` is the amplitude of the pattern `e` read most-significant-bit
    /// first over `positions`. Wires not listed are left in |0⟩. The vector is
    /// copied; no normalization check happens here.
    pub fn initialize_statevector(
        &mut self,
        positions: &[usize],
        vector: &[Complex64],
    ) -> SimResult<()> {
        self.check_positions(positions)?;
        if vector.len() != 1 << positions.len() {
            return Err(SimError::dimension(
                "State vector must be of length 2**wires.",
            ));
        }

        let mut amplitudes = vec![ZERO; 1 << self.num_wires];
        for (&offset, &amp) in block_offsets(positions).iter().zip(vector) {
            amplitudes[offset] = amp;
        }
        self.amplitudes = amplitudes;
        self.active = true;
        trace!(wires = positions.len(), "loaded state vector");
        Ok(())
    }

    /// Apply a `2^k × 2^k` matrix to the wires at `positions`.
    pub fn apply(&mut self, matrix: &GateMatrix, positions: &[usize]) -> SimResult<()> {
        self.amplitudes = self.contract(matrix, positions)?;
        self.active = true;
        Ok(())
    }

    /// Result of applying `matrix` at `positions`, leaving `self` untouched.
    ///
    /// For each base index with every target bit clear, the `2^k` amplitudes
    /// of its block are gathered, multiplied by `matrix` and scattered into a
    /// fresh buffer. Cost is `O(2^n · 2^k)`.
    pub fn contract(
        &self,
        matrix: &GateMatrix,
        positions: &[usize],
    ) -> SimResult<Vec<Complex64>> {
        self.check_positions(positions)?;
        let dim = 1usize << positions.len();
        if matrix.dim() != (dim, dim) {
            return Err(SimError::dimension(format!(
                "Unitary matrix must be of shape (2**wires, 2**wires): expected ({dim}, {dim}), got {:?}",
                matrix.dim()
            )));
        }

        let offsets = block_offsets(positions);
        let mut next = vec![ZERO; self.amplitudes.len()];
        let mut block = vec![ZERO; dim];
        for base in base_indices(self.num_wires, positions) {
            for (slot, &offset) in block.iter_mut().zip(&offsets) {
                *slot = self.amplitudes[base | offset];
            }
            for (row, &offset) in matrix.rows().into_iter().zip(&offsets) {
                next[base | offset] = row.iter().zip(&block).map(|(m, a)| m * a).sum();
            }
        }
        Ok(next)
    }

    fn check_positions(&self, positions: &[usize]) -> SimResult<()> {
        for (i, &pos) in positions.iter().enumerate() {
            if pos >= self.num_wires {
                return Err(SimError::dimension(format!(
                    "Axis {pos} out of range for {} wires",
                    self.num_wires
                )));
            }
            if positions[..i].contains(&pos) {
                return Err(SimError::dimension(format!("Axis {pos} used twice")));
            }
        }
        Ok(())
    }
}

fn ground_state(num_wires: usize) -> Vec<Complex64> {
    let mut amplitudes = vec![ZERO; 1 << num_wires];
    amplitudes[0] = ONE;
    amplitudes
}

/// Reject a matrix that is not unitary within `tol`.
pub fn check_unitary(matrix: &GateMatrix, tol: f64) -> SimResult<()> {
    match matrix::unitarity_deviation(matrix) {
        Some(deviation) if deviation > tol => Err(SimError::NotUnitary { deviation }),
        Some(_) => Ok(()),
        None => Err(SimError::dimension(
            "Unitary matrix must be of shape (2**wires, 2**wires)",
        )),
    }
}

/// Reject a vector whose norm differs from 1 by more than `tol`.
pub fn check_normalized(vector: &[Complex64], tol: f64) -> SimResult<()> {
    let norm = vector.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
    if (norm - 1.0).abs() > tol {
        return Err(SimError::NotNormalized { norm });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateKind;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_initial_state() {
        let sv = StateVector::new(2).unwrap();
        assert!(!sv.is_active());
        assert!(approx_eq(sv.amplitudes()[0], ONE));
        assert!(sv.amplitudes()[1..].iter().all(|a| approx_eq(*a, ZERO)));
    }

    #[test]
    fn test_register_too_large() {
        for n in [MAX_WIRES + 1, 64, usize::MAX] {
            assert!(matches!(
                StateVector::new(n),
                Err(SimError::TooManyWires { requested, max: MAX_WIRES }) if requested == n
            ));
        }
        assert_eq!(StateVector::new(0).unwrap().amplitudes(), &[ONE]);
    }

    #[test]
    fn test_hadamard() {
        let mut sv = StateVector::new(1).unwrap();
        sv.apply(&GateKind::Hadamard.matrix(&[]).unwrap(), &[0]).unwrap();

        assert!(sv.is_active());
        assert!(approx_eq(sv.amplitudes()[0], c(FRAC_1_SQRT_2)));
        assert!(approx_eq(sv.amplitudes()[1], c(FRAC_1_SQRT_2)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = StateVector::new(2).unwrap();
        sv.apply(&GateKind::Hadamard.matrix(&[]).unwrap(), &[0]).unwrap();
        sv.apply(&GateKind::CNOT.matrix(&[]).unwrap(), &[0, 1]).unwrap();

        let amps = sv.amplitudes();
        assert!(approx_eq(amps[0], c(FRAC_1_SQRT_2)));
        assert!(approx_eq(amps[1], ZERO));
        assert!(approx_eq(amps[2], ZERO));
        assert!(approx_eq(amps[3], c(FRAC_1_SQRT_2)));
    }

    #[test]
    fn test_x_on_second_axis() {
        let mut sv = StateVector::new(2).unwrap();
        sv.apply(&GateKind::PauliX.matrix(&[]).unwrap(), &[1]).unwrap();
        // Axis 1 is bit 1 internally
        assert!(approx_eq(sv.amplitudes()[2], ONE));
        // and the low bit of the external index
        assert!(approx_eq(sv.to_external()[1], ONE));
    }

    #[test]
    fn test_cnot_control_follows_operation_order() {
        // |w0=0, w1=1⟩; CNOT with w1 as control flips w0
        let mut sv = StateVector::new(2).unwrap();
        sv.initialize_basis(&[0, 1], 0b01).unwrap();
        sv.apply(&GateKind::CNOT.matrix(&[]).unwrap(), &[1, 0]).unwrap();
        assert!(approx_eq(sv.amplitudes()[0b11], ONE));
    }

    #[test]
    fn test_basis_state_internal_layout() {
        let mut sv = StateVector::new(4).unwrap();
        sv.initialize_basis(&[0, 1, 2, 3], 0b0010).unwrap();
        // Wire 2 set: internal bit 2, external index 0b0010
        assert!(approx_eq(sv.amplitudes()[0b0100], ONE));
        assert!(approx_eq(sv.to_external()[0b0010], ONE));
    }

    #[test]
    fn test_basis_state_after_gate_fails() {
        let mut sv = StateVector::new(2).unwrap();
        sv.apply(&GateKind::Hadamard.matrix(&[]).unwrap(), &[0]).unwrap();
        let before = sv.amplitudes().to_vec();

        let err = sv.initialize_basis(&[0, 1], 1).unwrap_err();
        assert!(err.is_operation_order());
        assert!(err.to_string().contains("cannot be used after other Operations"));
        assert_eq!(sv.amplitudes(), &before[..]);
    }

    #[test]
    fn test_basis_state_validation() {
        let mut sv = StateVector::new(3).unwrap();
        assert!(sv.initialize_basis(&[0, 1], 0).unwrap_err().is_dimension());
        assert!(sv.initialize_basis(&[0, 1, 2], 8).unwrap_err().is_dimension());
        assert!(!sv.is_active());
    }

    #[test]
    fn test_statevector_length_checked() {
        let mut sv = StateVector::new(2).unwrap();
        let err = sv
            .initialize_statevector(&[0, 1], &[ZERO, c(123.432)])
            .unwrap_err();
        assert!(err.to_string().contains("State vector must be of length 2**wires"));
        assert!(!sv.is_active());
    }

    #[test]
    fn test_statevector_on_subset() {
        let mut sv = StateVector::new(2).unwrap();
        sv.initialize_statevector(&[1], &[c(0.6), c(0.8)]).unwrap();
        assert!(approx_eq(sv.amplitudes()[0b00], c(0.6)));
        assert!(approx_eq(sv.amplitudes()[0b10], c(0.8)));
        assert!((sv.norm_sqr() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_shape_checked() {
        let mut sv = StateVector::new(2).unwrap();
        let h = GateKind::Hadamard.matrix(&[]).unwrap();
        let err = sv.apply(&h, &[0, 1]).unwrap_err();
        assert!(err.to_string().contains("Unitary matrix must be of shape"));
        assert!(!sv.is_active());
    }

    #[test]
    fn test_bad_positions() {
        let mut sv = StateVector::new(2).unwrap();
        let x = GateKind::PauliX.matrix(&[]).unwrap();
        assert!(sv.apply(&x, &[2]).unwrap_err().is_dimension());
        let cnot = GateKind::CNOT.matrix(&[]).unwrap();
        assert!(sv.apply(&cnot, &[1, 1]).unwrap_err().is_dimension());
    }

    #[test]
    fn test_reset() {
        let mut sv = StateVector::new(1).unwrap();
        sv.apply(&GateKind::PauliX.matrix(&[]).unwrap(), &[0]).unwrap();
        sv.reset();
        assert!(!sv.is_active());
        assert!(approx_eq(sv.amplitudes()[0], ONE));
        sv.initialize_basis(&[0], 1).unwrap();
    }

    #[test]
    fn test_strict_checks() {
        assert!(check_unitary(&GateKind::Rot.matrix(&[0.1, 0.2, 0.3]).unwrap(), 1e-10).is_ok());
        let not_unitary = crate::matrix::diagonal(&[ONE, c(2.0)]);
        assert!(matches!(
            check_unitary(&not_unitary, 1e-10),
            Err(SimError::NotUnitary { .. })
        ));
        assert!(check_normalized(&[c(0.6), c(0.8)], 1e-10).is_ok());
        assert!(matches!(
            check_normalized(&[c(0.0), c(123.432)], 1e-10),
            Err(SimError::NotNormalized { .. })
        ));
    }
}
