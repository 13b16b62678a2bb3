//! Probability read-outs derived from a state vector.
//!
//! Probabilities are always exact. The constrained ("hardware") read-out
//! differs from the exact one only in shape: it reports outcomes over a
//! chosen list of wires and marginalizes the rest away. Shot counts never
//! perturb these values; [`sample`] is the only place randomness enters.

use num_complex::Complex64;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::counts::Counts;
use crate::error::SimResult;
use crate::statevector::StateVector;
use crate::wire::{Wire, WireMap, to_external_order};

/// Outcome probabilities over an ordered list of wires.
///
/// Outcome `e` is the bit pattern read most-significant-bit first over
/// [`ProbabilityMap::wires`]; iteration is in increasing `e`, which is also
/// lexicographic bitstring order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityMap {
    wires: Vec<Wire>,
    probabilities: Vec<f64>,
}

impl ProbabilityMap {
    /// Wires the outcomes range over.
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// Number of outcomes (`2^k`).
    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    /// Always false; a map over zero wires still has one outcome.
    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Probabilities indexed by outcome.
    pub fn values(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability of outcome index `index`.
    pub fn get_index(&self, index: usize) -> Option<f64> {
        self.probabilities.get(index).copied()
    }

    /// Probability of an MSB-first bit pattern.
    pub fn get(&self, bits: &[u8]) -> Option<f64> {
        if bits.len() != self.wires.len() || bits.iter().any(|&b| b > 1) {
            return None;
        }
        let index = bits.iter().fold(0usize, |acc, &b| (acc << 1) | usize::from(b));
        self.get_index(index)
    }

    /// Sum of all probabilities (1 up to rounding for a normalized state).
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Iterate over `(bit pattern, probability)` in outcome order.
    pub fn iter(&self) -> impl Iterator<Item = (Vec<u8>, f64)> + '_ {
        let k = self.wires.len();
        self.probabilities
            .iter()
            .enumerate()
            .map(move |(e, &p)| ((0..k).map(|j| ((e >> (k - 1 - j)) & 1) as u8).collect(), p))
    }

    /// Probabilities keyed by bitstring.
    pub fn to_bitstring_map(&self) -> BTreeMap<String, f64> {
        let k = self.wires.len();
        self.probabilities
            .iter()
            .enumerate()
            .map(|(e, &p)| (bitstring(e, k), p))
            .collect()
    }
}

/// Exact probability of every basis state of the device, in external order.
pub fn exact_probabilities(state: &StateVector, map: &WireMap) -> ProbabilityMap {
    let internal: Vec<f64> = state.amplitudes().iter().map(Complex64::norm_sqr).collect();
    ProbabilityMap {
        wires: map.labels().to_vec(),
        probabilities: to_external_order(&internal),
    }
}

/// Probabilities of the patterns over `wires`, summing out every other wire.
///
/// `wires` may be in any order and need not cover the device; the outcome
/// index is read most-significant-bit first in the order given.
pub fn marginal_probabilities(
    state: &StateVector,
    map: &WireMap,
    wires: &[Wire],
) -> SimResult<ProbabilityMap> {
    let positions = map.positions(wires)?;
    let k = positions.len();
    let mut probabilities = vec![0.0; 1 << k];
    for (i, amp) in state.amplitudes().iter().enumerate() {
        let outcome = positions
            .iter()
            .fold(0usize, |acc, &pos| (acc << 1) | ((i >> pos) & 1));
        probabilities[outcome] += amp.norm_sqr();
    }
    Ok(ProbabilityMap {
        wires: wires.to_vec(),
        probabilities,
    })
}

/// Draw `shots` outcomes from `probabilities`.
pub fn sample<R: Rng>(probabilities: &ProbabilityMap, shots: u32, rng: &mut R) -> Counts {
    let mut cumulative = Vec::with_capacity(probabilities.len());
    let mut running = 0.0;
    for &p in probabilities.values() {
        running += p;
        cumulative.push(running);
    }

    let k = probabilities.wires().len();
    let last = cumulative.len().saturating_sub(1);
    let mut hits = vec![0u64; cumulative.len()];
    for _ in 0..shots {
        let r: f64 = rng.r#gen::<f64>() * running;
        let outcome = cumulative.partition_point(|&c| c <= r).min(last);
        hits[outcome] += 1;
    }

    let mut counts = Counts::new();
    for (e, &n) in hits.iter().enumerate() {
        if n > 0 {
            counts.insert(bitstring(e, k), n);
        }
    }
    counts
}

fn bitstring(index: usize, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    format!("{index:0width$b}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::GateKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_exact_basis_state() {
        let map = WireMap::contiguous(4);
        let mut sv = StateVector::new(4).unwrap();
        sv.initialize_basis(&[0, 1, 2, 3], 0b0010).unwrap();

        let probs = exact_probabilities(&sv, &map);
        assert_eq!(probs.len(), 16);
        assert_eq!(probs.get_index(2), Some(1.0));
        assert_eq!(probs.get(&[0, 0, 1, 0]), Some(1.0));
        assert!((probs.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_exact_matches_loaded_vector() {
        let map = WireMap::contiguous(2);
        let mut sv = StateVector::new(2).unwrap();
        let vector = [c(0.1), c(0.3), c(0.5), c(0.8)];
        let norm: f64 = vector.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
        let vector: Vec<Complex64> = vector.iter().map(|a| *a / norm).collect();
        sv.initialize_statevector(&[0, 1], &vector).unwrap();

        let probs = exact_probabilities(&sv, &map);
        for (p, a) in probs.values().iter().zip(&vector) {
            assert!((p - a.norm_sqr()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_marginal_sums_out_other_wires() {
        let map = WireMap::contiguous(2);
        let mut sv = StateVector::new(2).unwrap();
        // (|00⟩ + |11⟩)/√2 then X on wire 1 gives (|01⟩ + |10⟩)/√2
        sv.apply(&GateKind::Hadamard.matrix(&[]).unwrap(), &[0]).unwrap();
        sv.apply(&GateKind::CNOT.matrix(&[]).unwrap(), &[0, 1]).unwrap();
        sv.apply(&GateKind::PauliX.matrix(&[]).unwrap(), &[1]).unwrap();

        let w0 = marginal_probabilities(&sv, &map, &[Wire(0)]).unwrap();
        assert!((w0.values()[0] - 0.5).abs() < 1e-12);
        assert!((w0.values()[1] - 0.5).abs() < 1e-12);

        let swapped = marginal_probabilities(&sv, &map, &[Wire(1), Wire(0)]).unwrap();
        let full = exact_probabilities(&sv, &map);
        assert!((full.get(&[0, 1]).unwrap() - 0.5).abs() < 1e-12);
        assert!((swapped.get(&[1, 0]).unwrap() - 0.5).abs() < 1e-12);
        assert!(swapped.get(&[0, 0]).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_marginal_over_all_wires_equals_exact() {
        let map = WireMap::contiguous(3);
        let mut sv = StateVector::new(3).unwrap();
        sv.apply(&GateKind::Rot.matrix(&[0.542, 1.3432, -0.654]).unwrap(), &[1])
            .unwrap();
        sv.apply(&GateKind::CNOT.matrix(&[]).unwrap(), &[1, 2]).unwrap();

        let full = exact_probabilities(&sv, &map);
        let marginal = marginal_probabilities(&sv, &map, map.labels()).unwrap();
        for (a, b) in full.values().iter().zip(marginal.values()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_marginal_over_no_wires() {
        let map = WireMap::contiguous(2);
        let sv = StateVector::new(2).unwrap();
        let probs = marginal_probabilities(&sv, &map, &[]).unwrap();
        assert_eq!(probs.values(), &[1.0]);
        assert_eq!(probs.to_bitstring_map().get(""), Some(&1.0));
    }

    #[test]
    fn test_iter_and_bitstrings() {
        let map = WireMap::contiguous(2);
        let sv = StateVector::new(2).unwrap();
        let probs = exact_probabilities(&sv, &map);
        let patterns: Vec<Vec<u8>> = probs.iter().map(|(bits, _)| bits).collect();
        assert_eq!(patterns, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
        let keys: Vec<String> = probs.to_bitstring_map().into_keys().collect();
        assert_eq!(keys, vec!["00", "01", "10", "11"]);
    }

    #[test]
    fn test_sample_deterministic_state() {
        let map = WireMap::contiguous(2);
        let mut sv = StateVector::new(2).unwrap();
        sv.apply(&GateKind::PauliX.matrix(&[]).unwrap(), &[0]).unwrap();
        let probs = exact_probabilities(&sv, &map);

        let mut rng = StdRng::seed_from_u64(7);
        let counts = sample(&probs, 100, &mut rng);
        assert_eq!(counts.get("10"), 100);
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_sample_is_reproducible() {
        let map = WireMap::contiguous(1);
        let mut sv = StateVector::new(1).unwrap();
        sv.apply(&GateKind::Hadamard.matrix(&[]).unwrap(), &[0]).unwrap();
        let probs = exact_probabilities(&sv, &map);

        let a = sample(&probs, 1000, &mut StdRng::seed_from_u64(42));
        let b = sample(&probs, 1000, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert_eq!(a.total_shots(), 1000);
        assert!(a.get("0") > 400 && a.get("1") > 400);
    }
}
