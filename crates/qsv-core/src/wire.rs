//! Wire labels and the mapping from labels to tensor axes.
//!
//! # Index conventions
//!
//! The amplitude buffer is stored with the wire at position `p` (its index in
//! the device's declared wire list) as bit `p` of the flat index, so the first
//! declared wire is the least significant bit.
//!
//! Everything the caller sees uses the opposite, external convention: the
//! first wire of a list is the most significant bit. This holds for
//!
//! - gate matrices, whose row/column index is read MSB-first over the
//!   operation's wires,
//! - state vectors and basis indices handed to the device, and
//! - every read-out.
//!
//! Converting a full buffer between the two conventions reverses the bits of
//! each index, which is the same as transposing all axes of the rank-N tensor.
//! Read-outs pay for this once; gate application never does.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SimError, SimResult};

/// Label identifying one qubit of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Wire(pub u32);

impl Wire {
    /// The labels `0..n`.
    pub fn range(n: u32) -> Vec<Wire> {
        (0..n).map(Wire).collect()
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

impl From<u32> for Wire {
    fn from(label: u32) -> Self {
        Wire(label)
    }
}

/// Maps the wire labels of a device to axis positions of its amplitude tensor.
#[derive(Debug, Clone)]
pub struct WireMap {
    labels: Vec<Wire>,
    positions: FxHashMap<Wire, usize>,
}

impl WireMap {
    /// Build a map from the device's ordered label list.
    pub fn new(labels: impl IntoIterator<Item = Wire>) -> SimResult<Self> {
        let labels: Vec<Wire> = labels.into_iter().collect();
        let mut positions = FxHashMap::default();
        for (pos, &wire) in labels.iter().enumerate() {
            if positions.insert(wire, pos).is_some() {
                return Err(SimError::DuplicateWire(wire));
            }
        }
        Ok(Self { labels, positions })
    }

    /// A map over the labels `0..num_wires`.
    pub fn contiguous(num_wires: u32) -> Self {
        let labels = Wire::range(num_wires);
        let positions = labels.iter().enumerate().map(|(p, &w)| (w, p)).collect();
        Self { labels, positions }
    }

    /// Number of wires on the device.
    #[inline]
    pub fn num_wires(&self) -> usize {
        self.labels.len()
    }

    /// Declared labels, in device order.
    pub fn labels(&self) -> &[Wire] {
        &self.labels
    }

    /// Axis position of a single label.
    pub fn position(&self, wire: Wire) -> SimResult<usize> {
        self.positions
            .get(&wire)
            .copied()
            .ok_or(SimError::UnknownWire {
                wire,
                num_wires: self.num_wires(),
            })
    }

    /// Axis positions of an operation's wires, in operation order.
    ///
    /// Operation order, not device order, decides which axis is bound to
    /// which bit of the gate matrix index.
    pub fn positions(&self, wires: &[Wire]) -> SimResult<Vec<usize>> {
        let mut out = Vec::with_capacity(wires.len());
        for &wire in wires {
            let pos = self.position(wire)?;
            if out.contains(&pos) {
                return Err(SimError::DuplicateWire(wire));
            }
            out.push(pos);
        }
        Ok(out)
    }
}

/// Reverse the lowest `num_bits` bits of `index`.
#[inline]
pub fn reverse_bits(index: usize, num_bits: usize) -> usize {
    if num_bits == 0 {
        return 0;
    }
    index.reverse_bits() >> (usize::BITS as usize - num_bits)
}

/// Reorder an internally stored buffer into the external convention.
///
/// Equivalent to reshaping into `[2; N]`, transposing every axis and
/// flattening again.
pub fn to_external_order<T: Copy>(buffer: &[T]) -> Vec<T> {
    let num_bits = buffer.len().trailing_zeros() as usize;
    let mut out = buffer.to_vec();
    for (i, &value) in buffer.iter().enumerate() {
        out[reverse_bits(i, num_bits)] = value;
    }
    out
}

/// Flat-index offsets of the `2^k` basis states spanned by `positions`.
///
/// `offsets[r]` sets the bits of the internal index that correspond to
/// matrix row `r`, reading `r` most-significant-bit first over `positions`.
pub fn block_offsets(positions: &[usize]) -> Vec<usize> {
    let k = positions.len();
    (0..1usize << k)
        .map(|r| {
            positions
                .iter()
                .enumerate()
                .filter(|&(j, _)| (r >> (k - 1 - j)) & 1 == 1)
                .fold(0, |acc, (_, &pos)| acc | (1 << pos))
        })
        .collect()
}

/// All flat indices of an `num_wires`-wire buffer whose `positions` bits are
/// clear, in increasing order.
pub fn base_indices(num_wires: usize, positions: &[usize]) -> impl Iterator<Item = usize> {
    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    let free = num_wires - positions.len();
    (0..1usize << free).map(move |mut idx| {
        for &p in &sorted {
            let low = idx & ((1 << p) - 1);
            idx = ((idx >> p) << (p + 1)) | low;
        }
        idx
    })
}

/// Integer index of an MSB-first list of bits.
pub fn index_for_bits(bits: &[u8]) -> SimResult<u64> {
    bits.iter().try_fold(0u64, |acc, &bit| match bit {
        0 | 1 => Ok((acc << 1) | u64::from(bit)),
        other => Err(SimError::InvalidBasisBit(other)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_display() {
        assert_eq!(format!("{}", Wire(3)), "w3");
    }

    #[test]
    fn test_positions_follow_operation_order() {
        let map = WireMap::new([Wire(10), Wire(20), Wire(30)]).unwrap();
        assert_eq!(map.positions(&[Wire(30), Wire(10)]).unwrap(), vec![2, 0]);
    }

    #[test]
    fn test_duplicate_label_rejected() {
        assert!(matches!(
            WireMap::new([Wire(0), Wire(0)]),
            Err(SimError::DuplicateWire(Wire(0)))
        ));

        let map = WireMap::contiguous(3);
        assert!(matches!(
            map.positions(&[Wire(1), Wire(1)]),
            Err(SimError::DuplicateWire(Wire(1)))
        ));
    }

    #[test]
    fn test_contiguous_labels() {
        let map = WireMap::contiguous(4);
        assert_eq!(map.labels(), Wire::range(4).as_slice());
        assert_eq!(map.position(Wire(3)).unwrap(), 3);
        assert!(WireMap::contiguous(0).labels().is_empty());
    }

    #[test]
    fn test_unknown_wire() {
        let map = WireMap::contiguous(2);
        assert!(matches!(
            map.position(Wire(5)),
            Err(SimError::UnknownWire { wire: Wire(5), num_wires: 2 })
        ));
    }

    #[test]
    fn test_reverse_bits() {
        assert_eq!(reverse_bits(0b0010, 4), 0b0100);
        assert_eq!(reverse_bits(0b110, 3), 0b011);
        assert_eq!(reverse_bits(1, 1), 1);
        assert_eq!(reverse_bits(0, 0), 0);
    }

    #[test]
    fn test_external_order_is_axis_transpose() {
        // 3 wires: internal index bits (w2 w1 w0) -> external bits (w0 w1 w2)
        let buffer: Vec<usize> = (0..8).collect();
        let external = to_external_order(&buffer);
        assert_eq!(external, vec![0, 4, 2, 6, 1, 5, 3, 7]);
        assert_eq!(to_external_order(&external), buffer);
    }

    #[test]
    fn test_block_offsets_msb_first() {
        // Row index bit 1 -> position 2, row index bit 0 -> position 0
        assert_eq!(block_offsets(&[2, 0]), vec![0, 1, 4, 5]);
        assert_eq!(block_offsets(&[0, 2]), vec![0, 4, 1, 5]);
        assert_eq!(block_offsets(&[]), vec![0]);
    }

    #[test]
    fn test_base_indices_skip_target_bits() {
        let bases: Vec<usize> = base_indices(3, &[1]).collect();
        assert_eq!(bases, vec![0, 1, 4, 5]);

        let bases: Vec<usize> = base_indices(3, &[2, 0]).collect();
        assert_eq!(bases, vec![0, 2]);

        let bases: Vec<usize> = base_indices(2, &[0, 1]).collect();
        assert_eq!(bases, vec![0]);
    }

    #[test]
    fn test_index_for_bits() {
        assert_eq!(index_for_bits(&[0, 0, 1, 0]).unwrap(), 2);
        assert_eq!(index_for_bits(&[1, 0, 0, 0]).unwrap(), 8);
        assert_eq!(index_for_bits(&[]).unwrap(), 0);
        assert!(matches!(
            index_for_bits(&[0, 2]),
            Err(SimError::InvalidBasisBit(2))
        ));
    }
}
