//! qsv State-Vector Core
//!
//! This crate holds the numerical heart of the qsv simulator: an N-wire
//! amplitude vector and the machinery to evolve and observe it.
//!
//! # Core Components
//!
//! - **Wires**: [`Wire`] labels and the [`WireMap`] that binds them to tensor
//!   axes, together with the index conventions (see [`wire`])
//! - **Gates**: the closed [`GateKind`] registry producing dense [`GateMatrix`]
//!   operators from a name and parameters
//! - **State**: [`StateVector`], which prepares basis or arbitrary states and
//!   contracts `2^k × 2^k` matrices into the amplitudes in `O(2^n · 2^k)`
//! - **Read-out**: exact and marginal [`ProbabilityMap`]s, shot sampling into
//!   [`Counts`], and [`Observable`] expectation values
//!
//! # Example: Bell State
//!
//! ```rust
//! use qsv_core::{GateKind, StateVector, Wire, WireMap, probability};
//!
//! let map = WireMap::contiguous(2);
//! let mut sv = StateVector::new(2).unwrap();
//!
//! let h = GateKind::Hadamard.matrix(&[]).unwrap();
//! let cnot = GateKind::CNOT.matrix(&[]).unwrap();
//! sv.apply(&h, &map.positions(&[Wire(0)]).unwrap()).unwrap();
//! sv.apply(&cnot, &map.positions(&[Wire(0), Wire(1)]).unwrap()).unwrap();
//!
//! let probs = probability::exact_probabilities(&sv, &map);
//! assert!((probs.get(&[0, 0]).unwrap() - 0.5).abs() < 1e-12);
//! assert!((probs.get(&[1, 1]).unwrap() - 0.5).abs() < 1e-12);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Wires | Parameters |
//! |------|-------|------------|
//! | `Identity`, `PauliX`, `PauliY`, `PauliZ`, `Hadamard` | 1 | 0 |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | 0 |
//! | `PhaseShift`, `RX`, `RY`, `RZ` | 1 | 1 |
//! | `Rot` | 1 | 3 |
//! | `CNOT`, `CZ`, `SWAP` | 2 | 0 |
//! | `CRZ` | 2 | 1 |
//! | `Toffoli`, `CSWAP` | 3 | 0 |

pub mod counts;
pub mod error;
pub mod gate;
pub mod matrix;
pub mod observable;
pub mod probability;
pub mod statevector;
pub mod wire;

pub use counts::Counts;
pub use error::{SimError, SimResult};
pub use gate::GateKind;
pub use matrix::GateMatrix;
pub use observable::{Observable, ObservableTerm};
pub use probability::ProbabilityMap;
pub use statevector::StateVector;
pub use wire::{Wire, WireMap};
