//! qsv Simulator Device
//!
//! This crate wraps the [`qsv_core`] state vector in a device that accepts
//! operations by wire label, enforces ordering rules, and offers the read-outs
//! a caller needs.
//!
//! # Overview
//!
//! - [`Device`] applies [`Operation`]s one at a time or as an explicit sequence
//! - [`DeviceConfig`] carries shots, sampling seed, strict checks and limits,
//!   loaded from YAML and environment variables
//! - [`logging::init_tracing`] installs a `tracing` subscriber for applications
//!   that do not bring their own
//!
//! # Read-out Modes
//!
//! | Call | Returns | Notes |
//! |------|---------|-------|
//! | [`Device::read_amplitudes`] | `Vec<Complex64>` | first wire is the MSB |
//! | [`Device::read_probabilities`] | [`ProbabilityMap`](qsv_core::ProbabilityMap) | exact, optionally marginalized |
//! | [`Device::expectation`] | `f64` | tensor product of observables |
//! | [`Device::sample`] | [`Counts`](qsv_core::Counts) | needs `shots` configured |
//!
//! # Example: Prepared State
//!
//! ```rust
//! use num_complex::Complex64;
//! use qsv_core::{GateKind, Wire};
//! use qsv_device::Device;
//!
//! let mut device = Device::new(1).unwrap();
//! device
//!     .apply_state_vector(&[Wire(0)], &[Complex64::new(0.6, 0.0), Complex64::new(0.8, 0.0)])
//!     .unwrap();
//! device.apply_named(GateKind::PauliX.name(), &[Wire(0)], &[]).unwrap();
//!
//! let amps = device.read_amplitudes();
//! assert!((amps[0].re - 0.8).abs() < 1e-12);
//! assert!((amps[1].re - 0.6).abs() < 1e-12);
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod logging;
pub mod operation;

pub use config::DeviceConfig;
pub use device::Device;
pub use error::{DeviceError, DeviceResult};
pub use logging::{LogFormat, LoggingConfig, init_tracing};
pub use operation::{Operation, OperationKind};
