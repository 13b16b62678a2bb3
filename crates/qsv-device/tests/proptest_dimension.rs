//! Property-based tests for size validation.
//!
//! A state vector or matrix whose size does not match its wires must be
//! rejected as a dimension error without touching the device.

use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;
use qsv_core::Wire;
use qsv_device::{Device, DeviceConfig};

/// Register size, operation wires and a prefix of Hadamards to apply first.
fn arb_device_layout() -> impl Strategy<Value = (usize, Vec<Wire>, Vec<bool>)> {
    (1_usize..=4).prop_flat_map(|n| {
        (1..=n).prop_flat_map(move |k| {
            (
                Just(n),
                prop::sample::subsequence(Wire::range(n as u32), k).prop_shuffle(),
                prop::collection::vec(any::<bool>(), n),
            )
        })
    })
}

fn prepared_device(n: usize, hadamards: &[bool], strict: bool) -> Device {
    let config = DeviceConfig {
        strict,
        ..Default::default()
    };
    let mut dev = Device::with_config(n, config).unwrap();
    for (wire, _) in Wire::range(n as u32).into_iter().zip(hadamards).filter(|(_, h)| **h) {
        dev.apply_named("Hadamard", &[wire], &[]).unwrap();
    }
    dev
}

proptest! {
    #[test]
    fn wrong_vector_length_is_rejected(
        (n, wires, hadamards) in arb_device_layout(),
        len in 0_usize..=40,
        strict in any::<bool>(),
    ) {
        prop_assume!(len != 1 << wires.len());
        let mut dev = prepared_device(n, &hadamards, strict);
        let before = dev.read_amplitudes();
        let applied = dev.operations_applied();

        let vector = vec![Complex64::new(1.0, 0.0); len];
        let err = dev.apply_state_vector(&wires, &vector).unwrap_err();

        prop_assert!(err.is_dimension());
        prop_assert_eq!(dev.operations_applied(), applied);
        prop_assert_eq!(dev.read_amplitudes(), before);
    }

    #[test]
    fn wrong_matrix_shape_is_rejected(
        (n, wires, hadamards) in arb_device_layout(),
        rows in 1_usize..=17,
        cols in 1_usize..=17,
        strict in any::<bool>(),
    ) {
        let dim = 1 << wires.len();
        prop_assume!((rows, cols) != (dim, dim));
        let mut dev = prepared_device(n, &hadamards, strict);
        let before = dev.read_amplitudes();
        let applied = dev.operations_applied();

        let matrix = Array2::from_elem((rows, cols), Complex64::new(0.5, 0.0));
        let err = dev.apply_unitary(&matrix, &wires).unwrap_err();

        prop_assert!(err.is_dimension());
        prop_assert_eq!(dev.operations_applied(), applied);
        prop_assert_eq!(dev.read_amplitudes(), before);
    }
}
