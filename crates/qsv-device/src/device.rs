//! The device controller.

use num_complex::Complex64;
use qsv_core::statevector::{check_normalized, check_unitary};
use qsv_core::{
    Counts, GateKind, GateMatrix, ObservableTerm, ProbabilityMap, SimError, StateVector, Wire,
    WireMap, observable, probability,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument, warn};

use crate::config::DeviceConfig;
use crate::error::{DeviceError, DeviceResult};
use crate::operation::{Operation, OperationKind};

/// A state-vector simulator device.
///
/// Operations are applied one at a time, in the order they are given. Every
/// operation is validated in full before the state is touched, so a rejected
/// operation leaves the device exactly as it was.
///
/// # Example
///
/// ```
/// use qsv_core::{GateKind, Wire};
/// use qsv_device::{Device, Operation};
///
/// let mut device = Device::new(2).unwrap();
/// device.execute(&[
///     Operation::gate(GateKind::Hadamard, [Wire(0)]),
///     Operation::gate(GateKind::CNOT, [Wire(0), Wire(1)]),
/// ]).unwrap();
///
/// let probs = device.read_probabilities(None).unwrap();
/// assert!((probs.get(&[0, 0]).unwrap() - 0.5).abs() < 1e-10);
/// assert!((probs.get(&[1, 1]).unwrap() - 0.5).abs() < 1e-10);
/// ```
#[derive(Debug)]
pub struct Device {
    config: DeviceConfig,
    wires: WireMap,
    state: StateVector,
    operations_applied: usize,
    rng: StdRng,
}

impl Device {
    /// Short name of this device.
    pub const SHORT_NAME: &'static str = "qsv.statevector";

    /// Create a device with wires `0..num_wires` and default configuration.
    pub fn new(num_wires: usize) -> DeviceResult<Self> {
        Self::with_config(num_wires, DeviceConfig::default())
    }

    /// Create a device with wires `0..num_wires`.
    pub fn with_config(num_wires: usize, config: DeviceConfig) -> DeviceResult<Self> {
        let too_many = DeviceError::TooManyWires {
            requested: num_wires,
            max: config.max_wires,
        };
        if num_wires > config.max_wires {
            return Err(too_many);
        }
        let count = u32::try_from(num_wires).map_err(|_| too_many)?;
        Self::with_wires(Wire::range(count), config)
    }

    /// Create a device over the given wire labels.
    ///
    /// The first label is the most significant bit of every read-out index.
    pub fn with_wires(
        labels: impl IntoIterator<Item = Wire>,
        config: DeviceConfig,
    ) -> DeviceResult<Self> {
        config.validate()?;
        let wires = WireMap::new(labels)?;
        if wires.num_wires() > config.max_wires {
            return Err(DeviceError::TooManyWires {
                requested: wires.num_wires(),
                max: config.max_wires,
            });
        }
        Self::build(wires, config)
    }

    fn build(wires: WireMap, config: DeviceConfig) -> DeviceResult<Self> {
        let state = StateVector::new(wires.num_wires())?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!(
            num_wires = wires.num_wires(),
            shots = ?config.shots,
            strict = config.strict,
            "created device"
        );
        Ok(Self {
            state,
            wires,
            config,
            operations_applied: 0,
            rng,
        })
    }

    /// Number of wires.
    pub fn num_wires(&self) -> usize {
        self.wires.num_wires()
    }

    /// Wire labels in declaration order.
    pub fn wires(&self) -> &[Wire] {
        self.wires.labels()
    }

    /// The device configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Configured shots, if any.
    pub fn shots(&self) -> Option<u32> {
        self.config.shots
    }

    /// Number of operations applied since construction or the last reset.
    pub fn operations_applied(&self) -> usize {
        self.operations_applied
    }

    /// Apply a single operation.
    #[instrument(skip(self, op), fields(op = op.name()))]
    pub fn apply(&mut self, op: &Operation) -> DeviceResult<()> {
        let result = match &op.kind {
            OperationKind::BasisState { index } => self.apply_basis_state(&op.wires, *index),
            OperationKind::StateVector { amplitudes } => {
                self.apply_state_vector(&op.wires, amplitudes)
            }
            OperationKind::Unitary { matrix } => self.apply_unitary(matrix, &op.wires),
            OperationKind::Gate { name, params } => self.apply_named(name, &op.wires, params),
        };
        if let Err(e) = &result {
            debug!(error = %e, "operation rejected");
        }
        result
    }

    /// Apply operations in order, stopping at the first failure.
    ///
    /// Operations before the failing one stay applied.
    #[instrument(skip_all)]
    pub fn execute<'a>(
        &mut self,
        ops: impl IntoIterator<Item = &'a Operation>,
    ) -> DeviceResult<()> {
        for op in ops {
            self.apply(op)?;
        }
        Ok(())
    }

    /// Prepare the basis state `index`, read most significant bit first over
    /// `wires`, which must cover the device.
    ///
    /// Only allowed as the first operation on the device.
    pub fn apply_basis_state(&mut self, wires: &[Wire], index: u64) -> DeviceResult<()> {
        if self.operations_applied > 0 {
            return Err(SimError::OperationOrder("BasisState".to_string()).into());
        }
        let positions = self.wires.positions(wires)?;
        self.state.initialize_basis(&positions, index)?;
        self.record("BasisState", wires);
        Ok(())
    }

    /// Load `vector` as the amplitudes of `wires`; any other wire is left in |0⟩.
    pub fn apply_state_vector(&mut self, wires: &[Wire], vector: &[Complex64]) -> DeviceResult<()> {
        let positions = self.wires.positions(wires)?;
        if self.config.strict && vector.len() == 1 << positions.len() {
            self.strict_check("QubitStateVector", check_normalized(vector, self.config.tolerance))?;
        }
        self.state.initialize_statevector(&positions, vector)?;
        self.record("QubitStateVector", wires);
        Ok(())
    }

    /// Apply an explicit matrix to `wires`.
    pub fn apply_unitary(&mut self, matrix: &GateMatrix, wires: &[Wire]) -> DeviceResult<()> {
        let positions = self.wires.positions(wires)?;
        let dim = 1 << positions.len();
        if self.config.strict && matrix.dim() == (dim, dim) {
            self.strict_check("QubitUnitary", check_unitary(matrix, self.config.tolerance))?;
        }
        self.state.apply(matrix, &positions)?;
        self.record("QubitUnitary", wires);
        Ok(())
    }

    /// Apply a library gate by name.
    pub fn apply_named(&mut self, name: &str, wires: &[Wire], params: &[f64]) -> DeviceResult<()> {
        let gate =
            GateKind::from_name(name).ok_or_else(|| SimError::UnknownOperation(name.to_string()))?;
        if wires.len() != gate.num_wires() {
            return Err(SimError::WireCountMismatch {
                gate: name.to_string(),
                expected: gate.num_wires(),
                got: wires.len(),
            }
            .into());
        }
        let matrix = gate.matrix(params)?;
        let positions = self.wires.positions(wires)?;
        self.state.apply(&matrix, &positions)?;
        self.record(name, wires);
        Ok(())
    }

    fn strict_check(&self, name: &str, check: Result<(), SimError>) -> DeviceResult<()> {
        check.map_err(|e| {
            warn!(op = name, error = %e, "strict check failed");
            e.into()
        })
    }

    fn record(&mut self, name: &str, wires: &[Wire]) {
        self.operations_applied += 1;
        debug!(
            op = name,
            wires = ?wires,
            k = wires.len(),
            applied = self.operations_applied,
            "applied operation"
        );
    }

    /// Amplitudes in external order: the first wire is the most significant
    /// bit of the index.
    pub fn read_amplitudes(&self) -> Vec<Complex64> {
        self.state.to_external()
    }

    /// Exact probabilities, over every wire or marginalized onto `wires`.
    ///
    /// Configured shots have no effect here; see [`Device::sample`].
    pub fn read_probabilities(&self, wires: Option<&[Wire]>) -> DeviceResult<ProbabilityMap> {
        let probs = match wires {
            None => probability::exact_probabilities(&self.state, &self.wires),
            Some(wires) => probability::marginal_probabilities(&self.state, &self.wires, wires)?,
        };
        Ok(probs)
    }

    /// Expectation value of a tensor product of observables.
    pub fn expectation(&self, terms: &[ObservableTerm]) -> DeviceResult<f64> {
        Ok(observable::expectation(&self.state, &self.wires, terms)?)
    }

    /// Draw the configured number of shots from the probabilities over
    /// `wires` (or every wire).
    ///
    /// Fails if the device has no shots configured.
    pub fn sample(&mut self, wires: Option<&[Wire]>) -> DeviceResult<Counts> {
        let shots = self.config.shots.ok_or_else(|| {
            DeviceError::InvalidShots("device is analytic; configure shots to sample".to_string())
        })?;
        let probs = self.read_probabilities(wires)?;
        let counts = probability::sample(&probs, shots, &mut self.rng);
        debug!(shots, outcomes = counts.len(), "sampled");
        Ok(counts)
    }

    /// Return to |0...0⟩ and clear the applied-operation count.
    pub fn reset(&mut self) {
        self.state.reset();
        self.operations_applied = 0;
        debug!("device reset");
    }
}
