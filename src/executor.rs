use std::f64::consts::FRAC_1_SQRT_2;

use itertools::Itertools;
use num::complex::Complex64;
use num::Zero;
use petgraph::unionfind::UnionFind;
use rand::{distributions::WeightedIndex, prelude::Distribution, rngs::StdRng, Rng, SeedableRng};
use rustc_hash::FxHashMap;

use crate::{
    circuit::{Circuit, QGate, Qubit},
    error::ExecutionError,
};

/// Runs a measured circuit and reports outcome probabilities.
pub trait Executor {
    fn execute(&mut self, circuit: &Circuit, shots: u32) -> Result<Outcomes, ExecutionError>;
}

impl<F> Executor for F
where
    F: FnMut(&Circuit, u32) -> Result<Outcomes, ExecutionError>,
{
    fn execute(&mut self, circuit: &Circuit, shots: u32) -> Result<Outcomes, ExecutionError> {
        self(circuit, shots)
    }
}

/// Probabilities keyed by classical bit string, classical bit 0 rightmost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcomes {
    width: usize,
    probabilities: FxHashMap<String, f64>,
}

impl Outcomes {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            probabilities: FxHashMap::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Add `probability` to `pattern`.
    pub fn record<P: Into<String>>(&mut self, pattern: P, probability: f64) {
        *self.probabilities.entry(pattern.into()).or_default() += probability;
    }

    /// Probability of `pattern`, zero when it was never observed.
    pub fn probability(&self, pattern: &str) -> f64 {
        self.probabilities.get(pattern).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.probabilities.values().sum()
    }

    /// Outcomes in bit string order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.probabilities
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .sorted_by(|a, b| a.0.cmp(b.0))
    }

    fn from_distribution(width: usize, distribution: &FxHashMap<u64, f64>) -> Self {
        let mut outcomes = Self::new(width);
        for (value, probability) in distribution {
            outcomes.record(format!("{value:0width$b}"), *probability);
        }
        outcomes
    }
}

/// Exact, noiseless probabilities from state vector simulation.
///
/// Qubits connected by multi-qubit gates form a group; every group that holds a
/// measured qubit is simulated on its own and the group marginals are multiplied.
#[derive(Debug, Clone)]
pub struct StatevectorExecutor {
    max_group_qubits: usize,
}

impl Default for StatevectorExecutor {
    fn default() -> Self {
        Self::new(24)
    }
}

impl StatevectorExecutor {
    pub fn new(max_group_qubits: usize) -> Self {
        Self { max_group_qubits }
    }

    /// Joint distribution over the classical register value.
    pub fn distribution(&self, circuit: &Circuit) -> Result<FxHashMap<u64, f64>, ExecutionError> {
        if circuit.classical_register().is_none() {
            return Err(ExecutionError::NoMeasurements);
        }

        let measured = measurements(circuit)?;
        let qubit_count = circuit.num_qubits() as usize;

        let mut groups = UnionFind::<usize>::new(qubit_count);
        for gate in &circuit.gates {
            let qubits = gate.qubits();
            for pair in qubits.windows(2) {
                groups.union(pair[0].index() as usize, pair[1].index() as usize);
            }
        }

        let mut members: FxHashMap<usize, Vec<Qubit>> = FxHashMap::default();
        for (qubit, label) in groups.into_labeling().into_iter().enumerate() {
            members.entry(label).or_default().push(Qubit::new(qubit as u32));
        }

        let mut joint = FxHashMap::default();
        joint.insert(0u64, 1.0);

        for (_, qubits) in members.into_iter().sorted_by_key(|(label, _)| *label) {
            if !qubits.iter().any(|q| measured.contains_key(q)) {
                continue;
            }
            if qubits.len() > self.max_group_qubits {
                return Err(ExecutionError::TooManyQubits {
                    qubits: qubits.len(),
                    limit: self.max_group_qubits,
                });
            }

            let marginal = simulate_group(circuit, &qubits, &measured);
            joint = joint
                .iter()
                .cartesian_product(marginal.iter())
                .map(|((a, pa), (b, pb))| (a | b, pa * pb))
                .filter(|(_, p)| *p > 0.0)
                .collect();
        }

        Ok(joint)
    }
}

impl Executor for StatevectorExecutor {
    fn execute(&mut self, circuit: &Circuit, _shots: u32) -> Result<Outcomes, ExecutionError> {
        let width = classical_width(circuit)?;
        let distribution = self.distribution(circuit)?;
        Ok(Outcomes::from_distribution(width, &distribution))
    }
}

/// Empirical frequencies of `shots` samples drawn from the exact distribution.
#[derive(Debug, Clone)]
pub struct SamplingExecutor<R> {
    exact: StatevectorExecutor,
    rng: R,
}

impl<R: Rng> SamplingExecutor<R> {
    pub fn new(exact: StatevectorExecutor, rng: R) -> Self {
        Self { exact, rng }
    }
}

impl SamplingExecutor<StdRng> {
    pub fn seeded(exact: StatevectorExecutor, seed: u64) -> Self {
        Self::new(exact, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(exact: StatevectorExecutor) -> Self {
        Self::new(exact, StdRng::from_entropy())
    }
}

impl<R: Rng> Executor for SamplingExecutor<R> {
    fn execute(&mut self, circuit: &Circuit, shots: u32) -> Result<Outcomes, ExecutionError> {
        if shots == 0 {
            return Err(ExecutionError::NoShots);
        }

        let width = classical_width(circuit)?;
        let (values, weights): (Vec<u64>, Vec<f64>) = self
            .exact
            .distribution(circuit)?
            .into_iter()
            .sorted_by_key(|(value, _)| *value)
            .unzip();
        let index =
            WeightedIndex::new(&weights).map_err(|e| ExecutionError::Backend(e.to_string()))?;

        let mut counts: FxHashMap<u64, u32> = FxHashMap::default();
        for _ in 0..shots {
            *counts.entry(values[index.sample(&mut self.rng)]).or_default() += 1;
        }
        log::trace!("sampled {} distinct outcomes from {shots} shots", counts.len());

        let frequencies = counts
            .into_iter()
            .map(|(value, count)| (value, f64::from(count) / f64::from(shots)))
            .collect();
        Ok(Outcomes::from_distribution(width, &frequencies))
    }
}

fn classical_width(circuit: &Circuit) -> Result<usize, ExecutionError> {
    circuit
        .classical_register()
        .map(|creg| creg.size as usize)
        .ok_or(ExecutionError::NoMeasurements)
}

/// Measured qubits and their classical bits.
///
/// Measurements must come after every gate on their qubit.
fn measurements(circuit: &Circuit) -> Result<FxHashMap<Qubit, u32>, ExecutionError> {
    let mut measured = FxHashMap::default();
    for gate in &circuit.gates {
        if let QGate::Measure { qubit, clbit } = gate {
            measured.insert(*qubit, *clbit);
        } else if let Some(q) = gate.qubits().into_iter().find(|q| measured.contains_key(q)) {
            return Err(ExecutionError::Backend(format!(
                "gate on {} after its measurement",
                circuit.describe(q)
            )));
        }
    }
    Ok(measured)
}

/// Marginal distribution of the measured qubits of one group.
fn simulate_group(
    circuit: &Circuit,
    qubits: &[Qubit],
    measured: &FxHashMap<Qubit, u32>,
) -> FxHashMap<u64, f64> {
    let local: FxHashMap<Qubit, usize> = qubits.iter().enumerate().map(|(i, q)| (*q, i)).collect();

    let mut state = vec![Complex64::zero(); 1 << qubits.len()];
    state[0] = Complex64::new(1.0, 0.0);

    for gate in &circuit.gates {
        if !local.contains_key(&gate.target()) {
            continue;
        }
        match gate {
            QGate::H(target) => apply_h(&mut state, &[], local[target]),
            QGate::MultiCX { controls, target } => {
                let controls = controls.iter().map(|(q, v)| (local[q], *v)).collect_vec();
                apply_x(&mut state, &controls, local[target]);
            }
            QGate::CH { control, target } => {
                apply_h(&mut state, &[(local[control], true)], local[target]);
            }
            QGate::CX { control, target } => {
                apply_x(&mut state, &[(local[control], true)], local[target]);
            }
            QGate::Measure { .. } => {}
        }
    }

    let readout = qubits
        .iter()
        .enumerate()
        .filter_map(|(i, q)| measured.get(q).map(|clbit| (i, *clbit)))
        .collect_vec();

    let mut marginal = FxHashMap::default();
    for (basis, amplitude) in state.iter().enumerate() {
        let probability = amplitude.norm_sqr();
        if probability == 0.0 {
            continue;
        }
        let value = readout
            .iter()
            .filter(|(i, _)| basis >> i & 1 == 1)
            .fold(0u64, |acc, (_, clbit)| acc | 1 << clbit);
        *marginal.entry(value).or_default() += probability;
    }
    marginal
}

fn controls_fire(basis: usize, controls: &[(usize, bool)]) -> bool {
    controls
        .iter()
        .all(|(control, value)| (basis >> control & 1 == 1) == *value)
}

fn apply_x(state: &mut [Complex64], controls: &[(usize, bool)], target: usize) {
    let mask = 1 << target;
    for basis in 0..state.len() {
        if basis & mask == 0 && controls_fire(basis, controls) {
            state.swap(basis, basis | mask);
        }
    }
}

fn apply_h(state: &mut [Complex64], controls: &[(usize, bool)], target: usize) {
    let mask = 1 << target;
    for basis in 0..state.len() {
        if basis & mask == 0 && controls_fire(basis, controls) {
            let (zero, one) = (state[basis], state[basis | mask]);
            state[basis] = (zero + one) * FRAC_1_SQRT_2;
            state[basis | mask] = (zero - one) * FRAC_1_SQRT_2;
        }
    }
}
