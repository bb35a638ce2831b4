use itertools::Itertools;
use rand::rngs::StdRng;

use crate::{
    builder::construct_circuit,
    config::CheckerConfig,
    decision::{correlated_probabilities, ConsistencyDecision},
    error::Result,
    executor::{Executor, SamplingExecutor, StatevectorExecutor},
    spec::Specification,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantumVerdict {
    pub consistent: bool,
    /// `C`, for diagnostics
    pub statistic: f64,
    /// `[P_0011, P_1100]`
    pub probabilities: [f64; 2],
}

/// Quantum engine: builds the mirrored circuit, runs it and decides.
pub struct QuantumChecker<E> {
    executor: E,
    config: CheckerConfig,
}

impl QuantumChecker<StatevectorExecutor> {
    /// Noiseless checker on exact probabilities.
    pub fn exact(config: CheckerConfig) -> Self {
        let executor = StatevectorExecutor::new(config.max_group_qubits);
        Self::new(executor, config)
    }
}

impl QuantumChecker<SamplingExecutor<StdRng>> {
    /// Checker on `config.shots` sampled measurements.
    pub fn sampling(config: CheckerConfig) -> Self {
        let exact = StatevectorExecutor::new(config.max_group_qubits);
        let executor = match config.seed {
            Some(seed) => SamplingExecutor::seeded(exact, seed),
            None => SamplingExecutor::from_entropy(exact),
        };
        Self::new(executor, config)
    }
}

impl<E: Executor> QuantumChecker<E> {
    pub fn new(executor: E, config: CheckerConfig) -> Self {
        Self { executor, config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn check(&mut self, spec: &Specification) -> Result<QuantumVerdict> {
        let circuit = construct_circuit(spec)?;
        let outcomes = self.executor.execute(&circuit, self.config.shots)?;
        log::debug!(
            "outcomes: {}",
            outcomes.iter().map(|(pattern, p)| format!("{pattern}={p:.6}")).join(" ")
        );
        let probabilities = correlated_probabilities(&outcomes)?;
        let verdict = ConsistencyDecision::new(self.config.epsilon).decide(probabilities)?;

        if verdict.consistent {
            log::info!("the system is consistent, C={}", verdict.statistic);
        } else {
            log::info!("the system is inconsistent, C={}", verdict.statistic);
        }

        Ok(QuantumVerdict {
            consistent: verdict.consistent,
            statistic: verdict.statistic,
            probabilities,
        })
    }
}
