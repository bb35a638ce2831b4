/// Settings of the quantum engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerConfig {
    /// Repetitions requested from the executor, ignored by exact backends
    pub shots: u32,
    /// Consistent iff the statistic is above this
    pub epsilon: f64,
    /// Seed for sampling backends, entropy when unset
    pub seed: Option<u64>,
    /// Largest qubit group the state vector backend will simulate
    pub max_group_qubits: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            shots: 1024,
            epsilon: 0.0,
            seed: None,
            max_group_qubits: 24,
        }
    }
}

impl CheckerConfig {
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_group_qubits(mut self, qubits: usize) -> Self {
        self.max_group_qubits = qubits;
        self
    }
}
