use crate::{error::ExecutionError, executor::Outcomes};

/// Outcomes where exactly one half fired its correlated `a1`/`a2` pair.
pub const CORRELATED_OUTCOMES: [&str; 2] = ["0011", "1100"];

/// `C = sqrt(2 * (P_0011 + P_1100))`
pub fn statistic(probabilities: [f64; 2]) -> f64 {
    (2.0 * (probabilities[0] + probabilities[1])).sqrt()
}

/// Exact rule: consistent iff `C > 0`.
pub fn check_consistency(probabilities: [f64; 2]) -> bool {
    statistic(probabilities) > 0.0
}

/// `[P_0011, P_1100]` from the four-bit measurement.
pub fn correlated_probabilities(outcomes: &Outcomes) -> Result<[f64; 2], ExecutionError> {
    if outcomes.width() != 4 {
        return Err(ExecutionError::Backend(format!(
            "expected 4 measured bits, got {}",
            outcomes.width()
        )));
    }

    let mut probabilities = [0.0; 2];
    for (slot, pattern) in probabilities.iter_mut().zip(CORRELATED_OUTCOMES) {
        *slot = outcomes.probability(pattern);
    }
    Ok(probabilities)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub consistent: bool,
    pub statistic: f64,
}

/// Threshold decision: consistent iff `C > epsilon`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConsistencyDecision {
    pub epsilon: f64,
}

impl ConsistencyDecision {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn decide(&self, probabilities: [f64; 2]) -> Result<Verdict, ExecutionError> {
        for (pattern, value) in CORRELATED_OUTCOMES.iter().zip(probabilities) {
            if !(0.0..=1.0).contains(&value) {
                return Err(ExecutionError::InvalidProbability {
                    outcome: pattern.to_string(),
                    value,
                });
            }
        }

        let statistic = statistic(probabilities);
        Ok(Verdict {
            consistent: statistic > self.epsilon,
            statistic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_rule() {
        assert!((statistic([0.25, 0.25]) - 1.0).abs() < 1e-12);
        assert!(check_consistency([0.25, 0.25]));
        assert_eq!(statistic([0.0, 0.0]), 0.0);
        assert!(!check_consistency([0.0, 0.0]));
        assert!(check_consistency([0.0, 1e-9]));
    }

    #[test]
    fn epsilon_threshold() {
        let decision = ConsistencyDecision::new(0.1);
        // C = sqrt(2 * 0.004) ~ 0.089
        assert!(!decision.decide([0.002, 0.002]).unwrap().consistent);
        assert!(decision.decide([0.25, 0.25]).unwrap().consistent);
        assert_eq!(
            ConsistencyDecision::default().decide([0.0, 0.0]),
            Ok(Verdict {
                consistent: false,
                statistic: 0.0
            })
        );
    }

    #[test]
    fn rejects_invalid_probabilities() {
        let decision = ConsistencyDecision::default();
        assert!(matches!(
            decision.decide([f64::NAN, 0.0]),
            Err(ExecutionError::InvalidProbability { .. })
        ));
        assert!(matches!(
            decision.decide([0.1, -0.5]),
            Err(ExecutionError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn reads_correlated_patterns() {
        let mut outcomes = Outcomes::new(4);
        outcomes.record("0011", 0.2);
        outcomes.record("1100", 0.3);
        outcomes.record("0000", 0.5);
        assert_eq!(correlated_probabilities(&outcomes), Ok([0.2, 0.3]));
        assert!(correlated_probabilities(&Outcomes::new(2)).is_err());
    }
}
