use itertools::Itertools;

use crate::{error::SpecificationError, spec::Specification};

/// All assignments of `n` variables in lexicographic order, `X0` most significant.
pub struct Assignments {
    next: Option<Vec<bool>>,
}

impl Assignments {
    pub fn new(variable_count: usize) -> Self {
        Self {
            next: Some(vec![false; variable_count]),
        }
    }
}

impl Iterator for Assignments {
    type Item = Vec<bool>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;

        let mut successor = current.clone();
        // binary increment from the least significant (last) position
        for bit in successor.iter_mut().rev() {
            *bit = !*bit;
            if *bit {
                self.next = Some(successor);
                break;
            }
        }

        Some(current)
    }
}

/// Outcome of an instrumented enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    /// First satisfying assignment in enumeration order
    pub witness: Option<Vec<bool>>,
    pub assignments_visited: u64,
    /// Number of term evaluations
    pub comparisons: u64,
}

impl Enumeration {
    pub fn is_consistent(&self) -> bool {
        self.witness.is_some()
    }
}

/// Walk the truth table until an assignment satisfies every term.
pub fn enumerate(spec: &Specification) -> Enumeration {
    let mut assignments_visited = 0;
    let mut comparisons = 0;

    for assignment in Assignments::new(spec.variable_count()) {
        assignments_visited += 1;

        let all_terms_satisfied = spec.terms().iter().all(|term| {
            comparisons += 1;
            term.admits(&assignment)
        });

        if all_terms_satisfied {
            log::debug!(
                "witness {} after {assignments_visited} assignments",
                format_assignment(&assignment)
            );
            return Enumeration {
                witness: Some(assignment),
                assignments_visited,
                comparisons,
            };
        }
    }

    log::debug!("no witness among {assignments_visited} assignments");
    Enumeration {
        witness: None,
        assignments_visited,
        comparisons,
    }
}

pub fn is_consistent(spec: &Specification) -> bool {
    enumerate(spec).is_consistent()
}

/// Classical check straight from `0/1/x` strings, one function per term.
pub fn check_specification_consistency<S: AsRef<str>>(
    variable_count: usize,
    terms: &[S],
) -> Result<bool, SpecificationError> {
    Ok(is_consistent(&Specification::from_terms(variable_count, terms)?))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTableRow {
    pub assignment: Vec<bool>,
    /// Value of every function oracle on this assignment
    pub functions: Vec<bool>,
    pub all_satisfied: bool,
}

/// Full truth table, one row per assignment.
pub fn truth_table(spec: &Specification) -> Vec<TruthTableRow> {
    Assignments::new(spec.variable_count())
        .map(|assignment| {
            let functions = spec
                .terms()
                .iter()
                .map(|term| term.admits(&assignment))
                .collect_vec();
            let all_satisfied = functions.iter().all(|f| *f);
            TruthTableRow {
                assignment,
                functions,
                all_satisfied,
            }
        })
        .collect()
}

pub fn format_assignment(assignment: &[bool]) -> String {
    assignment
        .iter()
        .map(|bit| if *bit { '1' } else { '0' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_order() {
        let all = Assignments::new(3).map(|a| format_assignment(&a)).collect_vec();
        assert_eq!(
            all,
            vec!["000", "001", "010", "011", "100", "101", "110", "111"]
        );
    }

    #[test]
    fn visits_everything_when_inconsistent() {
        for spec in [
            Specification::inconsistent_example(),
            Specification::inconsistent_example_full(),
        ] {
            let result = enumerate(&spec);
            assert_eq!(result.witness, None);
            assert_eq!(result.assignments_visited, 8);
        }
    }

    #[test]
    fn stops_at_first_witness() {
        let result = enumerate(&Specification::consistent_example());
        assert_eq!(result.witness, Some(vec![false, false, true]));
        assert_eq!(result.assignments_visited, 2);
        // 000: "0x1" fails at once; 001: both terms checked
        assert_eq!(result.comparisons, 3);

        let result = enumerate(&Specification::consistent_example_wide());
        assert_eq!(
            result.witness.as_deref().map(format_assignment).as_deref(),
            Some("00111")
        );
        assert_eq!(result.assignments_visited, 8);
    }

    #[test]
    fn truth_table_matches_documented_example() {
        let rows = truth_table(&Specification::consistent_example());
        assert_eq!(rows.len(), 8);
        let f1 = rows.iter().map(|r| r.functions[0]).collect_vec();
        let f2 = rows.iter().map(|r| r.functions[1]).collect_vec();
        assert_eq!(f1, vec![false, true, false, true, false, false, false, false]);
        assert_eq!(f2, vec![true, true, false, false, false, false, false, false]);
        assert_eq!(rows.iter().filter(|r| r.all_satisfied).count(), 1);
    }

    #[test]
    fn raw_strings() {
        assert_eq!(check_specification_consistency(3, &["0x1", "00x"]), Ok(true));
        assert_eq!(check_specification_consistency(3, &["1x0", "00x"]), Ok(false));
        assert_eq!(check_specification_consistency(3, &["011", "00x"]), Ok(false));
        assert_eq!(
            check_specification_consistency(3, &["011", "00"]),
            Err(SpecificationError::TermLength {
                index: 1,
                expected: 3,
                actual: 2
            })
        );
    }
}
