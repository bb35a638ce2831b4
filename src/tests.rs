use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    builder::construct_circuit,
    circuit::{Circuit, Half},
    classical::{self, truth_table},
    config::CheckerConfig,
    decision::CORRELATED_OUTCOMES,
    engine::QuantumChecker,
    error::{Error, ExecutionError, SpecificationError, TermError},
    executor::{Outcomes, StatevectorExecutor},
    spec::Specification,
    term::Term,
};

fn random_spec(rng: &mut StdRng, variable_count: usize, function_count: usize) -> Specification {
    let terms = (0..function_count)
        .map(|_| {
            let mut term = (0..variable_count)
                .map(|_| match rng.gen_range(0..4) {
                    0 => '0',
                    1 => '1',
                    _ => 'x',
                })
                .collect_vec();
            if term.iter().all(|c| *c == 'x') {
                term[rng.gen_range(0..variable_count)] = if rng.gen() { '1' } else { '0' };
            }
            term.into_iter().collect::<String>()
        })
        .collect_vec();
    Specification::from_terms(variable_count, &terms).unwrap()
}

/// Fraction of assignments satisfying every term.
fn satisfying_fraction(spec: &Specification) -> f64 {
    let rows = truth_table(spec);
    rows.iter().filter(|r| r.all_satisfied).count() as f64 / rows.len() as f64
}

#[test]
fn reference_scenarios() {
    let mut checker = QuantumChecker::exact(CheckerConfig::default());
    for (spec, expected) in [
        (Specification::consistent_example(), true),
        (Specification::consistent_example_wide(), true),
        (Specification::inconsistent_example(), false),
        (Specification::inconsistent_example_full(), false),
    ] {
        assert_eq!(classical::is_consistent(&spec), expected);
        assert_eq!(checker.check(&spec).unwrap().consistent, expected);
    }
}

#[test]
fn exact_statistic_of_consistent_example() {
    // one witness out of 8: p = 1/8, each correlated outcome p/2 * (1 - p/2)
    let verdict = QuantumChecker::exact(CheckerConfig::default())
        .check(&Specification::consistent_example())
        .unwrap();
    let expected = 1.0 / 16.0 * (15.0 / 16.0);
    assert!((verdict.probabilities[0] - expected).abs() < 1e-12);
    assert!((verdict.probabilities[1] - expected).abs() < 1e-12);
    assert!((verdict.statistic - 15f64.sqrt() / 8.0).abs() < 1e-12);
}

#[test]
fn inconsistent_statistic_is_exactly_zero() {
    let verdict = QuantumChecker::exact(CheckerConfig::default())
        .check(&Specification::inconsistent_example_full())
        .unwrap();
    assert_eq!(verdict.probabilities, [0.0, 0.0]);
    assert_eq!(verdict.statistic, 0.0);
}

#[test]
fn quantum_agrees_with_classical() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut checker = QuantumChecker::exact(CheckerConfig::default());
    let mut consistent = 0;

    for _ in 0..200 {
        let variable_count = rng.gen_range(1..=6);
        let function_count = rng.gen_range(1..=4);
        let spec = random_spec(&mut rng, variable_count, function_count);

        let verdict = checker.check(&spec).unwrap();
        assert_eq!(
            verdict.consistent,
            classical::is_consistent(&spec),
            "disagreement on {:?}",
            spec.terms().iter().map(Term::to_string).collect_vec()
        );

        let p = satisfying_fraction(&spec);
        assert!((verdict.statistic - (p * (2.0 - p)).sqrt()).abs() < 1e-9);
        consistent += usize::from(verdict.consistent);
    }

    // both verdicts are exercised
    assert!(consistent > 0 && consistent < 200);
}

#[test]
fn quantum_agrees_with_classical_on_ten_variables() {
    let mut rng = StdRng::seed_from_u64(10);
    let mut checker = QuantumChecker::exact(CheckerConfig::default());

    for function_count in [1, 2, 3] {
        for _ in 0..3 {
            let spec = random_spec(&mut rng, 10, function_count);
            assert_eq!(
                checker.check(&spec).unwrap().consistent,
                classical::is_consistent(&spec)
            );
        }
    }

    let spec = Specification::from_terms(10, &["1xxxxxxxx0", "0xxxxxxxxx"]).unwrap();
    assert!(!checker.check(&spec).unwrap().consistent);
    let spec = Specification::from_terms(10, &["1xxxxxxxx0", "xx0xxxxxx0", "x1x1x1x1x0"]).unwrap();
    assert!(checker.check(&spec).unwrap().consistent);
}

#[test]
fn sampled_engine_agrees_with_classical() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut checker =
        QuantumChecker::sampling(CheckerConfig::default().with_shots(2048).with_seed(1));

    for _ in 0..40 {
        let variable_count = rng.gen_range(1..=5);
        let function_count = rng.gen_range(1..=3);
        let spec = random_spec(&mut rng, variable_count, function_count);
        assert_eq!(
            checker.check(&spec).unwrap().consistent,
            classical::is_consistent(&spec)
        );
    }
}

#[test]
fn outcome_probabilities_sum_to_one() {
    let circuit = construct_circuit(&Specification::consistent_example_wide()).unwrap();
    let distribution = StatevectorExecutor::default().distribution(&circuit).unwrap();
    assert!((distribution.values().sum::<f64>() - 1.0).abs() < 1e-9);
    // only correlated pairs are possible: a2 copies a1 in both halves
    assert!(distribution
        .keys()
        .all(|value| [0b0000, 0b0011, 0b1100, 0b1111].contains(value)));
}

#[test]
fn final_circuit_shape() {
    let spec = Specification::consistent_example_wide();
    let circuit = construct_circuit(&spec).unwrap();

    assert_eq!(circuit.registers().len(), 2 * (1 + 5 + 3));
    assert_eq!(circuit.gate_count(Half::Original), circuit.gate_count(Half::Mirrored));
    // 5 H + 5 oracles + MCX + CH, then CX and two measurements per half
    assert_eq!(circuit.gate_count(Half::Original), 12 + 1 + 2);

    let qasm = circuit.to_string();
    assert!(qasm.starts_with("OPENQASM 3.0;\n"));
    assert!(qasm.contains("qubit[5] X_m;\n"));
    assert!(qasm.contains("bit[4] measure_a;\n"));
    assert!(qasm.contains("negctrl @ ctrl @ ctrl @ x X[0], X[2], X[4], F1[0];\n"));
    assert!(qasm.contains("ch aux[0], a1[0];\n"));
    assert!(qasm.contains("cx a1_m[0], a2_m[0];\n"));
    assert!(qasm.ends_with("measure_a[3] = measure a1_m[0];\n"));
}

#[test]
fn custom_executor_probabilities() {
    let fixed = |probabilities: [f64; 2]| {
        move |_: &Circuit, _: u32| {
            let mut outcomes = Outcomes::new(4);
            for (pattern, p) in CORRELATED_OUTCOMES.iter().zip(probabilities) {
                outcomes.record(*pattern, p);
            }
            outcomes.record("0000", 1.0 - probabilities[0] - probabilities[1]);
            Ok::<_, ExecutionError>(outcomes)
        }
    };
    let spec = Specification::consistent_example();

    let verdict = QuantumChecker::new(fixed([0.25, 0.25]), CheckerConfig::default())
        .check(&spec)
        .unwrap();
    assert!(verdict.consistent);
    assert!((verdict.statistic - 1.0).abs() < 1e-12);

    let verdict = QuantumChecker::new(fixed([0.0, 0.0]), CheckerConfig::default())
        .check(&spec)
        .unwrap();
    assert!(!verdict.consistent);
    assert_eq!(verdict.statistic, 0.0);

    let verdict = QuantumChecker::new(
        fixed([0.001, 0.0]),
        CheckerConfig::default().with_epsilon(0.1),
    )
    .check(&spec)
    .unwrap();
    assert!(!verdict.consistent);
}

#[test]
fn executor_failures_surface_unchanged() {
    let failing = |_: &Circuit, _: u32| -> Result<Outcomes, ExecutionError> {
        Err(ExecutionError::Backend("timeout".into()))
    };
    assert_eq!(
        QuantumChecker::new(failing, CheckerConfig::default())
            .check(&Specification::consistent_example()),
        Err(Error::Execution(ExecutionError::Backend("timeout".into())))
    );

    let mut small = QuantumChecker::exact(CheckerConfig::default().with_max_group_qubits(4));
    assert!(matches!(
        small.check(&Specification::consistent_example()),
        Err(Error::Execution(ExecutionError::TooManyQubits { .. }))
    ));
}

#[test]
fn malformed_specifications_fail_fast() {
    assert_eq!(
        Specification::parse(3, 3, &["0x1", "00x"]),
        Err(SpecificationError::TermCount {
            expected: 3,
            actual: 2
        })
    );
    assert_eq!(
        Specification::parse(0, 1, &[""]),
        Err(SpecificationError::NoVariables)
    );
    assert_eq!(
        Specification::parse(3, 0, &[] as &[&str]),
        Err(SpecificationError::NoFunctions)
    );
    assert_eq!(
        Specification::parse(3, 1, &["0?1"]),
        Err(SpecificationError::UnknownSymbol {
            symbol: '?',
            position: 1
        })
    );
}

#[test]
fn wildcard_only_term_fails_quantum_path_only() {
    let spec = Specification::from_terms(2, &["1x", "xx"]).unwrap();
    assert!(classical::is_consistent(&spec));
    assert!(matches!(
        construct_circuit(&spec),
        Err(Error::Term(TermError::NoFixedPositions { function: 2, .. }))
    ));
}

#[test]
fn specification_from_json() {
    let systems: Vec<Specification> = serde_json::from_str(
        r#"[
            {"terms": ["0x1", "00x"], "var_count": 3, "function_count": 2},
            {"terms": ["011", "00x"], "var_count": 3}
        ]"#,
    )
    .unwrap();
    assert_eq!(systems[0], Specification::consistent_example());
    assert_eq!(systems[1], Specification::inconsistent_example_full());

    let invalid = serde_json::from_str::<Specification>(
        r#"{"terms": ["0x1"], "var_count": 3, "function_count": 2}"#,
    );
    assert!(invalid.is_err());
}
