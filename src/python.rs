use pyo3::{exceptions::PyValueError, prelude::*};

use crate::{
    builder::construct_circuit, classical, config::CheckerConfig, engine::QuantumChecker,
    spec::Specification,
};

fn to_py_err<E: std::fmt::Display>(err: E) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Classical truth table check.
#[pyfunction]
fn check_specification_consistency(n: usize, terms: Vec<String>) -> PyResult<bool> {
    classical::check_specification_consistency(n, &terms).map_err(to_py_err)
}

/// Quantum check on exact probabilities, returns `(consistent, C)`.
#[pyfunction]
#[pyo3(signature = (terms, var_count, function_count, epsilon = 0.0))]
fn quantum_check(
    terms: Vec<String>,
    var_count: usize,
    function_count: usize,
    epsilon: f64,
) -> PyResult<(bool, f64)> {
    let spec = Specification::parse(var_count, function_count, &terms).map_err(to_py_err)?;
    let verdict = QuantumChecker::exact(CheckerConfig::default().with_epsilon(epsilon))
        .check(&spec)
        .map_err(to_py_err)?;
    Ok((verdict.consistent, verdict.statistic))
}

/// OpenQASM 3 text of the mirrored, measured circuit.
#[pyfunction]
fn construct_circuit_qasm(
    terms: Vec<String>,
    var_count: usize,
    function_count: usize,
) -> PyResult<String> {
    let spec = Specification::parse(var_count, function_count, &terms).map_err(to_py_err)?;
    Ok(construct_circuit(&spec).map_err(to_py_err)?.to_string())
}

#[pymodule]
fn qspec(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(check_specification_consistency, m)?)?;
    m.add_function(wrap_pyfunction!(quantum_check, m)?)?;
    m.add_function(wrap_pyfunction!(construct_circuit_qasm, m)?)?;
    Ok(())
}
