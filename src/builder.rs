use itertools::Itertools;

use crate::{
    circuit::{Circuit, Half, QubitRegister, RegisterRole},
    error::{CircuitStructureError, Result, SpecificationError, TermError},
    measure::measure_aux,
    mirror::mirror_circuit,
    spec::Specification,
    term::Term,
};

/// Fresh original half: `X` in uniform superposition, `F1..Fm`, `aux`, `a1`, `a2`.
pub fn build_registers(var_count: usize, function_count: usize) -> Circuit {
    let mut circuit = Circuit::new();

    let variables = circuit.add_register(
        RegisterRole::Variables.to_string(),
        RegisterRole::Variables,
        Half::Original,
        var_count as u32,
    );
    let superposition = circuit.registers()[variables].qubits().collect_vec();
    for qubit in superposition {
        circuit.h(qubit);
    }

    let roles = (1..=function_count)
        .map(RegisterRole::Oracle)
        .chain([RegisterRole::Aux, RegisterRole::A1, RegisterRole::A2]);
    for role in roles {
        circuit.add_register(role.to_string(), role, Half::Original, 1);
    }

    circuit
}

pub(crate) fn find_register(
    circuit: &Circuit,
    role: RegisterRole,
    half: Half,
) -> std::result::Result<&QubitRegister, CircuitStructureError> {
    circuit
        .register(role, half)
        .ok_or_else(|| CircuitStructureError::MissingRegister {
            name: match half {
                Half::Original => role.to_string(),
                Half::Mirrored => format!("{role}{}", crate::mirror::MIRROR_SUFFIX),
            },
        })
}

/// One multi-controlled NOT per term: `F{i+1}` flips exactly on assignments matching `terms[i]`.
pub fn apply_oracles(circuit: &mut Circuit, terms: &[Term], function_count: usize) -> Result<()> {
    if terms.len() < function_count {
        return Err(SpecificationError::TermCount {
            expected: function_count,
            actual: terms.len(),
        }
        .into());
    }

    let variables = find_register(circuit, RegisterRole::Variables, Half::Original)?.clone();

    for (index, term) in terms.iter().take(function_count).enumerate() {
        if term.len() != variables.size() as usize {
            return Err(SpecificationError::TermLength {
                index,
                expected: variables.size() as usize,
                actual: term.len(),
            }
            .into());
        }

        if term.is_wildcard_only() {
            return Err(TermError::NoFixedPositions {
                term: term.to_string(),
                function: index + 1,
            }
            .into());
        }
        let controls = term
            .fixed_positions()
            .map(|(column, bit)| (variables.qubit(column as u32), bit))
            .collect_vec();

        let target =
            find_register(circuit, RegisterRole::Oracle(index + 1), Half::Original)?.qubit(0);
        log::trace!("oracle F{} <- {term} ({} controls)", index + 1, controls.len());
        circuit.mcx(controls, target);
    }

    Ok(())
}

/// `aux` marks joint satisfaction of every oracle; `a1` is put in superposition only there.
pub fn apply_aux_hadamard(circuit: &mut Circuit, function_count: usize) -> Result<()> {
    let controls = (1..=function_count)
        .map(|i| {
            find_register(circuit, RegisterRole::Oracle(i), Half::Original)
                .map(|reg| (reg.qubit(0), true))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let aux = find_register(circuit, RegisterRole::Aux, Half::Original)?.qubit(0);
    let a1 = find_register(circuit, RegisterRole::A1, Half::Original)?.qubit(0);

    circuit.mcx(controls, aux);
    circuit.ch(aux, a1);

    Ok(())
}

/// Full pipeline: registers, oracles, aggregation, mirroring and measurement.
pub fn construct_circuit(spec: &Specification) -> Result<Circuit> {
    let mut circuit = build_registers(spec.variable_count(), spec.function_count());
    apply_oracles(&mut circuit, spec.terms(), spec.function_count())?;
    apply_aux_hadamard(&mut circuit, spec.function_count())?;

    let mut circuit = mirror_circuit(&circuit)?;
    measure_aux(&mut circuit, spec.function_count())?;

    log::debug!(
        "constructed circuit: {} registers, {} qubits, {} gates",
        circuit.registers().len(),
        circuit.num_qubits(),
        circuit.gates.len()
    );

    Ok(circuit)
}
