use rustc_hash::FxHashMap;

use crate::{
    circuit::{Circuit, Half},
    error::CircuitStructureError,
};

/// Appended to register names of the mirrored half.
pub const MIRROR_SUFFIX: &str = "_m";

/// Concatenate `original` with its bit-reversed copy living on fresh registers.
///
/// The final circuit declares the original registers and gates first, then the
/// mirrored registers (back to front, as in [`Circuit::reverse_bits`]) and the
/// mirrored gates. Both halves act on disjoint qubits.
pub fn mirror_circuit(original: &Circuit) -> Result<Circuit, CircuitStructureError> {
    if original.has_half(Half::Mirrored) {
        return Err(CircuitStructureError::AlreadyMirrored);
    }
    if original.is_measured() {
        return Err(CircuitStructureError::AlreadyMeasured);
    }

    let reversed = original.reverse_bits();

    let mut mirrored = Circuit::new();
    for reg in original.registers() {
        mirrored.add_register(reg.name.clone(), reg.role, Half::Original, reg.size());
    }
    // same declaration order, so qubit ids carry over unchanged
    mirrored.gates.extend(original.gates.iter().cloned());

    let mut qubit_mapping = FxHashMap::default();
    for reg in reversed.registers() {
        let renamed = mirrored.add_register(
            format!("{}{MIRROR_SUFFIX}", reg.name),
            reg.role,
            Half::Mirrored,
            reg.size(),
        );
        for (old, new) in reg.qubits().zip(mirrored.registers()[renamed].qubits()) {
            qubit_mapping.insert(old, new);
        }
    }

    mirrored.gates.extend(
        reversed
            .gates
            .iter()
            .map(|gate| gate.map_qubits(|q| qubit_mapping[&q])),
    );

    check_symmetry(original, &mirrored)?;

    log::debug!(
        "mirrored {} registers, {} gates per half",
        original.registers().len(),
        original.gates.len()
    );

    Ok(mirrored)
}

fn check_symmetry(original: &Circuit, mirrored: &Circuit) -> Result<(), CircuitStructureError> {
    let mirrored_count = mirrored.registers_in(Half::Mirrored).count();
    if mirrored_count != original.registers().len() {
        return Err(CircuitStructureError::RegisterCountMismatch {
            original: original.registers().len(),
            mirrored: mirrored_count,
        });
    }

    let mirrored_registers = mirrored.registers_in(Half::Mirrored);
    for (orig, mirr) in original.registers().iter().rev().zip(mirrored_registers) {
        if orig.size() != mirr.size() || orig.role != mirr.role {
            return Err(CircuitStructureError::RegisterSizeMismatch {
                original: orig.name.clone(),
                original_size: orig.size(),
                mirrored: mirr.name.clone(),
                mirrored_size: mirr.size(),
            });
        }
    }

    let (original_gates, mirrored_gates) = (
        mirrored.gate_count(Half::Original),
        mirrored.gate_count(Half::Mirrored),
    );
    if original_gates != original.gates.len() || mirrored_gates != original_gates {
        return Err(CircuitStructureError::GateCountMismatch {
            original: original.gates.len(),
            mirrored: mirrored_gates,
        });
    }

    Ok(())
}
