use crate::{
    builder::find_register,
    circuit::{Circuit, Half, RegisterRole},
    error::CircuitStructureError,
};

pub const MEASUREMENT_REGISTER: &str = "measure_a";

/// Correlate each `a1`/`a2` pair and measure the four of them into [`MEASUREMENT_REGISTER`].
///
/// Classical bits 0..4 receive `a1`, `a2`, `a2_m`, `a1_m`, the declaration order of
/// these registers in a mirrored circuit.
pub fn measure_aux(
    circuit: &mut Circuit,
    function_count: usize,
) -> Result<(), CircuitStructureError> {
    if circuit.is_measured() {
        return Err(CircuitStructureError::AlreadyMeasured);
    }
    if !circuit.has_half(Half::Mirrored) {
        return Err(CircuitStructureError::NotMirrored);
    }
    for half in [Half::Original, Half::Mirrored] {
        let oracles = circuit
            .registers_in(half)
            .filter(|reg| matches!(reg.role, RegisterRole::Oracle(_)))
            .count();
        if oracles != function_count {
            return Err(CircuitStructureError::OracleCount {
                expected: function_count,
                actual: oracles,
            });
        }
    }

    let a1 = find_register(circuit, RegisterRole::A1, Half::Original)?.qubit(0);
    let a2 = find_register(circuit, RegisterRole::A2, Half::Original)?.qubit(0);
    let a1_m = find_register(circuit, RegisterRole::A1, Half::Mirrored)?.qubit(0);
    let a2_m = find_register(circuit, RegisterRole::A2, Half::Mirrored)?.qubit(0);

    circuit.cx(a1, a2);
    // mirrored registers are declared back to front, the control comes after its target
    circuit.cx(a1_m, a2_m);

    circuit.add_classical_register(MEASUREMENT_REGISTER, 4);
    for (clbit, qubit) in [a1, a2, a2_m, a1_m].into_iter().enumerate() {
        circuit.measure(qubit, clbit as u32);
    }

    Ok(())
}
