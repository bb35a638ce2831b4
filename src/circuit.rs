use std::fmt::Display;

use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Qubit(u32);

impl Qubit {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

/// What a register is used for. Oracle registers are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterRole {
    Variables,
    Oracle(usize),
    Aux,
    A1,
    A2,
}

impl Display for RegisterRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterRole::Variables => f.write_str("X"),
            RegisterRole::Oracle(i) => f.write_fmt(format_args!("F{i}")),
            RegisterRole::Aux => f.write_str("aux"),
            RegisterRole::A1 => f.write_str("a1"),
            RegisterRole::A2 => f.write_str("a2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Half {
    Original,
    Mirrored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QubitRegister {
    pub name: String,
    pub role: RegisterRole,
    pub half: Half,
    start: u32,
    size: u32,
}

impl QubitRegister {
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn qubit(&self, index: u32) -> Qubit {
        assert!(
            index < self.size,
            "qubit {index} out of range for register {}",
            self.name
        );
        Qubit(self.start + index)
    }

    pub fn qubits(&self) -> impl Iterator<Item = Qubit> {
        (self.start..self.start + self.size).map(Qubit)
    }

    pub fn contains(&self, qubit: Qubit) -> bool {
        (self.start..self.start + self.size).contains(&qubit.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicalRegister {
    pub name: String,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QGate {
    H(Qubit),
    /// Fires when every control equals its paired value
    MultiCX {
        controls: Vec<(Qubit, bool)>,
        target: Qubit,
    },
    CH {
        control: Qubit,
        target: Qubit,
    },
    CX {
        control: Qubit,
        target: Qubit,
    },
    Measure {
        qubit: Qubit,
        clbit: u32,
    },
}

impl QGate {
    pub fn qubits(&self) -> Vec<Qubit> {
        match self {
            QGate::H(target) => vec![*target],
            QGate::MultiCX { controls, target } => controls
                .iter()
                .map(|(q, _)| *q)
                .chain(std::iter::once(*target))
                .collect(),
            QGate::CH { control, target } | QGate::CX { control, target } => {
                vec![*control, *target]
            }
            QGate::Measure { qubit, clbit: _ } => vec![*qubit],
        }
    }

    /// The qubit whose state the gate changes (or reads, for measurements).
    pub fn target(&self) -> Qubit {
        match self {
            QGate::H(target)
            | QGate::MultiCX { target, .. }
            | QGate::CH { target, .. }
            | QGate::CX { target, .. } => *target,
            QGate::Measure { qubit, .. } => *qubit,
        }
    }

    pub fn map_qubits<F: Fn(Qubit) -> Qubit>(&self, map: F) -> Self {
        match self {
            QGate::H(target) => QGate::H(map(*target)),
            QGate::MultiCX { controls, target } => QGate::MultiCX {
                controls: controls.iter().map(|(q, v)| (map(*q), *v)).collect(),
                target: map(*target),
            },
            QGate::CH { control, target } => QGate::CH {
                control: map(*control),
                target: map(*target),
            },
            QGate::CX { control, target } => QGate::CX {
                control: map(*control),
                target: map(*target),
            },
            QGate::Measure { qubit, clbit } => QGate::Measure {
                qubit: map(*qubit),
                clbit: *clbit,
            },
        }
    }

    pub fn format_qasm(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        circuit: &Circuit,
    ) -> std::fmt::Result {
        let desc = |q: &Qubit| circuit.describe(*q);
        match self {
            QGate::H(target) => f.write_fmt(format_args!("h {}", desc(target))),
            QGate::MultiCX { controls, target } => {
                for (_, value) in controls {
                    f.write_str(if *value { "ctrl @ " } else { "negctrl @ " })?;
                }
                f.write_fmt(format_args!(
                    "x {}, {}",
                    controls.iter().map(|(q, _)| desc(q)).join(", "),
                    desc(target)
                ))
            }
            QGate::CH { control, target } => {
                f.write_fmt(format_args!("ch {}, {}", desc(control), desc(target)))
            }
            QGate::CX { control, target } => {
                f.write_fmt(format_args!("cx {}, {}", desc(control), desc(target)))
            }
            QGate::Measure { qubit, clbit } => {
                let creg = circuit
                    .classical_register()
                    .map_or("c", |reg| reg.name.as_str());
                f.write_fmt(format_args!("{creg}[{clbit}] = measure {}", desc(qubit)))
            }
        }
    }
}

/// Qubit registers and an ordered gate list. Qubits are numbered in register declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Circuit {
    next_id: u32,
    registers: Vec<QubitRegister>,
    pub gates: Vec<QGate>,
    classical: Option<ClassicalRegister>,
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a register after all existing ones, returns its position.
    pub fn add_register<N: Into<String>>(
        &mut self,
        name: N,
        role: RegisterRole,
        half: Half,
        size: u32,
    ) -> usize {
        self.registers.push(QubitRegister {
            name: name.into(),
            role,
            half,
            start: self.next_id,
            size,
        });
        self.next_id += size;
        self.registers.len() - 1
    }

    pub fn add_classical_register<N: Into<String>>(&mut self, name: N, size: u32) {
        self.classical = Some(ClassicalRegister {
            name: name.into(),
            size,
        });
    }

    pub fn registers(&self) -> &[QubitRegister] {
        &self.registers
    }

    pub fn classical_register(&self) -> Option<&ClassicalRegister> {
        self.classical.as_ref()
    }

    pub fn num_qubits(&self) -> u32 {
        self.next_id
    }

    pub fn register(&self, role: RegisterRole, half: Half) -> Option<&QubitRegister> {
        self.registers
            .iter()
            .find(|reg| reg.role == role && reg.half == half)
    }

    pub fn register_of(&self, qubit: Qubit) -> Option<&QubitRegister> {
        self.registers.iter().find(|reg| reg.contains(qubit))
    }

    pub fn registers_in(&self, half: Half) -> impl Iterator<Item = &QubitRegister> {
        self.registers.iter().filter(move |reg| reg.half == half)
    }

    pub fn has_half(&self, half: Half) -> bool {
        self.registers_in(half).next().is_some()
    }

    /// Number of gates acting on qubits of `half`.
    pub fn gate_count(&self, half: Half) -> usize {
        self.gates
            .iter()
            .filter(|gate| self.register_of(gate.target()).map(|reg| reg.half) == Some(half))
            .count()
    }

    pub fn describe(&self, qubit: Qubit) -> String {
        match self.register_of(qubit) {
            Some(reg) => format!("{}[{}]", reg.name, qubit.0 - reg.start),
            None => format!("q[{}]", qubit.0),
        }
    }

    pub fn h(&mut self, target: Qubit) {
        self.gates.push(QGate::H(target));
    }

    pub fn mcx(&mut self, controls: Vec<(Qubit, bool)>, target: Qubit) {
        self.gates.push(QGate::MultiCX { controls, target });
    }

    pub fn ch(&mut self, control: Qubit, target: Qubit) {
        self.gates.push(QGate::CH { control, target });
    }

    pub fn cx(&mut self, control: Qubit, target: Qubit) {
        self.gates.push(QGate::CX { control, target });
    }

    pub fn measure(&mut self, qubit: Qubit, clbit: u32) {
        self.gates.push(QGate::Measure { qubit, clbit });
    }

    pub fn is_measured(&self) -> bool {
        self.classical.is_some()
            || self
                .gates
                .iter()
                .any(|gate| matches!(gate, QGate::Measure { .. }))
    }

    /// Same circuit with the wire order reversed: registers are declared back to
    /// front, qubit `i` of `n` becomes `n - 1 - i`, gates keep their order.
    pub fn reverse_bits(&self) -> Self {
        let last = self.next_id.saturating_sub(1);
        let mut reversed = Self::new();

        for reg in self.registers.iter().rev() {
            reversed.add_register(reg.name.clone(), reg.role, reg.half, reg.size);
        }

        reversed.gates = self
            .gates
            .iter()
            .map(|gate| {
                let gate = gate.map_qubits(|q| Qubit(last - q.0));
                match (gate, &self.classical) {
                    (QGate::Measure { qubit, clbit }, Some(creg)) => QGate::Measure {
                        qubit,
                        clbit: creg.size - 1 - clbit,
                    },
                    (gate, _) => gate,
                }
            })
            .collect();
        reversed.classical = self.classical.clone();

        reversed
    }
}

impl Display for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("OPENQASM 3.0;\n")?;
        f.write_str("include \"stdgates.inc\";\n\n")?;

        for reg in &self.registers {
            f.write_fmt(format_args!("qubit[{}] {};\n", reg.size, reg.name))?;
        }
        if let Some(creg) = &self.classical {
            f.write_fmt(format_args!("bit[{}] {};\n", creg.size, creg.name))?;
        }
        f.write_str("\n")?;

        for gate in &self.gates {
            gate.format_qasm(f, self)?;
            f.write_str(";\n")?;
        }

        Ok(())
    }
}
