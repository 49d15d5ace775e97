//! High-level circuit builder API.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId, WireId};

/// A quantum circuit.
///
/// Instructions are kept in the order they were appended. Every append is
/// validated against the circuit's wires, so a `Circuit` never holds an
/// instruction that refers to a missing qubit or has the wrong arity.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Number of classical bits.
    num_clbits: u32,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_qubits: 0,
            num_clbits: 0,
            instructions: vec![],
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: vec![],
        }
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.num_qubits);
        self.num_qubits += 1;
        id
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.num_clbits);
        self.num_clbits += 1;
        id
    }

    /// Append an instruction after validating its operands.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let gate_name = match &instruction.kind {
            InstructionKind::Gate(gate) => Some(gate.name().to_string()),
            InstructionKind::Measure => None,
        };

        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let expected = gate.num_qubits();
                let got = instruction.qubits.len() as u32;
                if expected != got {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate.name().to_string(),
                        expected,
                        got,
                    });
                }
            }
            InstructionKind::Measure => {
                if instruction.qubits.len() != instruction.clbits.len() {
                    return Err(IrError::MeasureArityMismatch {
                        qubits: instruction.qubits.len(),
                        clbits: instruction.clbits.len(),
                    });
                }
            }
        }

        for &qubit in &instruction.qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        for &clbit in &instruction.clbits {
            if clbit.0 >= self.num_clbits {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        self.instructions.push(instruction);
        Ok(self)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::S, qubit))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Sdg, qubit))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::T, qubit))
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Tdg, qubit))
    }

    // =========================================================================
    // Controlled gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply a multi-controlled X gate: flips `target` when every control is |1⟩.
    pub fn mcx(&mut self, controls: &[QubitId], target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::mcx(controls, target))
    }

    // =========================================================================
    // Measurement and composition
    // =========================================================================

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Measure all qubits to corresponding classical bits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.num_clbits < self.num_qubits {
            self.add_clbit();
        }
        let inst = Instruction::measure_all(self.qubits(), (0..self.num_qubits).map(ClbitId))?;
        self.apply(inst)
    }

    /// Append every instruction of `other`, mapping its qubit `i` onto `qubits[i]`.
    ///
    /// Classical bits keep their indices.
    pub fn compose(&mut self, other: &Circuit, qubits: &[QubitId]) -> IrResult<&mut Self> {
        if qubits.len() != other.num_qubits() {
            return Err(IrError::QubitCountMismatch {
                gate_name: other.name.clone(),
                expected: other.num_qubits,
                got: qubits.len() as u32,
            });
        }

        for inst in &other.instructions {
            let mapped_qubits = inst
                .qubits
                .iter()
                .map(|&q| {
                    qubits.get(q.index()).copied().ok_or(IrError::QubitNotFound {
                        qubit: q,
                        gate_name: Some(inst.name().to_string()),
                    })
                })
                .collect::<IrResult<Vec<_>>>()?;
            let mapped = Instruction {
                kind: inst.kind.clone(),
                qubits: mapped_qubits,
                clbits: inst.clbits.clone(),
            };
            self.apply(mapped)?;
        }
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Iterate over the circuit's qubit identifiers.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + use<> {
        (0..self.num_qubits).map(QubitId)
    }

    /// Instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Get the number of operations.
    pub fn num_ops(&self) -> usize {
        self.instructions.len()
    }

    /// Count operations by name.
    pub fn count_ops(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for inst in &self.instructions {
            *counts.entry(inst.name().to_string()).or_default() += 1;
        }
        counts
    }

    /// Check whether the circuit contains any measurement.
    pub fn has_measurements(&self) -> bool {
        self.instructions.iter().any(Instruction::is_measure)
    }

    /// Calculate the circuit depth.
    ///
    /// Each instruction sits one layer after the deepest layer reached so far
    /// on any of its wires, quantum or classical.
    pub fn depth(&self) -> usize {
        let mut layers: FxHashMap<WireId, usize> = FxHashMap::default();
        let mut max_depth = 0usize;

        for inst in &self.instructions {
            let wires: Vec<WireId> = inst
                .qubits
                .iter()
                .map(|&q| WireId::from(q))
                .chain(inst.clbits.iter().map(|&c| WireId::from(c)))
                .collect();

            let layer = wires
                .iter()
                .map(|w| layers.get(w).copied().unwrap_or(0))
                .max()
                .unwrap_or(0)
                + 1;

            for wire in wires {
                layers.insert(wire, layer);
            }
            max_depth = max_depth.max(layer);
        }

        max_depth
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        let q0 = QubitId(0);
        let q1 = QubitId(1);

        circuit
            .h(q0)?
            .cx(q0, q1)?
            .measure(q0, ClbitId(0))?
            .measure(q1, ClbitId(1))?;

        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::new("ghz_0"));
        }

        let mut circuit = Self::with_size("ghz", n, n);
        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        circuit.measure_all()?;

        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_add_wires() {
        let mut circuit = Circuit::with_size("test", 1, 0);
        assert_eq!(circuit.add_qubit(), QubitId(1));
        assert_eq!(circuit.add_clbit(), ClbitId(0));
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 1);
        assert_eq!(circuit.qubits().collect::<Vec<_>>(), [QubitId(0), QubitId(1)]);
    }

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.depth(), 3); // H, CX, parallel measures
        assert!(circuit.has_measurements());
    }

    #[test]
    fn test_ghz_state() {
        let circuit = Circuit::ghz(5).unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.num_clbits(), 5);
        assert_eq!(circuit.count_ops()["cx"], 4);
    }

    #[test]
    fn test_parallel_gates_depth() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.h(QubitId(1)).unwrap();
        circuit.h(QubitId(2)).unwrap();
        assert_eq!(circuit.depth(), 1);

        circuit.mcx(&[QubitId(0), QubitId(1)], QubitId(2)).unwrap();
        assert_eq!(circuit.depth(), 2);
        assert_eq!(circuit.num_ops(), 4);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::with_size("test", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap();

        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_qubit_not_found_with_context() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        let err = circuit.mcx(&[QubitId(0), QubitId(1)], QubitId(2)).unwrap_err();
        match err {
            IrError::QubitNotFound { qubit, gate_name } => {
                assert_eq!(qubit, QubitId(2));
                assert_eq!(gate_name.as_deref(), Some("mcx"));
            }
            other => panic!("Expected QubitNotFound, got {other:?}"),
        }
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_gate_arity_mismatch() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        let result = circuit.apply(Instruction::gate(StandardGate::CX, [QubitId(0)]));
        assert!(matches!(
            result,
            Err(IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        let result = circuit.cx(QubitId(1), QubitId(1));
        assert!(matches!(result, Err(IrError::DuplicateQubit { .. })));
    }

    #[test]
    fn test_clbit_not_found() {
        let mut circuit = Circuit::with_size("test", 2, 1);
        let result = circuit.measure(QubitId(1), ClbitId(1));
        assert!(matches!(result, Err(IrError::ClbitNotFound { .. })));
    }

    #[test]
    fn test_measure_all_adds_clbits() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        circuit.measure_all().unwrap();
        assert_eq!(circuit.num_clbits(), 3);
        assert_eq!(circuit.instructions()[0].clbits.len(), 3);
    }

    #[test]
    fn test_compose_remaps_qubits() {
        let mut sub = Circuit::with_size("sub", 2, 0);
        sub.x(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();

        let mut circuit = Circuit::with_size("outer", 3, 0);
        circuit.compose(&sub, &[QubitId(2), QubitId(0)]).unwrap();

        let ops = circuit.instructions();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].qubits, vec![QubitId(2)]);
        assert_eq!(ops[1].qubits, vec![QubitId(2), QubitId(0)]);
    }

    #[test]
    fn test_compose_wrong_width() {
        let sub = Circuit::with_size("sub", 3, 0);
        let mut circuit = Circuit::with_size("outer", 3, 0);
        let result = circuit.compose(&sub, &[QubitId(0), QubitId(1)]);
        assert!(matches!(
            result,
            Err(IrError::QubitCountMismatch { gate_name, .. }) if gate_name == "sub"
        ));
    }
}
