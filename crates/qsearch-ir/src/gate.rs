//! Quantum gate types.

use serde::{Deserialize, Serialize};

/// Standard gates with known semantics.
///
/// Operand order for controlled gates is controls first, target last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,

    // Multi-qubit gates
    /// Multi-controlled X with the given number of controls.
    Mcx {
        /// Number of control qubits.
        controls: u32,
    },
}

impl StandardGate {
    /// Get the name of this gate (OpenQASM 3 naming).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::CX => "cx",
            StandardGate::Mcx { .. } => "mcx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::X
            | StandardGate::Y
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg => 1,

            StandardGate::CX => 2,

            StandardGate::Mcx { controls } => controls + 1,
        }
    }

    /// Number of control qubits at the front of the operand list.
    pub fn num_controls(&self) -> u32 {
        match self {
            StandardGate::CX => 1,
            StandardGate::Mcx { controls } => *controls,
            _ => 0,
        }
    }

    /// Check if applying this gate twice is the identity.
    pub fn is_self_inverse(&self) -> bool {
        !matches!(
            self,
            StandardGate::S | StandardGate::Sdg | StandardGate::T | StandardGate::Tdg
        )
    }
}

/// Names of every gate family in [`StandardGate`].
pub const STANDARD_GATE_NAMES: &[&str] = &[
    "x", "y", "h", "s", "sdg", "t", "tdg", "cx", "mcx",
];
