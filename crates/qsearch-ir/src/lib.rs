//! qsearch Circuit Intermediate Representation
//!
//! This crate provides the data structures the Grover search builders emit and
//! the backends consume.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`] for addressing quantum
//!   and classical wires
//! - **Gates**: [`StandardGate`], including the multi-controlled X used by oracles
//! - **Instructions**: [`Instruction`] combining gates or measurements with operands
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qsearch_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//!
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.measure_all().unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 3);
//! ```
//!
//! # Example: Multi-Controlled X
//!
//! ```rust
//! use qsearch_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("mcx", 4, 0);
//! circuit
//!     .mcx(&[QubitId(0), QubitId(1), QubitId(2)], QubitId(3))
//!     .unwrap();
//!
//! assert_eq!(circuit.instructions()[0].name(), "mcx");
//! assert_eq!(circuit.instructions()[0].controls().len(), 3);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{STANDARD_GATE_NAMES, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId, WireId};
