//! Phase oracle for a single marked index.
//!
//! The oracle acts on `N` search qubits plus one ancilla (qubit `N`). Search
//! qubit `i` corresponds to bit `i` of the marked index. Qubits whose bit is 0
//! are wrapped in X gates so the marked basis state becomes all-ones, and a
//! multi-controlled Z (H·MCX·H on the ancilla) marks it.

use qsearch_ir::{Circuit, QubitId};
use tracing::debug;

use crate::error::{GroverError, GroverResult};

/// Largest search register whose indices fit in a `u64`.
pub const MAX_SEARCH_QUBITS: u32 = 63;

/// A marking circuit over `N + 1` qubits with no classical bits.
#[derive(Debug, Clone)]
pub struct Oracle {
    circuit: Circuit,
    num_qubits: u32,
    marked_index: u64,
    flip_mask: u64,
}

impl Oracle {
    /// The marking circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Number of search qubits (the ancilla is not counted).
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The index this oracle marks.
    pub fn marked_index(&self) -> u64 {
        self.marked_index
    }

    /// Bit `i` is set when search qubit `i` is wrapped in X gates.
    pub fn flip_mask(&self) -> u64 {
        self.flip_mask
    }

    /// Search qubits wrapped in X gates, in ascending order.
    pub fn flipped_qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        (0..self.num_qubits)
            .filter(|i| (self.flip_mask >> i) & 1 == 1)
            .map(QubitId)
    }

    /// The ancilla qubit, directly after the search register.
    pub fn ancilla(&self) -> QubitId {
        QubitId(self.num_qubits)
    }

    /// Consume the oracle, returning its circuit.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }
}

/// Build the oracle marking `marked_index` in an `num_qubits`-qubit register.
pub fn build_oracle(num_qubits: u32, marked_index: u64) -> GroverResult<Oracle> {
    if num_qubits == 0 {
        return Err(GroverError::NoSearchQubits);
    }
    if num_qubits > MAX_SEARCH_QUBITS {
        return Err(GroverError::TooManyQubits {
            num_qubits,
            max: MAX_SEARCH_QUBITS,
        });
    }

    let register_mask = (1u64 << num_qubits) - 1;
    if marked_index > register_mask {
        return Err(GroverError::MarkedIndexOutOfRange {
            marked: marked_index,
            num_qubits,
        });
    }

    let flip_mask = !marked_index & register_mask;
    let search: Vec<QubitId> = (0..num_qubits).map(QubitId).collect();
    let ancilla = QubitId(num_qubits);
    let flipped: Vec<QubitId> = search
        .iter()
        .copied()
        .filter(|q| (flip_mask >> q.0) & 1 == 1)
        .collect();

    let mut circuit = Circuit::with_size("oracle", num_qubits + 1, 0);
    for &q in &flipped {
        circuit.x(q)?;
    }
    circuit.h(ancilla)?.mcx(&search, ancilla)?.h(ancilla)?;
    for &q in &flipped {
        circuit.x(q)?;
    }

    debug!(
        num_qubits,
        marked_index,
        flipped = flipped.len(),
        "built oracle"
    );

    Ok(Oracle {
        circuit,
        num_qubits,
        marked_index,
        flip_mask,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(circuit: &Circuit) -> Vec<&str> {
        circuit.instructions().iter().map(|i| i.name()).collect()
    }

    #[test]
    fn test_oracle_for_index_two() {
        // M = 2 = 0b10: qubit 0 has bit 0, so only qubit 0 is flipped.
        let oracle = build_oracle(2, 2).unwrap();
        assert_eq!(oracle.flip_mask(), 0b01);
        assert_eq!(oracle.flipped_qubits().collect::<Vec<_>>(), [QubitId(0)]);
        assert_eq!(oracle.ancilla(), QubitId(2));
        assert_eq!(names(oracle.circuit()), ["x", "h", "mcx", "h", "x"]);

        let mcx = &oracle.circuit().instructions()[2];
        assert_eq!(mcx.controls(), &[QubitId(0), QubitId(1)]);
        assert_eq!(mcx.targets(), &[QubitId(2)]);
    }

    #[test]
    fn test_all_ones_needs_no_flips() {
        let oracle = build_oracle(3, 0b111).unwrap();
        assert_eq!(oracle.flip_mask(), 0);
        assert_eq!(names(oracle.circuit()), ["h", "mcx", "h"]);
    }

    #[test]
    fn test_zero_flips_every_search_qubit() {
        let oracle = build_oracle(3, 0).unwrap();
        assert_eq!(oracle.flip_mask(), 0b111);
        assert_eq!(oracle.circuit().count_ops()["x"], 6);
    }

    #[test]
    fn test_oracle_shape() {
        let oracle = build_oracle(4, 9).unwrap();
        assert_eq!(oracle.num_qubits(), 4);
        assert_eq!(oracle.marked_index(), 9);
        assert_eq!(oracle.circuit().num_qubits(), 5);
        assert_eq!(oracle.circuit().num_clbits(), 0);
        assert!(!oracle.circuit().has_measurements());
        assert_eq!(oracle.into_circuit().name(), "oracle");
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(matches!(build_oracle(0, 0), Err(GroverError::NoSearchQubits)));
        assert!(matches!(
            build_oracle(64, 0),
            Err(GroverError::TooManyQubits { num_qubits: 64, .. })
        ));
        assert!(matches!(
            build_oracle(2, 4),
            Err(GroverError::MarkedIndexOutOfRange {
                marked: 4,
                num_qubits: 2
            })
        ));
    }

    #[test]
    fn test_widest_register() {
        let oracle = build_oracle(MAX_SEARCH_QUBITS, u64::MAX >> 1).unwrap();
        assert_eq!(oracle.flip_mask(), 0);
    }
}
