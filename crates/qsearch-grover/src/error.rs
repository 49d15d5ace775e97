//! Error types for the Grover builders.

use qsearch_hal::HalError;
use qsearch_ir::IrError;
use thiserror::Error;

/// Errors raised while building or running a Grover search.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GroverError {
    /// The search register must hold at least one qubit.
    #[error("Search register needs at least one qubit")]
    NoSearchQubits,

    /// The marked index would not fit in a `u64`.
    #[error("Search register of {num_qubits} qubits exceeds the limit of {max}")]
    TooManyQubits {
        /// Requested number of search qubits.
        num_qubits: u32,
        /// Largest supported number of search qubits.
        max: u32,
    },

    /// The marked index is not addressable by the search register.
    #[error("Marked index {marked} does not fit in {num_qubits} qubits (must be < {})", index_bound(.num_qubits))]
    MarkedIndexOutOfRange {
        /// The requested marked index.
        marked: u64,
        /// Number of search qubits.
        num_qubits: u32,
    },

    /// The oracle was built for a different register width.
    #[error("Oracle acts on {oracle} search qubits, circuit requested {requested}")]
    QubitCountMismatch {
        /// Search qubits of the oracle.
        oracle: u32,
        /// Search qubits requested for the circuit.
        requested: u32,
    },

    /// Circuit construction failed.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Backend execution failed.
    #[error(transparent)]
    Hal(#[from] HalError),
}

fn index_bound(num_qubits: &u32) -> u128 {
    1u128 << num_qubits
}

/// Result type for Grover operations.
pub type GroverResult<T> = Result<T, GroverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = GroverError::MarkedIndexOutOfRange {
            marked: 4,
            num_qubits: 2,
        };
        assert_eq!(
            err.to_string(),
            "Marked index 4 does not fit in 2 qubits (must be < 4)"
        );
    }

    #[test]
    fn test_hal_errors_pass_through() {
        let err: GroverError = HalError::InvalidShots {
            requested: 0,
            max: 10,
        }
        .into();
        assert_eq!(err.to_string(), "Invalid shots: 0 (must be between 1 and 10)");
    }
}
