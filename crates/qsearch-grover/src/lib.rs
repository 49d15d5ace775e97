//! Grover search over a register of `N` qubits.
//!
//! [`build_oracle`] produces a marking circuit for one index, [`grover_circuit`]
//! wraps it with superposition, one diffusion round and measurement, and
//! [`search`] runs the result on any [`qsearch_hal::Backend`].
//!
//! # Example
//!
//! ```ignore
//! use qsearch_adapter_sim::SimulatorBackend;
//! use qsearch_grover::search;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new();
//!     let outcome = search(&backend, 2, 2, 1024).await?;
//!
//!     // "10" should dominate
//!     println!("{:?}", outcome.result.counts.sorted_by_bitstring());
//!     assert!(outcome.found());
//!     Ok(())
//! }
//! ```
//!
//! Bit-strings put classical bit 0 rightmost, and search qubit `i` holds bit
//! `i` of the marked index, so index `M` reads back as `format!("{M:0N$b}")`.

pub mod error;
pub mod oracle;
pub mod search;

pub use error::{GroverError, GroverResult};
pub use oracle::{MAX_SEARCH_QUBITS, Oracle, build_oracle};
pub use search::{
    GROVER_ITERATIONS, SearchOutcome, grover_circuit, search, theoretical_success_probability,
};
