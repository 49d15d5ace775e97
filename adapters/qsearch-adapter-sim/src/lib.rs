//! qsearch Local Statevector Simulator
//!
//! Exact statevector evolution followed by shot sampling. Each job evolves the
//! state once and draws all shots from the final distribution, so only
//! terminal measurement is supported.
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 15 | ~512 KB |
//! | 20 | ~16 MB |
//! | 25 | ~512 MB |
//!
//! # Example
//!
//! ```ignore
//! use qsearch_adapter_sim::SimulatorBackend;
//! use qsearch_hal::Backend;
//! use qsearch_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::with_seed(42);
//!
//!     let circuit = Circuit::bell()?;
//!     let job_id = backend.submit(&circuit, 1000).await?;
//!     let result = backend.wait(&job_id).await?;
//!
//!     // Roughly half "00", half "11"
//!     println!("Results: {:?}", result.counts);
//!     Ok(())
//! }
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, MAX_SUPPORTED_QUBITS, SimulatorBackend};
