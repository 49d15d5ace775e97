//! qsearch Backend Abstraction Layer
//!
//! A backend runs a [`qsearch_ir::Circuit`] for a number of shots and returns
//! measurement [`Counts`]. Callers construct a backend explicitly and pass it
//! around as `&dyn Backend`.
//!
//! - [`Backend`] trait for job submission and management
//! - [`Capabilities`] to describe qubit and shot limits
//! - [`ExecutionResult`] and [`Counts`] for results
//!
//! # Example: Running a Circuit
//!
//! ```ignore
//! use qsearch_hal::Backend;
//! use qsearch_adapter_sim::SimulatorBackend;
//! use qsearch_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let circuit = Circuit::bell()?;
//!     let backend = SimulatorBackend::new();
//!
//!     let job_id = backend.submit(&circuit, 1000).await?;
//!     let result = backend.wait(&job_id).await?;
//!
//!     if let Some((bitstring, count)) = result.counts.most_frequent() {
//!         println!("Most frequent: {bitstring} ({count} times)");
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, DEFAULT_MAX_POLLS,
    DEFAULT_POLL_INTERVAL, ValidationResult,
};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
