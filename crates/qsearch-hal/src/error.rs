//! Errors raised by backends and the job lifecycle.

use thiserror::Error;

use crate::job::{JobId, JobStatus};

/// Failure while validating, running or collecting a job.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The backend reported the job as failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Job {0} was cancelled")]
    JobCancelled(JobId),

    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    /// `result()` was called before the job reached `Completed`.
    #[error("Job {job_id} has no result yet (status: {status})")]
    JobNotReady { job_id: JobId, status: JobStatus },

    /// A job status update that would move backwards or leave a terminal state.
    #[error("Job {job_id} cannot move from {from} to {to}")]
    InvalidTransition {
        job_id: JobId,
        from: JobStatus,
        to: JobStatus,
    },

    /// One or more reasons the circuit cannot run, joined with `; `.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    #[error("Circuit has {qubits} qubits but the backend supports at most {max}")]
    CircuitTooLarge { qubits: usize, max: u32 },

    #[error("Invalid shots: {requested} (must be between 1 and {max})")]
    InvalidShots { requested: u32, max: u32 },

    #[error("Timeout waiting for job {job_id} after {polls} polls")]
    Timeout { job_id: JobId, polls: u32 },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for backend operations.
pub type HalResult<T> = Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = HalError::InvalidShots {
            requested: 0,
            max: 100_000,
        };
        assert_eq!(
            err.to_string(),
            "Invalid shots: 0 (must be between 1 and 100000)"
        );

        let err = HalError::InvalidTransition {
            job_id: JobId::new("j1"),
            from: JobStatus::Completed,
            to: JobStatus::Running,
        };
        assert_eq!(err.to_string(), "Job j1 cannot move from Completed to Running");
    }

    #[test]
    fn test_serde_errors_convert() {
        let err: HalError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, HalError::Serialization(_)));
    }
}
