//! Job lifecycle types.
//!
//! ```text
//!   submit() ──→ Queued ──→ Running ──→ Completed
//!                  │           │
//!                  │           ├──→ Failed(reason)
//!                  │           │
//!                  └───────────┴──→ Cancelled
//! ```
//!
//! Transitions only move forward and terminal states are permanent.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Create a new job ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is waiting in queue.
    Queued,
    /// Job is currently running.
    Running,
    /// Job completed successfully.
    Completed,
    /// Job failed with an error message.
    Failed(String),
    /// Job was cancelled.
    Cancelled,
}

impl JobStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed(_) | JobStatus::Cancelled
        )
    }

    /// Check if the job is still pending (queued or running).
    pub fn is_pending(&self) -> bool {
        !self.is_terminal()
    }

    fn rank(&self) -> u8 {
        match self {
            JobStatus::Queued => 0,
            JobStatus::Running => 1,
            JobStatus::Completed | JobStatus::Failed(_) | JobStatus::Cancelled => 2,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed(msg) => write!(f, "Failed: {msg}"),
            JobStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A submitted job and its timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// The job identifier.
    pub id: JobId,
    /// Current status.
    pub status: JobStatus,
    /// Number of shots requested.
    pub shots: u32,
    /// Backend the job was submitted to.
    pub backend: String,
    /// Time the job was created.
    pub created_at: DateTime<Utc>,
    /// Time the job started running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Time the job reached a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a queued job.
    pub fn new(id: impl Into<JobId>, shots: u32, backend: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Queued,
            shots,
            backend: backend.into(),
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Move the job to `status`, stamping start and finish times.
    ///
    /// Fails if the job is already terminal or the move would go backwards.
    pub fn transition(&mut self, status: JobStatus) -> HalResult<()> {
        if self.status.is_terminal() || status.rank() < self.status.rank() {
            return Err(HalError::InvalidTransition {
                job_id: self.id.clone(),
                from: self.status.clone(),
                to: status,
            });
        }

        let now = Utc::now();
        if status == JobStatus::Running || (status.is_terminal() && self.started_at.is_none()) {
            self.started_at.get_or_insert(now);
        }
        if status.is_terminal() {
            self.finished_at = Some(now);
        }
        self.status = status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_terminal() {
        assert!(JobStatus::Queued.is_pending());
        assert!(JobStatus::Running.is_pending());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed("boom".into()).is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_job_lifecycle_stamps_times() {
        let mut job = Job::new("job-1", 1024, "simulator");
        assert_eq!(job.status, JobStatus::Queued);
        assert!(job.started_at.is_none());

        job.transition(JobStatus::Running).unwrap();
        assert!(job.started_at.is_some());
        assert!(job.finished_at.is_none());

        job.transition(JobStatus::Completed).unwrap();
        assert!(job.finished_at.is_some());
        assert!(job.started_at.unwrap() <= job.finished_at.unwrap());
    }

    #[test]
    fn test_terminal_job_cannot_move() {
        let mut job = Job::new("job-2", 10, "simulator");
        job.transition(JobStatus::Cancelled).unwrap();
        assert!(job.transition(JobStatus::Running).is_err());
        assert_eq!(job.status, JobStatus::Cancelled);
    }

    #[test]
    fn test_job_cannot_move_backwards() {
        let mut job = Job::new("job-3", 10, "simulator");
        job.transition(JobStatus::Running).unwrap();
        assert!(job.transition(JobStatus::Queued).is_err());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&JobStatus::Failed("oom".into())).unwrap();
        assert_eq!(json, r#"{"state":"failed","reason":"oom"}"#);
        assert_eq!(JobId::from("abc").to_string(), "abc");
    }
}
