//! Job and task lifecycle statuses.
//!
//! The job-manager service reports the same status vocabulary for jobs
//! and their tasks. The wire strings are fixed by the service's REST
//! contract (note the hyphen in `In-Progress`).

use serde::{Deserialize, Serialize};

/// Lifecycle status of a job or task, as reported by the job manager.
///
/// Transitions are owned by the remote service and move monotonically
/// toward a terminal state; a `Completed` or `Failed` job never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    #[serde(rename = "In-Progress")]
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether this status is terminal (no further transitions expected).
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// The exact string the service uses on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "Pending",
            JobStatus::InProgress => "In-Progress",
            JobStatus::Completed => "Completed",
            JobStatus::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
