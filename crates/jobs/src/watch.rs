//! Completion watcher: follow one job until it reaches a terminal
//! status or a deadline expires.
//!
//! The watcher is read-only with respect to the job it observes — it
//! only issues `find` and `get` calls, never updates. A query failure
//! mid-poll (including a job deleted by another actor) propagates to
//! the caller instead of being folded into a watch result.

use std::time::Duration;

use tokio::time::Instant;

use rasterflow_core::status::JobStatus;

use crate::api::JobManagerClient;
use crate::error::JobManagerError;
use crate::models::{JobFilter, Task};

/// Parameters identifying the job to follow and bounding the watch.
#[derive(Debug, Clone)]
pub struct WatchParams {
    pub resource_id: String,
    pub version: String,
    pub job_type: String,
    /// Overall deadline for the watch (default: 300 seconds).
    pub timeout: Duration,
    /// Nominal polling interval; the loop sleeps a quarter of this
    /// between polls (default: 80 seconds).
    pub poll_interval: Duration,
}

impl WatchParams {
    /// Watch parameters with the default timeout and poll interval.
    pub fn new(
        resource_id: impl Into<String>,
        version: impl Into<String>,
        job_type: impl Into<String>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            version: version.into(),
            job_type: job_type.into(),
            timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(80),
        }
    }
}

/// Outcome of a watch: the job's final observed state.
#[derive(Debug, Clone)]
pub struct WatchResult {
    /// Final observed status. Non-terminal only when the deadline
    /// expired first.
    pub status: JobStatus,
    /// Human-readable summary (`OK ...` or `Failed: ...`).
    pub message: String,
    pub job_id: String,
    /// Task sequence from the last poll.
    pub tasks: Vec<Task>,
}

/// Follow a job until it completes, fails, or the deadline expires.
///
/// Resolves the job via `find_jobs` with the resource id, version and
/// job type, then polls `get_job` every `poll_interval / 4`, logging
/// per-task completion progress. Returns a [`WatchResult`] on a
/// terminal status or on timeout; fails with
/// [`JobManagerError::NotFound`] when no matching job exists and
/// propagates any query failure during polling.
pub async fn follow_job(
    client: &JobManagerClient,
    params: &WatchParams,
) -> Result<WatchResult, JobManagerError> {
    let deadline = Instant::now() + params.timeout;

    let filter = JobFilter {
        resource_id: Some(params.resource_id.clone()),
        version: Some(params.version.clone()),
        job_type: Some(params.job_type.clone()),
        include_tasks: Some(true),
        ..Default::default()
    };

    let mut job = client
        .find_jobs(&filter)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| JobManagerError::NotFound {
            resource_id: params.resource_id.clone(),
            version: params.version.clone(),
        })?;

    tracing::info!(
        job_id = %job.id,
        resource_id = %job.resource_id,
        version = %job.version,
        status = %job.status,
        task_count = job.tasks.len(),
        "Found job to follow",
    );

    loop {
        tokio::time::sleep(params.poll_interval / 4).await;

        job = client.get_job(&job.id, true).await?;

        let completed = completed_tasks(&job.tasks);
        tracing::info!(
            job_id = %job.id,
            status = %job.status,
            completed,
            total = job.tasks.len(),
            "Job progress",
        );

        let reason = job.reason.clone().unwrap_or_default();
        match job.status {
            JobStatus::Completed => {
                return Ok(WatchResult {
                    status: job.status,
                    message: ["OK", &reason].join(" "),
                    job_id: job.id,
                    tasks: job.tasks,
                });
            }
            JobStatus::Failed => {
                return Ok(WatchResult {
                    status: job.status,
                    message: ["Failed: ", &reason].join(" "),
                    job_id: job.id,
                    tasks: job.tasks,
                });
            }
            _ => {}
        }

        if Instant::now() >= deadline {
            tracing::warn!(job_id = %job.id, status = %job.status, "Watch deadline expired");
            return Ok(WatchResult {
                status: job.status,
                message: ["Failed: ", "timeout while following job"].join(" "),
                job_id: job.id,
                tasks: job.tasks,
            });
        }
    }
}

/// Count the tasks that have reached `Completed`.
pub fn completed_tasks(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .filter(|t| t.status == JobStatus::Completed)
        .count()
}
