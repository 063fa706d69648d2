//! Typed wire models for the job-manager REST contract.
//!
//! Field names follow the service's camelCase JSON exactly. Optional
//! filter and patch fields are omitted from the serialized body when
//! unset, so partial updates touch only the fields the caller named.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use rasterflow_core::status::JobStatus;
use rasterflow_core::types::Timestamp;

/// One ingestion unit of work, as returned by the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub resource_id: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Value,
    pub status: JobStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(rename = "type")]
    pub job_type: String,
    #[serde(default)]
    pub percentage: Option<u8>,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub is_cleaned: Option<bool>,
    #[serde(default)]
    pub expiration_date: Option<Timestamp>,
    #[serde(default)]
    pub created: Option<Timestamp>,
    #[serde(default)]
    pub updated: Option<Timestamp>,
    /// Absent when the query was made with `shouldReturnTasks=false`.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// A unit of work owned by exactly one [`Job`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Value,
    pub status: JobStatus,
    #[serde(default)]
    pub percentage: Option<u8>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(rename = "type", default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub created: Option<Timestamp>,
    #[serde(default)]
    pub updated: Option<Timestamp>,
}

/// Query filter for `GET /jobs`. Unset fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_cleaned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(
        rename = "shouldReturnTasks",
        skip_serializing_if = "Option::is_none"
    )]
    pub include_tasks: Option<bool>,
}

/// Body for `POST /jobs`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub resource_id: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "type")]
    pub job_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tasks: Vec<NewTask>,
}

impl NewJob {
    /// Minimal creation spec: resource, version, and job type.
    pub fn new(
        resource_id: impl Into<String>,
        version: impl Into<String>,
        job_type: impl Into<String>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            version: version.into(),
            description: None,
            parameters: None,
            status: None,
            reason: None,
            job_type: job_type.into(),
            percentage: None,
            priority: None,
            expiration_date: None,
            tasks: Vec::new(),
        }
    }
}

/// A task embedded in a [`NewJob`] or posted to `POST /jobs/{id}/tasks`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

/// Response of `POST /jobs`: the created job id and its tasks' ids.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedJob {
    pub id: String,
    #[serde(default)]
    pub task_ids: Vec<String>,
}

/// Response of `POST /jobs/{id}/tasks`: the created task id.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTask {
    pub id: String,
}

/// Partial-update patch for `PUT /jobs/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_cleaned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<Timestamp>,
}

/// Partial-update patch for `PUT /jobs/{jobId}/tasks/{taskId}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

/// Aggregate task counts from `GET /jobs/{id}/tasksStatus`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksStatusSummary {
    pub all_tasks_completed: bool,
    pub failed_tasks_count: u32,
    pub completed_tasks_count: u32,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub resource_version: Option<String>,
}

/// Search body for `POST /tasks/find`. Unset fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFindCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,
}

/// A (job type, task type) pair used by the inactive-task queries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTaskTypePair {
    pub job_type: String,
    pub task_type: String,
}

/// Body for `POST /tasks/findInactive`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InactiveTasksCriteria {
    /// Tasks idle longer than this many seconds are considered inactive.
    pub inactive_time_sec: u64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub types: Vec<JobTaskTypePair>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub ignore_types: Vec<JobTaskTypePair>,
}

/// Response of `POST /jobs/{id}/resettable` and `/jobs/{id}/reset`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResettableState {
    pub job_id: String,
    pub is_resettable: bool,
}
