//! REST API client for the job-manager service.
//!
//! Wraps the jobs and tasks endpoints (job CRUD, task CRUD, aggregate
//! status, inactive-task maintenance) using [`reqwest`]. Expected
//! status codes follow the service contract: 200 for reads, updates
//! and deletes, 201 for creation; anything else is surfaced as
//! [`JobManagerError::Remote`] carrying the operation name, status
//! code, and response body.

use serde::Serialize;
use serde_json::Value;

use rasterflow_core::retry::{self, RetryPolicy};

use crate::config::JobManagerConfig;
use crate::error::JobManagerError;
use crate::models::{
    CreatedJob, CreatedTask, InactiveTasksCriteria, Job, JobFilter, JobUpdate, NewJob, NewTask,
    ResettableState, Task, TaskFindCriteria, TasksStatusSummary, TaskUpdate,
};
use crate::translate::{self, TranslatedBody, TranslatedResponse};

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;

/// HTTP client for one job-manager service instance.
pub struct JobManagerClient {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl JobManagerClient {
    /// Build a client from an explicit configuration.
    ///
    /// Reads the CA bundle (when configured) and constructs the
    /// underlying [`reqwest::Client`] with the request timeout applied
    /// to every call.
    pub fn new(config: JobManagerConfig) -> Result<Self, JobManagerError> {
        let mut builder = reqwest::Client::builder().timeout(config.request_timeout);

        if let Some(path) = &config.ca_bundle {
            let pem = std::fs::read(path).map_err(|e| {
                JobManagerError::Config(format!("cannot read CA bundle {}: {e}", path.display()))
            })?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                JobManagerError::Config(format!("invalid CA bundle {}: {e}", path.display()))
            })?;
            builder = builder.add_root_certificate(cert);
        }

        let client = builder
            .build()
            .map_err(|e| JobManagerError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry,
        })
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across services).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Base URL of the service this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ---- jobs ----

    /// Query jobs matching every provided filter field.
    ///
    /// Sends `GET /jobs`; only the filter fields that are set are
    /// forwarded as query parameters.
    pub async fn find_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, JobManagerError> {
        let url = format!("{}/jobs", self.base_url);
        let resp = self.get_with_retry("find_jobs", &url, Some(filter)).await?;
        Self::expect_json("find_jobs", STATUS_OK, resp)
    }

    /// Create a new job (optionally with its initial tasks).
    ///
    /// Sends `POST /jobs`; the service answers 201 with the created
    /// job id and its tasks' ids.
    pub async fn create_job(&self, spec: &NewJob) -> Result<CreatedJob, JobManagerError> {
        let url = format!("{}/jobs", self.base_url);
        tracing::debug!(resource_id = %spec.resource_id, version = %spec.version, "Creating job");
        let response = self.client.post(&url).json(spec).send().await?;
        Self::expect_json("create_job", STATUS_CREATED, translate::translate(response).await)
    }

    /// Create a job from a pre-serialized JSON body.
    ///
    /// The body must parse as a JSON object; anything else fails with
    /// [`JobManagerError::Validation`] before any network call is made.
    pub async fn create_job_raw(&self, body: &str) -> Result<CreatedJob, JobManagerError> {
        let parsed: Value = serde_json::from_str(body)
            .map_err(|e| JobManagerError::Validation(format!("job body is not valid JSON: {e}")))?;
        if !parsed.is_object() {
            return Err(JobManagerError::Validation(
                "job body must be a JSON object".to_string(),
            ));
        }

        let url = format!("{}/jobs", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await?;
        Self::expect_json("create_job", STATUS_CREATED, translate::translate(response).await)
    }

    /// Fetch one job by its identifier.
    ///
    /// Sends `GET /jobs/{id}?shouldReturnTasks=...`. A missing job
    /// surfaces as [`JobManagerError::Remote`] with the service's 404.
    pub async fn get_job(&self, id: &str, include_tasks: bool) -> Result<Job, JobManagerError> {
        let url = format!("{}/jobs/{}", self.base_url, id);
        let query = [("shouldReturnTasks", include_tasks)];
        let resp = self.get_with_retry("get_job", &url, Some(&query)).await?;
        Self::expect_json("get_job", STATUS_OK, resp)
    }

    /// Apply a partial update to an existing job (`PUT /jobs/{id}`).
    pub async fn update_job(&self, id: &str, patch: &JobUpdate) -> Result<(), JobManagerError> {
        let url = format!("{}/jobs/{}", self.base_url, id);
        tracing::debug!(job_id = %id, "Updating job");
        let response = self.client.put(&url).json(patch).send().await?;
        Self::expect_status("update_job", STATUS_OK, translate::translate(response).await)
    }

    /// Delete a job (`DELETE /jobs/{id}`). Rarely used; the watcher
    /// never calls this.
    pub async fn delete_job(&self, id: &str) -> Result<(), JobManagerError> {
        let url = format!("{}/jobs/{}", self.base_url, id);
        tracing::debug!(job_id = %id, "Deleting job");
        let response = self.client.delete(&url).send().await?;
        Self::expect_status("delete_job", STATUS_OK, translate::translate(response).await)
    }

    /// Ask whether a job can be reset (`POST /jobs/{id}/resettable`).
    pub async fn is_resettable(&self, id: &str) -> Result<ResettableState, JobManagerError> {
        let url = format!("{}/jobs/{}/resettable", self.base_url, id);
        let response = self.client.post(&url).send().await?;
        Self::expect_json("is_resettable", STATUS_OK, translate::translate(response).await)
    }

    /// Reset a resettable job (`POST /jobs/{id}/reset`). Returns the
    /// service's message text.
    pub async fn reset_job(&self, id: &str) -> Result<String, JobManagerError> {
        let url = format!("{}/jobs/{}/reset", self.base_url, id);
        tracing::debug!(job_id = %id, "Resetting job");
        let response = self.client.post(&url).send().await?;
        Self::expect_text("reset_job", STATUS_OK, translate::translate(response).await)
    }

    // ---- tasks ----

    /// List all tasks owned by a job (`GET /jobs/{id}/tasks`).
    pub async fn list_tasks(&self, job_id: &str) -> Result<Vec<Task>, JobManagerError> {
        let url = format!("{}/jobs/{}/tasks", self.base_url, job_id);
        let resp = self.get_with_retry("list_tasks", &url, None::<&()>).await?;
        Self::expect_json("list_tasks", STATUS_OK, resp)
    }

    /// Add a task to an existing job (`POST /jobs/{id}/tasks`).
    /// Returns the new task's id.
    pub async fn create_task(
        &self,
        job_id: &str,
        task: &NewTask,
    ) -> Result<String, JobManagerError> {
        let url = format!("{}/jobs/{}/tasks", self.base_url, job_id);
        let response = self.client.post(&url).json(task).send().await?;
        let created: CreatedTask =
            Self::expect_json("create_task", STATUS_CREATED, translate::translate(response).await)?;
        Ok(created.id)
    }

    /// Fetch one task (`GET /jobs/{jobId}/tasks/{taskId}`).
    pub async fn get_task(&self, job_id: &str, task_id: &str) -> Result<Task, JobManagerError> {
        let url = format!("{}/jobs/{}/tasks/{}", self.base_url, job_id, task_id);
        let resp = self.get_with_retry("get_task", &url, None::<&()>).await?;
        Self::expect_json("get_task", STATUS_OK, resp)
    }

    /// Apply a partial update to a task
    /// (`PUT /jobs/{jobId}/tasks/{taskId}`).
    pub async fn update_task(
        &self,
        job_id: &str,
        task_id: &str,
        patch: &TaskUpdate,
    ) -> Result<(), JobManagerError> {
        let url = format!("{}/jobs/{}/tasks/{}", self.base_url, job_id, task_id);
        tracing::debug!(job_id = %job_id, task_id = %task_id, "Updating task");
        let response = self.client.put(&url).json(patch).send().await?;
        Self::expect_status("update_task", STATUS_OK, translate::translate(response).await)
    }

    /// Delete a task (`DELETE /jobs/{jobId}/tasks/{taskId}`).
    pub async fn delete_task(&self, job_id: &str, task_id: &str) -> Result<(), JobManagerError> {
        let url = format!("{}/jobs/{}/tasks/{}", self.base_url, job_id, task_id);
        let response = self.client.delete(&url).send().await?;
        Self::expect_status("delete_task", STATUS_OK, translate::translate(response).await)
    }

    /// Aggregate per-task completion counts for a job
    /// (`GET /jobs/{id}/tasksStatus`).
    pub async fn all_tasks_status(
        &self,
        job_id: &str,
    ) -> Result<TasksStatusSummary, JobManagerError> {
        let url = format!("{}/jobs/{}/tasksStatus", self.base_url, job_id);
        let resp = self
            .get_with_retry("all_tasks_status", &url, None::<&()>)
            .await?;
        Self::expect_json("all_tasks_status", STATUS_OK, resp)
    }

    /// Search tasks matching the criteria (`POST /tasks/find`).
    pub async fn find_tasks(
        &self,
        criteria: &TaskFindCriteria,
    ) -> Result<Vec<Task>, JobManagerError> {
        let url = format!("{}/tasks/find", self.base_url);
        let response = self.client.post(&url).json(criteria).send().await?;
        Self::expect_json("find_tasks", STATUS_OK, translate::translate(response).await)
    }

    /// Claim the highest-priority pending task of the given types and
    /// move it to In-Progress
    /// (`POST /tasks/{jobType}/{taskType}/startPending`).
    pub async fn start_pending_task(
        &self,
        job_type: &str,
        task_type: &str,
    ) -> Result<Task, JobManagerError> {
        let url = format!(
            "{}/tasks/{}/{}/startPending",
            self.base_url, job_type, task_type
        );
        let response = self.client.post(&url).send().await?;
        Self::expect_json("start_pending_task", STATUS_OK, translate::translate(response).await)
    }

    /// Find tasks idle longer than the criteria's threshold
    /// (`POST /tasks/findInactive`). Returns the inactive task ids.
    pub async fn find_inactive_tasks(
        &self,
        criteria: &InactiveTasksCriteria,
    ) -> Result<Vec<String>, JobManagerError> {
        let url = format!("{}/tasks/findInactive", self.base_url);
        let response = self.client.post(&url).json(criteria).send().await?;
        Self::expect_json("find_inactive_tasks", STATUS_OK, translate::translate(response).await)
    }

    /// Release previously found inactive tasks back to the pool
    /// (`POST /tasks/releaseInactive`). Returns the released ids.
    pub async fn release_inactive_tasks(
        &self,
        ids: &[String],
    ) -> Result<Vec<String>, JobManagerError> {
        let url = format!("{}/tasks/releaseInactive", self.base_url);
        tracing::debug!(count = ids.len(), "Releasing inactive tasks");
        let response = self.client.post(&url).json(&ids).send().await?;
        Self::expect_json("release_inactive_tasks", STATUS_OK, translate::translate(response).await)
    }

    /// Expire open jobs and tasks whose expiration date has passed
    /// (`POST /tasks/updateExpiredStatus`). Returns the service's
    /// message text.
    pub async fn update_expired_status(&self) -> Result<String, JobManagerError> {
        let url = format!("{}/tasks/updateExpiredStatus", self.base_url);
        let response = self.client.post(&url).send().await?;
        Self::expect_text("update_expired_status", STATUS_OK, translate::translate(response).await)
    }

    // ---- private helpers ----

    /// Issue a GET, retrying transport failures under the configured
    /// [`RetryPolicy`]. Only GETs retry: they are idempotent, and the
    /// default single-attempt policy keeps retrying off entirely.
    async fn get_with_retry<Q: Serialize + ?Sized>(
        &self,
        operation: &'static str,
        url: &str,
        query: Option<&Q>,
    ) -> Result<TranslatedResponse, JobManagerError> {
        let mut attempts = 0u32;
        let mut delay = self.retry.initial_delay;

        loop {
            attempts += 1;
            let mut request = self.client.get(url);
            if let Some(q) = query {
                request = request.query(q);
            }

            match request.send().await {
                Ok(response) => return Ok(translate::translate(response).await),
                Err(e) if self.retry.allows_retry(attempts) => {
                    let wait = retry::jittered(delay);
                    tracing::warn!(
                        operation,
                        attempt = attempts,
                        delay_ms = wait.as_millis() as u64,
                        error = %e,
                        "Transport failure, retrying",
                    );
                    tokio::time::sleep(wait).await;
                    delay = retry::next_delay(delay, &self.retry);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Require the expected status code and decode the JSON body.
    fn expect_json<T: serde::de::DeserializeOwned>(
        operation: &'static str,
        expected: u16,
        resp: TranslatedResponse,
    ) -> Result<T, JobManagerError> {
        let resp = Self::check_status(operation, expected, resp)?;
        match resp.body {
            TranslatedBody::Json(value) => {
                serde_json::from_value(value).map_err(|e| JobManagerError::Remote {
                    operation,
                    status: resp.status,
                    body: format!("unexpected response shape: {e}"),
                })
            }
            TranslatedBody::Text(text) => Err(JobManagerError::Remote {
                operation,
                status: resp.status,
                body: format!("expected JSON body, got: {text}"),
            }),
        }
    }

    /// Require the expected status code and return the body text.
    fn expect_text(
        operation: &'static str,
        expected: u16,
        resp: TranslatedResponse,
    ) -> Result<String, JobManagerError> {
        let resp = Self::check_status(operation, expected, resp)?;
        Ok(resp.body_text())
    }

    /// Require the expected status code, discarding the body.
    fn expect_status(
        operation: &'static str,
        expected: u16,
        resp: TranslatedResponse,
    ) -> Result<(), JobManagerError> {
        Self::check_status(operation, expected, resp).map(|_| ())
    }

    fn check_status(
        operation: &'static str,
        expected: u16,
        resp: TranslatedResponse,
    ) -> Result<TranslatedResponse, JobManagerError> {
        if resp.status != expected {
            return Err(JobManagerError::Remote {
                operation,
                status: resp.status,
                body: resp.body_text(),
            });
        }
        Ok(resp)
    }
}
