//! Shared test harness: an in-process stub of the job-manager REST
//! service bound to an ephemeral port.
//!
//! Job state is scripted: each job id maps to a queue of snapshots,
//! and every `GET /jobs/{id}` advances the queue (keeping the last
//! snapshot), so tests can drive status transitions across polls.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use rasterflow_jobs::api::JobManagerClient;
use rasterflow_jobs::config::JobManagerConfig;

#[derive(Default)]
pub struct StubState {
    /// Scripted snapshots per job id; the front is the current state.
    pub jobs: HashMap<String, VecDeque<Value>>,
    /// Query parameters received by the most recent `GET /jobs`.
    pub last_find_query: Option<HashMap<String, String>>,
    /// Ids the stub answers on `POST /tasks/findInactive`.
    pub inactive_ids: Vec<String>,
}

pub type SharedState = Arc<Mutex<StubState>>;

pub struct StubServer {
    pub base_url: String,
    pub state: SharedState,
}

impl StubServer {
    /// Seed a job from an ordered sequence of snapshots. The first
    /// snapshot's `id` keys the job.
    pub fn seed(&self, snapshots: Vec<Value>) {
        let id = snapshots[0]["id"].as_str().unwrap().to_string();
        self.state
            .lock()
            .unwrap()
            .jobs
            .insert(id, snapshots.into());
    }
}

/// Start the stub service and return its handle.
pub async fn spawn_stub() -> StubServer {
    let state: SharedState = Arc::new(Mutex::new(StubState::default()));
    let app = router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubServer {
        base_url: format!("http://{addr}"),
        state,
    }
}

/// Build a client pointed at the stub with default configuration.
pub fn test_client(stub: &StubServer) -> JobManagerClient {
    JobManagerClient::new(JobManagerConfig::new(stub.base_url.clone())).unwrap()
}

/// Build a job snapshot in the service's wire shape, with one task
/// per entry of `task_statuses`.
pub fn job_snapshot(
    id: &str,
    resource_id: &str,
    version: &str,
    status: &str,
    reason: &str,
    task_statuses: &[&str],
) -> Value {
    let tasks: Vec<Value> = task_statuses
        .iter()
        .enumerate()
        .map(|(i, s)| {
            json!({
                "id": format!("{id}-t{i}"),
                "jobId": id,
                "status": s,
                "percentage": 0,
                "attempts": 0,
                "parameters": {},
            })
        })
        .collect();

    json!({
        "id": id,
        "resourceId": resource_id,
        "version": version,
        "type": "Discrete-Tiling",
        "status": status,
        "reason": reason,
        "percentage": 0,
        "priority": 0,
        "isCleaned": false,
        "parameters": {},
        "tasks": tasks,
    })
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/jobs", get(find_jobs).post(create_job))
        .route(
            "/jobs/{id}",
            get(get_job).put(update_job).delete(delete_job),
        )
        .route("/jobs/{id}/resettable", post(resettable))
        .route("/jobs/{id}/reset", post(reset))
        .route("/jobs/{id}/tasks", get(list_tasks).post(create_task))
        .route(
            "/jobs/{id}/tasks/{task_id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/jobs/{id}/tasksStatus", get(tasks_status))
        .route("/tasks/find", post(find_tasks))
        .route("/tasks/findInactive", post(find_inactive))
        .route("/tasks/releaseInactive", post(release_inactive))
        .route("/tasks/updateExpiredStatus", post(update_expired))
        .route(
            "/tasks/{job_type}/{task_type}/startPending",
            post(start_pending),
        )
        .with_state(state)
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"message": "not found"})))
}

fn matches_param(job: &Value, params: &HashMap<String, String>, key: &str) -> bool {
    match params.get(key) {
        Some(v) => job[key].as_str() == Some(v.as_str()),
        None => true,
    }
}

// ---- job handlers ----

async fn find_jobs(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.last_find_query = Some(params.clone());

    let jobs: Vec<Value> = s
        .jobs
        .values()
        .filter_map(|q| q.front())
        .filter(|job| {
            matches_param(job, &params, "resourceId")
                && matches_param(job, &params, "version")
                && matches_param(job, &params, "type")
                && matches_param(job, &params, "status")
        })
        .cloned()
        .collect();
    Json(Value::Array(jobs))
}

async fn create_job(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let id = uuid::Uuid::new_v4().to_string();
    let mut job = body;
    job["id"] = json!(id);

    let mut task_ids = Vec::new();
    if let Some(tasks) = job["tasks"].as_array_mut() {
        for task in tasks {
            let task_id = uuid::Uuid::new_v4().to_string();
            task["id"] = json!(task_id);
            task["jobId"] = json!(id);
            task_ids.push(task_id);
        }
    }

    state
        .lock()
        .unwrap()
        .jobs
        .insert(id.clone(), VecDeque::from([job]));

    (
        StatusCode::CREATED,
        Json(json!({"id": id, "taskIds": task_ids})),
    )
}

async fn get_job(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let mut s = state.lock().unwrap();
    let Some(snapshots) = s.jobs.get_mut(&id) else {
        return not_found().into_response();
    };
    if snapshots.len() > 1 {
        snapshots.pop_front();
    }
    let mut job = snapshots.front().unwrap().clone();
    if params.get("shouldReturnTasks").map(String::as_str) == Some("false") {
        job.as_object_mut().unwrap().remove("tasks");
    }
    Json(job).into_response()
}

async fn update_job(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> axum::response::Response {
    let mut s = state.lock().unwrap();
    let Some(job) = s.jobs.get_mut(&id).and_then(|q| q.front_mut()) else {
        return not_found().into_response();
    };
    for (key, value) in patch.as_object().unwrap() {
        job[key] = value.clone();
    }
    Json(json!("Job updated successfully")).into_response()
}

async fn delete_job(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match state.lock().unwrap().jobs.remove(&id) {
        Some(_) => Json(json!({"id": id})).into_response(),
        None => not_found().into_response(),
    }
}

async fn resettable(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match state.lock().unwrap().jobs.get(&id) {
        Some(_) => Json(json!({"jobId": id, "isResettable": true})).into_response(),
        None => not_found().into_response(),
    }
}

async fn reset(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match state.lock().unwrap().jobs.get(&id) {
        Some(_) => "job reset".into_response(),
        None => not_found().into_response(),
    }
}

// ---- task handlers ----

async fn list_tasks(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match state.lock().unwrap().jobs.get(&id).and_then(|q| q.front()) {
        Some(job) => Json(job["tasks"].clone()).into_response(),
        None => not_found().into_response(),
    }
}

async fn create_task(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(task): Json<Value>,
) -> axum::response::Response {
    let mut s = state.lock().unwrap();
    let Some(job) = s.jobs.get_mut(&id).and_then(|q| q.front_mut()) else {
        return not_found().into_response();
    };
    let task_id = uuid::Uuid::new_v4().to_string();
    let mut task = task;
    task["id"] = json!(task_id);
    task["jobId"] = json!(id);
    job["tasks"].as_array_mut().unwrap().push(task);
    (StatusCode::CREATED, Json(json!({"id": task_id}))).into_response()
}

async fn get_task(
    State(state): State<SharedState>,
    Path((id, task_id)): Path<(String, String)>,
) -> axum::response::Response {
    let s = state.lock().unwrap();
    let task = s
        .jobs
        .get(&id)
        .and_then(|q| q.front())
        .and_then(|job| job["tasks"].as_array())
        .and_then(|tasks| {
            tasks
                .iter()
                .find(|t| t["id"].as_str() == Some(task_id.as_str()))
        });
    match task {
        Some(task) => Json(task.clone()).into_response(),
        None => not_found().into_response(),
    }
}

async fn update_task(
    State(state): State<SharedState>,
    Path((id, task_id)): Path<(String, String)>,
    Json(patch): Json<Value>,
) -> axum::response::Response {
    let mut s = state.lock().unwrap();
    let task = s
        .jobs
        .get_mut(&id)
        .and_then(|q| q.front_mut())
        .and_then(|job| job["tasks"].as_array_mut())
        .and_then(|tasks| {
            tasks
                .iter_mut()
                .find(|t| t["id"].as_str() == Some(task_id.as_str()))
        });
    let Some(task) = task else {
        return not_found().into_response();
    };
    for (key, value) in patch.as_object().unwrap() {
        task[key] = value.clone();
    }
    Json(json!("Task updated successfully")).into_response()
}

async fn delete_task(
    State(state): State<SharedState>,
    Path((id, task_id)): Path<(String, String)>,
) -> axum::response::Response {
    let mut s = state.lock().unwrap();
    let tasks = s
        .jobs
        .get_mut(&id)
        .and_then(|q| q.front_mut())
        .and_then(|job| job["tasks"].as_array_mut());
    let Some(tasks) = tasks else {
        return not_found().into_response();
    };
    tasks.retain(|t| t["id"].as_str() != Some(task_id.as_str()));
    Json(json!("Task deleted")).into_response()
}

async fn tasks_status(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let s = state.lock().unwrap();
    let Some(job) = s.jobs.get(&id).and_then(|q| q.front()) else {
        return not_found().into_response();
    };
    let tasks = job["tasks"].as_array().cloned().unwrap_or_default();
    let completed = tasks
        .iter()
        .filter(|t| t["status"] == "Completed")
        .count() as u32;
    let failed = tasks.iter().filter(|t| t["status"] == "Failed").count() as u32;
    Json(json!({
        "allTasksCompleted": completed as usize == tasks.len(),
        "failedTasksCount": failed,
        "completedTasksCount": completed,
        "resourceId": job["resourceId"],
        "resourceVersion": job["version"],
    }))
    .into_response()
}

async fn find_tasks(
    State(state): State<SharedState>,
    Json(criteria): Json<Value>,
) -> Json<Value> {
    let s = state.lock().unwrap();
    let tasks: Vec<Value> = s
        .jobs
        .values()
        .filter_map(|q| q.front())
        .flat_map(|job| job["tasks"].as_array().cloned().unwrap_or_default())
        .filter(|t| {
            criteria["jobId"]
                .as_str()
                .map_or(true, |v| t["jobId"].as_str() == Some(v))
                && criteria["status"]
                    .as_str()
                    .map_or(true, |v| t["status"].as_str() == Some(v))
        })
        .collect();
    Json(Value::Array(tasks))
}

async fn find_inactive(State(state): State<SharedState>) -> Json<Value> {
    Json(json!(state.lock().unwrap().inactive_ids))
}

async fn release_inactive(Json(ids): Json<Value>) -> Json<Value> {
    Json(ids)
}

async fn update_expired(State(_state): State<SharedState>) -> &'static str {
    "expired statuses updated"
}

async fn start_pending(
    State(state): State<SharedState>,
    Path((_job_type, task_type)): Path<(String, String)>,
) -> axum::response::Response {
    let mut s = state.lock().unwrap();
    for snapshots in s.jobs.values_mut() {
        let Some(job) = snapshots.front_mut() else {
            continue;
        };
        if let Some(tasks) = job["tasks"].as_array_mut() {
            for task in tasks {
                if task["status"] == "Pending" {
                    task["status"] = json!("In-Progress");
                    task["type"] = json!(task_type);
                    return Json(task.clone()).into_response();
                }
            }
        }
    }
    not_found().into_response()
}
