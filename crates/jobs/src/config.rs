//! Client configuration for the job-manager service.
//!
//! Everything a [`JobManagerClient`](crate::api::JobManagerClient)
//! needs is carried in an explicit [`JobManagerConfig`] passed at
//! construction — there is no process-global state consulted per
//! request.

use std::path::PathBuf;
use std::time::Duration;

use rasterflow_core::retry::RetryPolicy;

/// Configuration for one job-manager client instance.
#[derive(Debug, Clone)]
pub struct JobManagerConfig {
    /// Base URL of the job-manager service, e.g. `http://job-manager:8080`.
    pub base_url: String,
    /// Per-request timeout (default: 120 seconds).
    pub request_timeout: Duration,
    /// Optional PEM bundle installed as an additional root certificate,
    /// for services behind an internal CA.
    pub ca_bundle: Option<PathBuf>,
    /// Retry policy for idempotent reads. The default allows a single
    /// attempt, i.e. no retrying.
    pub retry: RetryPolicy,
}

impl JobManagerConfig {
    /// Build a configuration with defaults for everything but the URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(120),
            ca_bundle: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                  |
    /// |----------------------------|--------------------------|
    /// | `JOB_MANAGER_URL`          | `http://localhost:8080`  |
    /// | `JOB_MANAGER_TIMEOUT_SECS` | `120`                    |
    /// | `CERT_DIR`                 | unset (no extra CA)      |
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("JOB_MANAGER_URL").unwrap_or_else(|_| "http://localhost:8080".into());

        let timeout_secs: u64 = std::env::var("JOB_MANAGER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("JOB_MANAGER_TIMEOUT_SECS must be a valid u64");

        let ca_bundle = std::env::var("CERT_DIR").ok().map(PathBuf::from);

        Self {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            ca_bundle,
            retry: RetryPolicy::default(),
        }
    }
}
