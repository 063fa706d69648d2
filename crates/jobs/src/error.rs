//! Error taxonomy for the job-manager client.

/// Errors surfaced by [`JobManagerClient`](crate::api::JobManagerClient)
/// operations and the completion watcher.
#[derive(Debug, thiserror::Error)]
pub enum JobManagerError {
    /// The HTTP request itself failed (connection refused, timeout,
    /// TLS failure).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service responded with a status code other than the one
    /// documented for this operation.
    #[error("[{operation}] job manager returned {status}: {body}")]
    Remote {
        /// The client operation that observed the failure.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A query returned zero matching jobs where one was expected.
    #[error("no job found for resource {resource_id}:{version}")]
    NotFound { resource_id: String, version: String },

    /// The caller supplied a request body of the wrong shape.
    #[error("invalid request body: {0}")]
    Validation(String),

    /// The client configuration is unusable (bad base URL, unreadable
    /// CA bundle).
    #[error("configuration error: {0}")]
    Config(String),
}
