//! Error types for the CAMB.AI API client.

use thiserror::Error;

use super::types::{RunId, TaskKind, TaskStatus};

/// Result type alias for CAMB.AI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for CAMB.AI API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or unusable client configuration, such as the API key.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A request parameter is outside its documented domain.
    ///
    /// Raised before any network I/O happens.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The remote service answered with a non-success HTTP status.
    #[error("camb: request rejected with http {http_status}: {body}")]
    Api { http_status: u16, body: String },

    /// The remote service broke its own contract, e.g. SUCCESS without a run id.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The task reached a terminal status other than SUCCESS.
    #[error("{kind} task {task_id} ended with status {status} (run_id={})", fmt_run_id(.run_id))]
    TaskFailed {
        kind: TaskKind,
        status: TaskStatus,
        task_id: String,
        run_id: Option<RunId>,
    },

    /// The caller's polling deadline elapsed before a terminal status.
    #[error("{kind} task {task_id} still pending after {waited:?}")]
    DeadlineExceeded {
        kind: TaskKind,
        task_id: String,
        waited: std::time::Duration,
    },

    /// Polling was cancelled by the caller.
    #[error("{kind} task {task_id} polling cancelled")]
    Cancelled { kind: TaskKind, task_id: String },

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn fmt_run_id(run_id: &Option<RunId>) -> String {
    match run_id {
        Some(id) => id.to_string(),
        None => "none".to_string(),
    }
}

impl Error {
    /// Creates a validation error for the named field.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Returns true if the error was raised locally before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Returns true if the remote service rejected the request.
    pub fn is_api(&self) -> bool {
        matches!(self, Error::Api { .. })
    }

    /// Returns true if the API key was rejected.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Api { http_status, .. } if *http_status == 401 || *http_status == 403)
    }

    /// Returns true if the remote service declared success without a result handle.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::Protocol(_))
    }

    /// Returns true if the task ended in a failure status.
    pub fn is_task_failed(&self) -> bool {
        matches!(self, Error::TaskFailed { .. })
    }

    /// Returns true if the task stopped because the account needs payment.
    pub fn is_payment_required(&self) -> bool {
        matches!(
            self,
            Error::TaskFailed {
                status: TaskStatus::PaymentRequired,
                ..
            }
        )
    }

    /// Returns true if the remote service reported the task as timed out.
    pub fn is_task_timeout(&self) -> bool {
        matches!(
            self,
            Error::TaskFailed {
                status: TaskStatus::Timeout,
                ..
            }
        )
    }

    /// Returns the terminal status reported by the remote service, if any.
    pub fn task_status(&self) -> Option<&TaskStatus> {
        match self {
            Error::TaskFailed { status, .. } => Some(status),
            _ => None,
        }
    }
}
