use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failures of a memory backend. Never shown to callers of the relay.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt history in {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("memory store lock poisoned")]
    Poisoned,
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("message content is empty")]
    Validation,
    #[error("provider did not answer within {0:?}")]
    Timeout(Duration),
    #[error("provider rejected the credential (status {status})")]
    Auth { status: u16 },
    #[error("provider rate limit reached")]
    RateLimited,
    #[error("provider error (status {status:?}): {message}")]
    Provider {
        status: Option<u16>,
        message: String,
    },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("configuration error: {0}")]
    Config(String),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation => StatusCode::BAD_REQUEST,
            RelayError::Auth { .. } => StatusCode::UNAUTHORIZED,
            RelayError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to hand back to the end user.
    pub fn user_message(&self) -> String {
        match self {
            RelayError::Validation => "Message content cannot be empty.".to_string(),
            RelayError::Timeout(_) => {
                "The request timed out, the network may be slow.".to_string()
            }
            RelayError::Auth { .. } => {
                "The service is misconfigured (invalid API key).".to_string()
            }
            RelayError::RateLimited => {
                "Too many requests, please take a break and try again.".to_string()
            }
            RelayError::Provider { message, .. } => {
                format!("The AI coach is unavailable right now: {}", message)
            }
            RelayError::Network(_) => {
                "The AI coach is unavailable right now, please try again later.".to_string()
            }
            RelayError::Storage(_) | RelayError::Config(_) => "Internal server error.".to_string(),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            RelayError::Validation => json!({ "error": self.user_message() }),
            _ => json!({ "success": false, "error": self.user_message() }),
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
