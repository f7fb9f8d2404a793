//! Transport errors for the render backend.

use cutdeck_core::CutdeckError;
use serde_json::Value;
use thiserror::Error;

/// Failure talking to the backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Request(String),

    /// Non-success HTTP status, with the best detail the body offered.
    #[error("{detail}")]
    Status { status: u16, detail: String },

    /// The response body was not what the endpoint promises.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// A local file could not be read for upload.
    #[error("Could not read {path}: {reason}")]
    ReadFile { path: String, reason: String },

    /// A downloaded export could not be saved.
    #[error("Could not write {path}: {reason}")]
    WriteFile { path: String, reason: String },
}

impl BackendError {
    /// Build a status error from a raw response body.
    ///
    /// FastAPI-style `{"detail": "..."}` bodies are unwrapped; validation
    /// error lists are joined by their `msg` fields; anything else falls
    /// back to the trimmed body or the bare status.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            detail: extract_detail(status, body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn extract_detail(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        match value.get("detail") {
            Some(Value::String(detail)) if !detail.trim().is_empty() => return detail.clone(),
            Some(Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            _ => {}
        }
    }
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {body}")
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<BackendError> for CutdeckError {
    fn from(err: BackendError) -> Self {
        CutdeckError::Transport(err.to_string())
    }
}
