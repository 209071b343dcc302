//! Error types and handling
//!
//! Every failure the console can run into is folded into [`ConsoleError`]. Views
//! distinguish authorization failures (rendered with a fixed message, no retry) from
//! everything else (rendered with the message the API sent, or a generic fallback).

use serde::Deserialize;
use thiserror::Error;
use tracing::error;

/// Message shown for authorization failures, whatever the API said
pub const FORBIDDEN_MESSAGE: &str = "Only administrators can access this page.";

/// Console error types
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConsoleError {
    /// Missing, expired or insufficient credential (401/403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Any other non-2xx answer from the API
    #[error("Request failed ({status}): {message}")]
    Api { status: u16, message: String },

    /// Connection refused, timeout, TLS failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Client-side validation failed, nothing was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Selected record is not part of the current collection
    #[error("Not found: {0}")]
    NotFound(String),

    /// Export artifact could not be written
    #[error("Export error: {0}")]
    Export(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConsoleError {
    /// Classify a non-2xx response by status code and body
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = extract_error_message(body);
        match status {
            401 | 403 => {
                ConsoleError::Forbidden(detail.unwrap_or_else(|| "Not authorized".to_string()))
            }
            _ => ConsoleError::Api {
                status,
                message: detail
                    .unwrap_or_else(|| format!("Request failed with status {}", status)),
            },
        }
    }

    /// Whether this is an authorization failure
    pub fn is_authorization(&self) -> bool {
        matches!(self, ConsoleError::Forbidden(_))
    }

    /// HTTP status behind this error, if it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ConsoleError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text to show the operator
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Forbidden(_) => FORBIDDEN_MESSAGE.to_string(),
            ConsoleError::Api { message, .. } => message.clone(),
            ConsoleError::Transport(msg)
            | ConsoleError::Decode(msg)
            | ConsoleError::Validation(msg)
            | ConsoleError::NotFound(msg)
            | ConsoleError::Export(msg)
            | ConsoleError::Config(msg) => msg.clone(),
        }
    }
}

/// Structured error body sent by the API
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Pull a human-readable message out of an error body
///
/// Understands `{"detail": "..."}`, validation arrays
/// (`{"detail": [{"msg": "..."}, ...]}`) and `{"message": "..."}`.
pub fn extract_error_message(body: &str) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_str(body).ok()?;

    match payload.detail {
        Some(serde_json::Value::String(detail)) if !detail.trim().is_empty() => {
            return Some(detail);
        }
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }

    payload.message.filter(|m| !m.trim().is_empty())
}

impl From<reqwest::Error> for ConsoleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ConsoleError::Transport("Request to the depot API timed out".to_string())
        } else if err.is_connect() {
            ConsoleError::Transport("Failed to connect to the depot API".to_string())
        } else if err.is_decode() {
            ConsoleError::Decode(err.to_string())
        } else {
            error!(error = %err, "Unexpected HTTP client error");
            ConsoleError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Decode(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for ConsoleError {
    fn from(err: validator::ValidationErrors) -> Self {
        ConsoleError::Validation(err.to_string())
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        ConsoleError::Export(err.to_string())
    }
}

/// Result type alias for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;
