//! Errors reported by the marketplace API.

use std::fmt;

use reqwest::StatusCode;

use crate::error::StorefrontError;

/// A non-success HTTP response from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code, if available
    pub status: Option<StatusCode>,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Build an error from a failed response and its body.
    ///
    /// Uses the body's `message` field when it is JSON that has one, else
    /// the canonical reason for the status.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = message_from_body(body)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "request failed".to_string());
        Self {
            status: Some(status),
            message,
        }
    }

    /// Server-side failures that may succeed when retried.
    pub fn is_transient(&self) -> bool {
        self.status.is_some_and(|s| s.is_server_error())
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status
            .is_some_and(|s| s == StatusCode::UNAUTHORIZED || s == StatusCode::FORBIDDEN)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({})", self.message, status.as_u16()),
            None => write!(f, "{}", self.message),
        }
    }
}

impl From<ApiError> for StorefrontError {
    fn from(error: ApiError) -> Self {
        StorefrontError::Api(error.to_string())
    }
}

/// The `message` field of a JSON error body, if any.
pub fn message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
