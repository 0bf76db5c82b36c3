//! Error types for the comics API client.
//!
//! # Design
//! The backend reports failures as free-form text, so `ApiError` carries the
//! raw body as its message and nothing more structured than the status code.
//! Callers tell failures apart by looking for fragments of that message
//! (`"already runs"`, for instance); `mentions` is the helper for it.
//! A 2xx body that fails to decode is never an error, see `resolve`.

use std::fmt;

use thiserror::Error;

/// A non-2xx answer from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    /// Build from a failed response body, falling back to `HTTP <status>`
    /// when the backend sent nothing.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body.to_string()
        };
        Self { status, message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the backend's message contains `fragment`.
    pub fn mentions(&self, fragment: &str) -> bool {
        self.message.contains(fragment)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

/// Errors returned by `ComicsClient` operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The round trip itself failed (connection refused, reset, bad URL...).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request body could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A token was already stored in this session.
    #[error("session is already authenticated")]
    AlreadyAuthenticated,

    /// Login succeeded but the backend sent no token.
    #[error("login returned an empty token")]
    EmptyToken,
}

impl ClientError {
    /// The backend error, if this failure came from a non-2xx response.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_body_when_present() {
        let err = ApiError::from_body(409, "update already runs");
        assert_eq!(err.message(), "update already runs");
        assert_eq!(err.to_string(), "update already runs");
        assert!(err.mentions("already runs"));
    }

    #[test]
    fn message_falls_back_to_status() {
        let err = ApiError::from_body(502, "");
        assert_eq!(err.message(), "HTTP 502");
        assert!(!err.mentions("already runs"));
    }

    #[test]
    fn client_error_displays_api_message_verbatim() {
        let err = ClientError::from(ApiError::from_body(401, "unauthorized"));
        assert_eq!(err.to_string(), "unauthorized");
        assert_eq!(err.api().map(|e| e.status), Some(401));
        assert!(ClientError::Network("refused".into()).api().is_none());
    }
}
