//! Session state: the operator's auth token.
//!
//! A `Session` is created empty, receives its token once after a successful
//! login and is read-only from then on. It is shared with the client as an
//! `Arc<Session>`, so every in-flight request reads the same value without
//! locking.

use std::sync::OnceLock;

use crate::error::ClientError;

#[derive(Debug, Default)]
pub struct Session {
    token: OnceLock<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the login token. Fails if the session already holds one, or if
    /// the token is empty (an empty token would be sent as `Token `).
    pub fn set_token(&self, token: impl Into<String>) -> Result<(), ClientError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ClientError::EmptyToken);
        }
        self.token
            .set(token)
            .map_err(|_| ClientError::AlreadyAuthenticated)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.get().map(String::as_str)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.get().is_some()
    }
}
