//! Payload shapes of the comics API.
//!
//! # Design
//! The client hands back `Resolved` values and never decodes into these
//! types itself; consumers opt in through `Resolved::decode`. Reply types
//! default missing fields because the backend omits zero values in some
//! builds.

use serde::{Deserialize, Serialize};

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// One search hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comic {
    pub id: u64,
    pub url: String,
}

/// Reply of `GET /search` and `GET /isearch`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchReply {
    #[serde(default)]
    pub comics: Vec<Comic>,
    #[serde(default)]
    pub total: u64,
}

/// Reply of `GET /db/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DbStats {
    #[serde(default)]
    pub comics_total: u64,
    #[serde(default)]
    pub comics_fetched: u64,
    #[serde(default)]
    pub words_total: u64,
    #[serde(default)]
    pub words_unique: u64,
}

/// Reply of `GET /db/status`. `"running"` while an update is in progress.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateStatus {
    #[serde(default)]
    pub status: String,
}

impl UpdateStatus {
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}
