//! Adaptive API client for the comics indexing backend.
//!
//! # Overview
//! One request path serves every operation (login, ping, search, stats,
//! status, update, drop): a `RequestDescriptor` is prepared with the default
//! headers and the session token, sent through a `Transport`, and the
//! response is resolved into either decoded JSON or raw text.
//!
//! # Design
//! - The backend does not label its bodies reliably, so `resolve::sniff`
//!   decides by content and degrades to text instead of failing.
//! - Errors carry the backend's message verbatim; callers match on it.
//! - The auth token lives in an explicit `Session`, shared by `Arc` and set
//!   once after login.
//! - `ComicsApi` is the contract front ends depend on, so they can be tested
//!   against a fake.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod resolve;
pub mod session;
pub mod transport;
pub mod types;

pub use api::{parse_limit, ComicsApi, DEFAULT_SEARCH_LIMIT};
pub use client::{ClientConfig, ComicsClient};
pub use error::{ApiError, ClientError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestDescriptor};
pub use resolve::{resolve, sniff, Resolved};
pub use session::Session;
pub use transport::{Transport, UreqTransport};
pub use types::{Comic, DbStats, LoginRequest, SearchReply, UpdateStatus};
