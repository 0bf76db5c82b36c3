//! The comics API client.
//!
//! # Design
//! Each operation is split the same way: a `build_*` method produces the
//! `RequestDescriptor` (pure, no session involved), `prepare` applies the
//! base URL, default headers, the session token and JSON encoding, the
//! `Transport` performs the round trip, and `resolve` turns the response
//! into `Resolved` or an `ApiError`. Only `prepare`/`send` know about the
//! session, so every operation gets the same header treatment.

use std::sync::Arc;

use crate::api::ComicsApi;
use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse, RequestDescriptor};
use crate::resolve::{resolve, Resolved};
use crate::session::Session;
use crate::transport::{Transport, UreqTransport};
use crate::types::LoginRequest;

/// Prefix every backend route lives under.
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Scheme put in front of the token in the `Authorization` header.
pub const AUTH_SCHEME: &str = "Token";

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_prefix: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }

    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        self.api_prefix = prefix.trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, self.api_prefix, path)
    }
}

/// Client for the comics backend.
///
/// Holds a shared handle to the operator's `Session`; the token stored there
/// is attached to every request issued after it was set.
#[derive(Debug, Clone)]
pub struct ComicsClient<T = UreqTransport> {
    config: ClientConfig,
    session: Arc<Session>,
    transport: T,
}

impl ComicsClient<UreqTransport> {
    pub fn new(config: ClientConfig, session: Arc<Session>) -> Self {
        Self::with_transport(config, session, UreqTransport::new())
    }
}

impl<T: Transport> ComicsClient<T> {
    pub fn with_transport(config: ClientConfig, session: Arc<Session>, transport: T) -> Self {
        Self {
            config,
            session,
            transport,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_login(&self, name: &str, password: &str) -> Result<RequestDescriptor, ClientError> {
        let body = serde_json::to_value(LoginRequest {
            name: name.to_string(),
            password: password.to_string(),
        })
        .map_err(|e| ClientError::Serialization(e.to_string()))?;
        Ok(RequestDescriptor::post("/login").with_body(body))
    }

    pub fn build_ping(&self) -> RequestDescriptor {
        RequestDescriptor::get("/ping")
    }

    pub fn build_search(&self, phrase: &str, limit: i64, use_index: bool) -> RequestDescriptor {
        let endpoint = if use_index { "/isearch" } else { "/search" };
        RequestDescriptor::get(format!(
            "{endpoint}?phrase={}&limit={limit}",
            urlencoding::encode(phrase)
        ))
    }

    pub fn build_stats(&self) -> RequestDescriptor {
        RequestDescriptor::get("/db/stats")
    }

    pub fn build_status(&self) -> RequestDescriptor {
        RequestDescriptor::get("/db/status")
    }

    pub fn build_update_db(&self) -> RequestDescriptor {
        RequestDescriptor::post("/db/update")
    }

    pub fn build_drop_db(&self) -> RequestDescriptor {
        RequestDescriptor::delete("/db")
    }

    /// Turn a descriptor into the request that goes on the wire.
    ///
    /// `Content-Type: application/json` is the default and may be replaced
    /// by a descriptor header of the same name. The `Authorization` header
    /// is derived from the session alone and is applied last.
    pub fn prepare(&self, descriptor: &RequestDescriptor) -> Result<HttpRequest, ClientError> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        for (name, value) in &descriptor.headers {
            set_header(&mut headers, name, value);
        }
        headers.retain(|(name, _)| !name.eq_ignore_ascii_case("authorization"));
        if let Some(token) = self.session.token() {
            headers.push(("Authorization".to_string(), format!("{AUTH_SCHEME} {token}")));
        }

        let body = descriptor
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ClientError::Serialization(e.to_string()))?;

        Ok(HttpRequest {
            method: descriptor.method,
            url: self.config.url(&descriptor.path),
            headers,
            body,
        })
    }

    /// Prepare and execute one request. Non-2xx statuses are returned as
    /// data; only transport failures are errors here.
    pub fn send(&self, descriptor: &RequestDescriptor) -> Result<HttpResponse, ClientError> {
        let request = self.prepare(descriptor)?;
        self.transport.execute(&request).inspect_err(|err| {
            tracing::warn!(
                method = request.method.as_str(),
                path = %descriptor.path,
                error = %err,
                "api request failed"
            );
        })
    }

    /// `send` followed by `resolve`.
    pub fn request(&self, descriptor: RequestDescriptor) -> Result<Resolved, ClientError> {
        let response = self.send(&descriptor)?;
        let status = response.status;
        match resolve(response) {
            Ok(resolved) => {
                tracing::debug!(path = %descriptor.path, status, result = ?resolved, "api response");
                Ok(resolved)
            }
            Err(err) => {
                tracing::warn!(path = %descriptor.path, status, error = %err, "api error");
                Err(err.into())
            }
        }
    }
}

impl<T: Transport> ComicsApi for ComicsClient<T> {
    fn login(&self, name: &str, password: &str) -> Result<Resolved, ClientError> {
        self.request(self.build_login(name, password)?)
    }

    fn ping(&self) -> Result<Resolved, ClientError> {
        self.request(self.build_ping())
    }

    fn search(&self, phrase: &str, limit: i64, use_index: bool) -> Result<Resolved, ClientError> {
        self.request(self.build_search(phrase, limit, use_index))
    }

    fn stats(&self) -> Result<Resolved, ClientError> {
        self.request(self.build_stats())
    }

    fn status(&self) -> Result<Resolved, ClientError> {
        self.request(self.build_status())
    }

    fn update_db(&self) -> Result<Resolved, ClientError> {
        self.request(self.build_update_db())
    }

    fn drop_db(&self) -> Result<Resolved, ClientError> {
        self.request(self.build_drop_db())
    }
}

/// Replace a header of the same name (case-insensitively) or append it.
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(name)) {
        Some(existing) => existing.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}
