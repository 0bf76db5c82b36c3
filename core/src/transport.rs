//! The network half of the transport core.
//!
//! `ComicsClient` prepares every request itself and hands the finished
//! `HttpRequest` to a `Transport`, which performs exactly one round trip and
//! returns the status, headers and body text. No retries, no timeouts.

use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one prepared request.
///
/// Non-2xx statuses are data, not errors: implementations return them as an
/// `HttpResponse` and leave interpretation to the resolver. Only failures of
/// the round trip itself map to `ClientError::Network`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError>;
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        // Statuses are resolved by the client, so ureq must not turn 4xx/5xx
        // into errors.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        let url = request.url.as_str();
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), &request.headers).call(),
            (HttpMethod::Delete, _) => {
                with_headers(self.agent.delete(url), &request.headers).call()
            }
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), &request.headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => {
                with_headers(self.agent.post(url), &request.headers).send_empty()
            }
        };
        let mut response = result.map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        // ureq caps bodies at 10 MiB by default; the resolver needs all of it.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_string()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
