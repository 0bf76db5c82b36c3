//! Response resolution: error unwrapping and content sniffing.
//!
//! The backend does not reliably label its bodies. JSON often arrives as
//! `text/plain`, and a body labelled `application/json` is sometimes plain
//! text. `resolve` therefore trusts the status code for errors, and for
//! successful responses decides between decoded data and raw text by
//! looking at the body itself. A decode failure on a 2xx body degrades to
//! text; it never becomes an error.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// The outcome of resolving a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// The body decoded as JSON.
    Json(Value),
    /// The body, verbatim.
    Text(String),
}

impl Resolved {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Resolved::Json(value) => Some(value),
            Resolved::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Resolved::Text(text) => Some(text),
            Resolved::Json(_) => None,
        }
    }

    /// Decode the structured value into `T`. Text, or JSON of another shape,
    /// yields `None`.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<T> {
        self.as_json()
            .and_then(|value| T::deserialize(value).ok())
    }

    /// The login token carried by this response.
    ///
    /// The backend writes the token as bare text, but a quoted token that
    /// got decoded as a JSON string is accepted too.
    pub fn into_token(self) -> String {
        match self {
            Resolved::Text(text) => text,
            Resolved::Json(Value::String(token)) => token,
            Resolved::Json(other) => other.to_string(),
        }
    }
}

/// Resolve a raw response.
///
/// Non-2xx responses fail with the body text, or `HTTP <status>` when the
/// body is empty. Error bodies are never parsed.
pub fn resolve(response: HttpResponse) -> Result<Resolved, ApiError> {
    if !response.is_success() {
        return Err(ApiError::from_body(response.status, &response.body));
    }
    let content_type = response.content_type().map(str::to_owned);
    Ok(sniff(content_type.as_deref(), response.body))
}

/// Decide how to present a successful body.
///
/// Declared JSON is parsed. Otherwise text that starts with `{` or `[`
/// (after trimming) is parsed as well. Anything that fails to parse, or
/// does not look structured, comes back unchanged.
pub fn sniff(content_type: Option<&str>, text: String) -> Resolved {
    let declared_json = content_type.is_some_and(|ct| ct.contains("application/json"));
    let trimmed = text.trim();
    let looks_structured = trimmed.starts_with('{') || trimmed.starts_with('[');

    if declared_json || looks_structured {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Resolved::Json(value),
            Err(_) => Resolved::Text(text),
        }
    } else {
        Resolved::Text(text)
    }
}
