//! Text rendering of API results.
//!
//! Every function here is pure: it takes what the client resolved and
//! produces the lines the panel prints. Shapes the backend did not promise
//! (text where JSON was expected, missing fields) render as a fallback line
//! instead of failing.

use comics_core::{ClientError, DbStats, Resolved, SearchReply};
use serde_json::Value;

/// Fragment the backend uses when an update is requested twice.
pub const ALREADY_RUNNING: &str = "already runs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceState {
    pub name: String,
    pub ok: bool,
}

impl ServiceState {
    pub fn render(&self) -> String {
        if self.ok {
            format!("{}: ✓ OK", self.name)
        } else {
            format!("{}: ✗ Unavailable", self.name)
        }
    }
}

/// Service health from a ping reply, sorted by name.
///
/// Accepts `{"replies": {...}}` as well as the bare mapping.
pub fn service_states(ping: &Resolved) -> Vec<ServiceState> {
    let Some(value) = ping.as_json() else {
        return Vec::new();
    };
    let replies = match value.get("replies") {
        Some(replies) if !replies.is_null() => replies,
        _ => value,
    };
    let Some(replies) = replies.as_object() else {
        return Vec::new();
    };

    let mut states: Vec<ServiceState> = replies
        .iter()
        .map(|(name, state)| ServiceState {
            name: name.clone(),
            ok: state.as_str() == Some("ok"),
        })
        .collect();
    states.sort_by(|a, b| a.name.cmp(&b.name));
    states
}

pub fn search_results(result: &Resolved) -> Vec<String> {
    match result.decode::<SearchReply>() {
        Some(reply) if !reply.comics.is_empty() => {
            let total = if reply.total > 0 {
                reply.total
            } else {
                reply.comics.len() as u64
            };
            let mut lines = vec![format!("Found comics: {total}")];
            lines.extend(
                reply
                    .comics
                    .iter()
                    .map(|comic| format!("#{} {}", comic.id, comic.url)),
            );
            lines
        }
        _ => vec!["No comics found".to_string()],
    }
}

pub fn stats(result: &Resolved) -> Vec<String> {
    let Some(value) = result.as_json().filter(|v| v.is_object()) else {
        return vec!["Invalid stats format".to_string()];
    };
    let stats = DbStats {
        comics_total: count(value, "comics_total"),
        comics_fetched: count(value, "comics_fetched"),
        words_total: count(value, "words_total"),
        words_unique: count(value, "words_unique"),
    };
    vec![
        "Database statistics".to_string(),
        format!("  Comics in XKCD:  {}", stats.comics_total),
        format!("  Comics fetched:  {}", stats.comics_fetched),
        format!("  Words total:     {}", stats.words_total),
        format!("  Unique words:    {}", stats.words_unique),
    ]
}

/// A missing or non-numeric counter shows as zero.
fn count(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0)
}

pub fn update_status(result: &Resolved) -> String {
    let running = result
        .as_json()
        .and_then(|v| v.get("status"))
        .and_then(Value::as_str)
        == Some("running");
    if running {
        "Update status: Running".to_string()
    } else {
        "Update status: Idle".to_string()
    }
}

pub fn update_outcome(result: &Result<Resolved, ClientError>) -> String {
    match result {
        Ok(_) => "Database update started".to_string(),
        Err(err) if err.to_string().contains(ALREADY_RUNNING) => {
            "Update is already in progress".to_string()
        }
        Err(err) => format!("Error: {err}"),
    }
}

pub fn drop_outcome(result: &Result<Resolved, ClientError>) -> String {
    match result {
        Ok(_) => "Database dropped".to_string(),
        Err(err) => format!("Error: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comics_core::ApiError;
    use serde_json::json;

    #[test]
    fn services_from_replies_object() {
        let ping = Resolved::Json(json!({"replies": {"fetcher": "unavailable", "db": "ok"}}));
        let lines: Vec<String> = service_states(&ping).iter().map(ServiceState::render).collect();
        assert_eq!(lines, vec!["db: ✓ OK", "fetcher: ✗ Unavailable"]);
    }

    #[test]
    fn services_from_bare_mapping() {
        let ping = Resolved::Json(json!({"words": "ok"}));
        assert_eq!(
            service_states(&ping),
            vec![ServiceState {
                name: "words".to_string(),
                ok: true
            }]
        );
    }

    #[test]
    fn services_from_text_is_empty() {
        assert!(service_states(&Resolved::Text("pong".into())).is_empty());
    }

    #[test]
    fn search_lists_comics() {
        let result = Resolved::Json(json!({
            "comics": [{"id": 353, "url": "https://imgs.xkcd.com/comics/python.png"}],
            "total": 1
        }));
        assert_eq!(
            search_results(&result),
            vec!["Found comics: 1", "#353 https://imgs.xkcd.com/comics/python.png"]
        );
    }

    #[test]
    fn search_total_falls_back_to_count() {
        let result = Resolved::Json(json!({"comics": [{"id": 1, "url": "u"}, {"id": 2, "url": "v"}]}));
        assert_eq!(search_results(&result)[0], "Found comics: 2");
    }

    #[test]
    fn search_without_comics() {
        assert_eq!(search_results(&Resolved::Json(json!({"comics": [], "total": 0}))), vec!["No comics found"]);
        assert_eq!(search_results(&Resolved::Text("nothing".into())), vec!["No comics found"]);
    }

    #[test]
    fn stats_missing_fields_show_zero() {
        let lines = stats(&Resolved::Json(json!({"comics_total": 3000, "words_total": "n/a"})));
        assert_eq!(lines[1], "  Comics in XKCD:  3000");
        assert_eq!(lines[2], "  Comics fetched:  0");
        assert_eq!(lines[3], "  Words total:     0");
    }

    #[test]
    fn stats_rejects_non_objects() {
        assert_eq!(stats(&Resolved::Text("oops".into())), vec!["Invalid stats format"]);
        assert_eq!(stats(&Resolved::Json(json!([1, 2]))), vec!["Invalid stats format"]);
    }

    #[test]
    fn update_status_lines() {
        assert_eq!(update_status(&Resolved::Json(json!({"status": "running"}))), "Update status: Running");
        assert_eq!(update_status(&Resolved::Json(json!({"status": "idle"}))), "Update status: Idle");
        assert_eq!(update_status(&Resolved::Text("running".into())), "Update status: Idle");
    }

    #[test]
    fn update_outcome_paths() {
        assert_eq!(update_outcome(&Ok(Resolved::Text(String::new()))), "Database update started");

        let conflict = Err(ClientError::from(ApiError::from_body(409, "update already runs")));
        assert_eq!(update_outcome(&conflict), "Update is already in progress");

        let failure = Err(ClientError::from(ApiError::from_body(500, "")));
        assert_eq!(update_outcome(&failure), "Error: HTTP 500");
    }

    #[test]
    fn drop_outcome_paths() {
        assert_eq!(drop_outcome(&Ok(Resolved::Text(String::new()))), "Database dropped");
        let failure = Err(ClientError::from(ApiError::from_body(401, "unauthorized")));
        assert_eq!(drop_outcome(&failure), "Error: unauthorized");
    }
}
