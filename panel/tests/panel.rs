//! Panel behaviour against a scripted `ComicsApi` and against the live mock
//! backend.

use std::cell::RefCell;
use std::sync::Arc;

use comics_core::{
    ApiError, ClientConfig, ClientError, ComicsApi, ComicsClient, Resolved, Session,
};
use comics_panel::Panel;
use mock_server::MockConfig;
use serde_json::json;

/// Answers every operation from fixed values and records what was called.
struct FakeApi {
    calls: RefCell<Vec<String>>,
    ping: Resolved,
    update_error: Option<ApiError>,
}

impl FakeApi {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            ping: Resolved::Json(json!({"replies": {"db": "ok", "fetcher": "unavailable"}})),
            update_error: None,
        }
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ComicsApi for FakeApi {
    fn login(&self, name: &str, password: &str) -> Result<Resolved, ClientError> {
        self.record(format!("login {name}"));
        if password == "secret" {
            Ok(Resolved::Text("tok-42".to_string()))
        } else {
            Err(ApiError::from_body(401, "invalid credentials").into())
        }
    }

    fn ping(&self) -> Result<Resolved, ClientError> {
        self.record("ping".to_string());
        Ok(self.ping.clone())
    }

    fn search(&self, phrase: &str, limit: i64, use_index: bool) -> Result<Resolved, ClientError> {
        self.record(format!("search {phrase} {limit} {use_index}"));
        Ok(Resolved::Json(json!({
            "comics": [{"id": 927, "url": "https://imgs.xkcd.com/comics/standards.png"}],
            "total": 1
        })))
    }

    fn stats(&self) -> Result<Resolved, ClientError> {
        self.record("stats".to_string());
        Ok(Resolved::Json(json!({
            "comics_total": 3000, "comics_fetched": 2990, "words_total": 50000, "words_unique": 8000
        })))
    }

    fn status(&self) -> Result<Resolved, ClientError> {
        self.record("status".to_string());
        Err(ClientError::Network("connection reset".to_string()))
    }

    fn update_db(&self) -> Result<Resolved, ClientError> {
        self.record("update".to_string());
        match &self.update_error {
            Some(err) => Err(err.clone().into()),
            None => Ok(Resolved::Text(String::new())),
        }
    }

    fn drop_db(&self) -> Result<Resolved, ClientError> {
        self.record("drop".to_string());
        Ok(Resolved::Text(String::new()))
    }
}

// --- scripted api ---

#[test]
fn login_stores_token_in_session() {
    let api = FakeApi::new();
    let session = Session::new();
    let panel = Panel::new(&api, &session);

    panel.login("admin", "secret").unwrap();
    assert_eq!(session.token(), Some("tok-42"));
    assert!(panel.is_authenticated());
}

#[test]
fn second_login_sends_nothing() {
    let api = FakeApi::new();
    let session = Session::new();
    let panel = Panel::new(&api, &session);

    panel.login("admin", "secret").unwrap();
    let message = panel.login("admin", "secret").unwrap_err();
    assert_eq!(message, "Login failed: session is already authenticated");
    assert_eq!(api.calls(), vec!["login admin"]);
    assert_eq!(session.token(), Some("tok-42"));
}

#[test]
fn failed_login_leaves_session_empty() {
    let api = FakeApi::new();
    let session = Session::new();
    let panel = Panel::new(&api, &session);

    let message = panel.login("admin", "nope").unwrap_err();
    assert_eq!(message, "Login failed: invalid credentials");
    assert_eq!(session.token(), None);
}

#[test]
fn ping_renders_one_line_per_service() {
    let api = FakeApi::new();
    let session = Session::new();
    let lines = Panel::new(&api, &session).services();
    assert_eq!(lines, vec!["db: ✓ OK", "fetcher: ✗ Unavailable"]);
}

#[test]
fn empty_phrase_sends_nothing() {
    let api = FakeApi::new();
    let session = Session::new();
    let lines = Panel::new(&api, &session).search("   ", "5", true);
    assert_eq!(lines, vec!["Enter a phrase to search"]);
    assert!(api.calls().is_empty());
}

#[test]
fn search_passes_parsed_limit() {
    let api = FakeApi::new();
    let session = Session::new();
    let panel = Panel::new(&api, &session);

    let lines = panel.search("standards", "many", false);
    assert_eq!(lines[0], "Found comics: 1");
    panel.search("standards", "3", true);
    assert_eq!(api.calls(), vec!["search standards 10 false", "search standards 3 true"]);
}

#[test]
fn stats_survive_status_failure() {
    let api = FakeApi::new();
    let session = Session::new();
    let lines = Panel::new(&api, &session).stats();
    assert_eq!(lines[1], "  Comics in XKCD:  3000");
    assert_eq!(
        lines.last().unwrap(),
        "Failed to load update status: network error: connection reset"
    );
}

#[test]
fn update_already_running_takes_in_progress_path() {
    let mut api = FakeApi::new();
    api.update_error = Some(ApiError::from_body(409, "update already runs"));
    let session = Session::new();
    assert_eq!(Panel::new(&api, &session).update(), "Update is already in progress");
}

#[test]
fn drop_needs_confirmation() {
    let api = FakeApi::new();
    let session = Session::new();
    let panel = Panel::new(&api, &session);

    assert!(panel.drop_db(false).starts_with("Refusing"));
    assert!(api.calls().is_empty());
    assert_eq!(panel.drop_db(true), "Database dropped");
    assert_eq!(api.calls(), vec!["drop"]);
}

// --- live mock backend ---

fn start_server(config: MockConfig) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with(listener, config).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn login_then_ping_against_backend() {
    let base = start_server(MockConfig {
        services: vec![("db".to_string(), true), ("fetcher".to_string(), false)],
        ..MockConfig::default()
    });
    let session = Arc::new(Session::new());
    let client = ComicsClient::new(ClientConfig::new(&base), Arc::clone(&session));
    let panel = Panel::new(&client, &session);

    panel.login("admin", "password").unwrap();
    assert!(session.is_authenticated());
    assert_eq!(panel.services(), vec!["db: ✓ OK", "fetcher: ✗ Unavailable"]);
}

#[test]
fn update_twice_against_backend() {
    let base = start_server(MockConfig {
        hold_updates: true,
        ..MockConfig::default()
    });
    let session = Arc::new(Session::new());
    let client = ComicsClient::new(ClientConfig::new(&base), Arc::clone(&session));
    let panel = Panel::new(&client, &session);

    assert_eq!(panel.update(), "Error: unauthorized");
    panel.login("admin", "password").unwrap();
    assert_eq!(panel.update(), "Database update started");
    assert_eq!(panel.update(), "Update is already in progress");
    assert_eq!(panel.stats().last().unwrap(), "Update status: Running");

    let found = panel.search("bobby tables", "", true);
    assert_eq!(found[0], "Found comics: 1");
    assert!(found[1].starts_with("#327 "));

    assert_eq!(panel.drop_db(true), "Database dropped");
    assert_eq!(panel.stats().last().unwrap(), "Update status: Idle");
    assert_eq!(panel.search("bobby", "5", false), vec!["Search failed: no comics found"]);
}
