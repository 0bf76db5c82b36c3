use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

const TOKEN_PREFIX: &str = "Token ";

/// A comic the fake XKCD source knows about.
#[derive(Clone, Debug)]
pub struct CatalogueEntry {
    pub id: u64,
    pub url: &'static str,
    pub keywords: &'static [&'static str],
}

pub const CATALOGUE: &[CatalogueEntry] = &[
    CatalogueEntry {
        id: 1,
        url: "https://imgs.xkcd.com/comics/barrel_cropped_(1).jpg",
        keywords: &["barrel", "boy", "float", "sea"],
    },
    CatalogueEntry {
        id: 149,
        url: "https://imgs.xkcd.com/comics/sandwich.png",
        keywords: &["sudo", "make", "sandwich"],
    },
    CatalogueEntry {
        id: 303,
        url: "https://imgs.xkcd.com/comics/compiling.png",
        keywords: &["compiling", "code", "sword", "fight"],
    },
    CatalogueEntry {
        id: 327,
        url: "https://imgs.xkcd.com/comics/exploits_of_a_mom.png",
        keywords: &["bobby", "tables", "sql", "school", "mom"],
    },
    CatalogueEntry {
        id: 353,
        url: "https://imgs.xkcd.com/comics/python.png",
        keywords: &["python", "import", "antigravity", "fly", "code"],
    },
    CatalogueEntry {
        id: 927,
        url: "https://imgs.xkcd.com/comics/standards.png",
        keywords: &["standards", "competing", "universal"],
    },
];

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub admin_user: String,
    pub admin_password: String,
    /// Dependent services reported by `/ping`, with their availability.
    pub services: Vec<(String, bool)>,
    /// Keep updates in the running state until the database is dropped.
    pub hold_updates: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            admin_user: "admin".to_string(),
            admin_password: "password".to_string(),
            services: vec![
                ("search".to_string(), true),
                ("update".to_string(), true),
                ("words".to_string(), true),
            ],
            hold_updates: false,
        }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct PingReply {
    pub replies: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comic {
    pub id: u64,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComicsReply {
    pub comics: Vec<Comic>,
    pub total: usize,
}

#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub words_total: usize,
    pub words_unique: usize,
    pub comics_fetched: usize,
    pub comics_total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Status {
    pub status: String,
}

/// Backend state behind the router.
#[derive(Debug, Default)]
pub struct Backend {
    config: MockConfig,
    tokens: HashSet<String>,
    fetched: Vec<CatalogueEntry>,
    index: HashMap<&'static str, Vec<u64>>,
    updating: bool,
}

impl Backend {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn verify(&self, headers: &HeaderMap) -> bool {
        let Some(value) = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        else {
            return false;
        };
        let Some(token) = value.strip_prefix(TOKEN_PREFIX) else {
            return false;
        };
        let token = token.trim();
        !token.is_empty() && self.tokens.contains(token)
    }

    fn fetch_all(&mut self) {
        self.fetched = CATALOGUE.to_vec();
        self.index.clear();
        for entry in &self.fetched {
            for word in entry.keywords {
                self.index.entry(*word).or_default().push(entry.id);
            }
        }
    }

    fn drop_all(&mut self) {
        self.fetched.clear();
        self.index.clear();
        self.updating = false;
    }

    fn stats(&self) -> Stats {
        let words: Vec<&str> = self
            .fetched
            .iter()
            .flat_map(|entry| entry.keywords.iter().copied())
            .collect();
        Stats {
            words_total: words.len(),
            words_unique: words.iter().collect::<HashSet<_>>().len(),
            comics_fetched: self.fetched.len(),
            comics_total: CATALOGUE.len(),
        }
    }

    /// Full scan over fetched comics, best match first.
    fn scan(&self, words: &[String], limit: usize) -> Vec<Comic> {
        let hits = self.fetched.iter().filter_map(|entry| {
            let score = words
                .iter()
                .filter(|w| entry.keywords.contains(&w.as_str()))
                .count();
            (score > 0).then_some((entry.id, score))
        });
        self.rank(hits.collect(), limit)
    }

    /// Same ranking as `scan`, driven by the word index.
    fn lookup(&self, words: &[String], limit: usize) -> Vec<Comic> {
        let mut scores: HashMap<u64, usize> = HashMap::new();
        for word in words {
            for id in self.index.get(word.as_str()).into_iter().flatten() {
                *scores.entry(*id).or_default() += 1;
            }
        }
        self.rank(scores.into_iter().collect(), limit)
    }

    fn rank(&self, mut hits: Vec<(u64, usize)>, limit: usize) -> Vec<Comic> {
        hits.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        if limit > 0 {
            hits.truncate(limit);
        }
        hits.into_iter()
            .filter_map(|(id, _)| self.fetched.iter().find(|e| e.id == id))
            .map(|e| Comic {
                id: e.id,
                url: e.url.to_string(),
            })
            .collect()
    }
}

pub type Db = Arc<RwLock<Backend>>;

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    let db: Db = Arc::new(RwLock::new(Backend::new(config)));
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/login", post(login))
        .route("/api/search", get(search))
        .route("/api/isearch", get(index_search))
        .route("/api/db/update", post(update))
        .route("/api/db/stats", get(stats))
        .route("/api/db/status", get(status))
        .route("/api/db", delete(drop_db))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

/// JSON body without a JSON content type, the way the real backend answers
/// most of its endpoints.
fn undeclared_json<T: Serialize>(reply: &T) -> Response {
    match serde_json::to_string_pretty(reply) {
        Ok(body) => ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "cannot encode reply");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

fn declared_json<T: Serialize>(reply: &T) -> Response {
    match serde_json::to_string(reply) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "cannot encode reply");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn ping(State(db): State<Db>) -> Response {
    let backend = db.read().await;
    let replies = backend
        .config
        .services
        .iter()
        .map(|(name, up)| {
            if !up {
                tracing::warn!(service = %name, "service is not available");
            }
            let state = if *up { "ok" } else { "unavailable" };
            (name.clone(), state.to_string())
        })
        .collect();
    undeclared_json(&PingReply { replies })
}

async fn login(State(db): State<Db>, body: String) -> Response {
    let request: LoginRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(err) => {
            tracing::warn!(error = %err, "cannot decode login request");
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    };

    let mut backend = db.write().await;
    if request.name != backend.config.admin_user || request.password != backend.config.admin_password {
        tracing::warn!(name = %request.name, "failed to login");
        return (StatusCode::UNAUTHORIZED, "invalid credentials").into_response();
    }

    let token = Uuid::new_v4().to_string();
    backend.tokens.insert(token.clone());
    tracing::info!(name = %request.name, "operator logged in");
    token.into_response()
}

/// Validated `phrase`/`limit` pair of a search request.
fn search_params(params: &HashMap<String, String>) -> Result<(Vec<String>, usize), Response> {
    let limit = match params.get("limit").filter(|s| !s.is_empty()) {
        None => 0,
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if n >= 0 => n as usize,
            _ => {
                tracing::warn!(value = %raw, "wrong limit");
                return Err((StatusCode::BAD_REQUEST, "bad limit").into_response());
            }
        },
    };

    let phrase = params.get("phrase").map(String::as_str).unwrap_or_default();
    if phrase.is_empty() {
        tracing::warn!("no phrase");
        return Err((StatusCode::BAD_REQUEST, "no phrase").into_response());
    }

    let words = phrase
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    Ok((words, limit))
}

fn comics_reply(comics: Vec<Comic>) -> Response {
    if comics.is_empty() {
        return (StatusCode::NOT_FOUND, "no comics found").into_response();
    }
    declared_json(&ComicsReply {
        total: comics.len(),
        comics,
    })
}

async fn search(State(db): State<Db>, Query(params): Query<HashMap<String, String>>) -> Response {
    let (words, limit) = match search_params(&params) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };
    let comics = db.read().await.scan(&words, limit);
    comics_reply(comics)
}

async fn index_search(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (words, limit) = match search_params(&params) {
        Ok(parsed) => parsed,
        Err(response) => return response,
    };
    let comics = db.read().await.lookup(&words, limit);
    comics_reply(comics)
}

async fn update(State(db): State<Db>, headers: HeaderMap) -> Response {
    let mut backend = db.write().await;
    if !backend.verify(&headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    }
    if backend.updating {
        tracing::warn!("update requested while one is in progress");
        return (StatusCode::CONFLICT, "update already runs").into_response();
    }

    backend.fetch_all();
    backend.updating = backend.config.hold_updates;
    tracing::info!(comics = backend.fetched.len(), "database updated");
    StatusCode::OK.into_response()
}

async fn stats(State(db): State<Db>) -> Response {
    undeclared_json(&db.read().await.stats())
}

async fn status(State(db): State<Db>) -> Response {
    let status = if db.read().await.updating {
        "running"
    } else {
        "idle"
    };
    undeclared_json(&Status {
        status: status.to_string(),
    })
}

async fn drop_db(State(db): State<Db>, headers: HeaderMap) -> Response {
    let mut backend = db.write().await;
    if !backend.verify(&headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized").into_response();
    }
    backend.drop_all();
    tracing::info!("database dropped");
    StatusCode::OK.into_response()
}
