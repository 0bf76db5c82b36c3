//! Operator actions.
//!
//! `Panel` wires each action to the `ComicsApi` contract and the session,
//! and turns every outcome, failures included, into printable lines. It
//! never inspects HTTP details; it only sees what the client resolved.

use comics_core::{parse_limit, ClientError, ComicsApi, Session};

use crate::view;

pub struct Panel<'a, A: ComicsApi> {
    api: &'a A,
    session: &'a Session,
}

impl<'a, A: ComicsApi> Panel<'a, A> {
    pub fn new(api: &'a A, session: &'a Session) -> Self {
        Self { api, session }
    }

    /// Log in and keep the token for every later request.
    pub fn login(&self, name: &str, password: &str) -> Result<(), String> {
        if self.session.is_authenticated() {
            return Err(format!("Login failed: {}", ClientError::AlreadyAuthenticated));
        }
        let stored = self
            .api
            .login(name, password)
            .and_then(|token| self.session.set_token(token.into_token()));
        match stored {
            Ok(()) => {
                tracing::info!(%name, "logged in");
                Ok(())
            }
            Err(err) => Err(format!("Login failed: {err}")),
        }
    }

    pub fn services(&self) -> Vec<String> {
        match self.api.ping() {
            Ok(ping) => view::service_states(&ping)
                .iter()
                .map(view::ServiceState::render)
                .collect(),
            Err(err) => {
                tracing::error!(error = %err, "failed to check services status");
                vec![format!("Failed to check services: {err}")]
            }
        }
    }

    /// `limit` is the operator's raw input; see `parse_limit`.
    pub fn search(&self, phrase: &str, limit: &str, use_index: bool) -> Vec<String> {
        if phrase.trim().is_empty() {
            return vec!["Enter a phrase to search".to_string()];
        }
        match self.api.search(phrase, parse_limit(limit), use_index) {
            Ok(result) => view::search_results(&result),
            Err(err) => vec![format!("Search failed: {err}")],
        }
    }

    /// Index statistics followed by the update status.
    pub fn stats(&self) -> Vec<String> {
        let mut lines = match self.api.stats() {
            Ok(stats) => view::stats(&stats),
            Err(err) => vec![format!("Failed to load stats: {err}")],
        };
        lines.push(match self.api.status() {
            Ok(status) => view::update_status(&status),
            Err(err) => format!("Failed to load update status: {err}"),
        });
        lines
    }

    pub fn update(&self) -> String {
        view::update_outcome(&self.api.update_db())
    }

    /// Drops the database only when `confirmed`; otherwise nothing is sent.
    pub fn drop_db(&self, confirmed: bool) -> String {
        if !confirmed {
            return "Refusing to drop the database without confirmation (pass --yes)".to_string();
        }
        view::drop_outcome(&self.api.drop_db())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}
