//! The operation contract consumed by front ends.
//!
//! `ComicsApi` is what a panel depends on. `ComicsClient` implements it over
//! the network; tests substitute canned implementations.

use crate::error::ClientError;
use crate::resolve::Resolved;

/// Limit used when the operator's input is not a usable number.
pub const DEFAULT_SEARCH_LIMIT: i64 = 10;

/// Operations of the comics backend. Every call performs one round trip and
/// returns the resolved body.
pub trait ComicsApi {
    /// Returns the token; storing it in a session is the caller's job.
    fn login(&self, name: &str, password: &str) -> Result<Resolved, ClientError>;

    fn ping(&self) -> Result<Resolved, ClientError>;

    /// `use_index` selects the index-accelerated endpoint over the full scan.
    fn search(&self, phrase: &str, limit: i64, use_index: bool) -> Result<Resolved, ClientError>;

    fn stats(&self) -> Result<Resolved, ClientError>;

    fn status(&self) -> Result<Resolved, ClientError>;

    /// Starts a rebuild. A rebuild already in progress is reported by the
    /// backend as an error mentioning "already runs".
    fn update_db(&self) -> Result<Resolved, ClientError>;

    /// Irreversible. Confirmation is up to the caller.
    fn drop_db(&self) -> Result<Resolved, ClientError>;
}

/// Read a search limit typed by the operator.
///
/// Takes the leading integer of the input (after whitespace, with an
/// optional sign). Input without one, or a zero limit, falls back to
/// `DEFAULT_SEARCH_LIMIT`. Values beyond `i64` saturate and are left for
/// the backend to judge.
pub fn parse_limit(input: &str) -> i64 {
    let input = input.trim_start();
    let (sign, rest) = match input.as_bytes().first() {
        Some(b'-') => (-1, &input[1..]),
        Some(b'+') => (1, &input[1..]),
        _ => (1, input),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return DEFAULT_SEARCH_LIMIT;
    }
    match digits.parse::<i64>() {
        Ok(0) => DEFAULT_SEARCH_LIMIT,
        Ok(n) => sign * n,
        // Only overflow is left once the digits are non-empty.
        Err(_) if sign < 0 => i64::MIN,
        Err(_) => i64::MAX,
    }
}
