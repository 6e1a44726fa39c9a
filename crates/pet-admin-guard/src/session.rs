//! Session resolution port
//!
//! The real credential issuer lives outside this workspace; it plugs in as a
//! [`SessionResolver`]. [`CookieSessionResolver`] accepts a fixed token set
//! and backs the `pet-admin serve` command.

use async_trait::async_trait;
use std::collections::HashSet;

/// Resolved session; only its presence matters to the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    subject: String,
}

impl Session {
    #[inline]
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// Session resolution errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Resolver could not answer (issuer down, malformed credential, ...)
    #[error("session resolver failed: {0}")]
    Resolver(String),
}

/// Resolves a request credential into a session
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// `Ok(None)` means "no valid session"
    async fn resolve(&self, token: Option<String>) -> Result<Option<Session>, AuthError>;
}

/// Resolver accepting a configured set of opaque tokens
#[derive(Debug, Clone, Default)]
pub struct CookieSessionResolver {
    tokens: HashSet<String>,
}

impl CookieSessionResolver {
    #[must_use]
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl SessionResolver for CookieSessionResolver {
    async fn resolve(&self, token: Option<String>) -> Result<Option<Session>, AuthError> {
        Ok(token
            .filter(|t| !t.is_empty() && self.tokens.contains(t))
            .map(|_| Session::new("operator")))
    }
}

/// Value of cookie `name` in a `Cookie` header
#[must_use]
pub fn session_token<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_token_finds_named_cookie() {
        let header = "theme=dark; session=abc123; other=1";
        assert_eq!(session_token(header, "session"), Some("abc123"));
        assert_eq!(session_token(header, "missing"), None);
    }

    #[test]
    fn session_token_strips_quotes() {
        assert_eq!(session_token("session=\"q\"", "session"), Some("q"));
    }

    #[test]
    fn session_token_requires_exact_name() {
        assert_eq!(session_token("xsession=abc", "session"), None);
    }

    #[tokio::test]
    async fn cookie_resolver_accepts_known_tokens() {
        let resolver = CookieSessionResolver::new(["good"]);
        assert!(resolver.resolve(Some("good".to_string())).await.unwrap().is_some());
        assert!(resolver.resolve(Some("bad".to_string())).await.unwrap().is_none());
        assert!(resolver.resolve(None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_resolver_accepts_nothing() {
        let resolver = CookieSessionResolver::default();
        assert!(resolver.resolve(Some(String::new())).await.unwrap().is_none());
    }
}
