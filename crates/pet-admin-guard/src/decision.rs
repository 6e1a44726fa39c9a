//! Guard decision
//!
//! [`RouteGuard::decide`] is pure: path, origin and session in, decision out.
//! [`RouteGuard::evaluate`] adds session resolution and only consults the
//! resolver for protected paths.

use crate::session::{Session, SessionResolver};
use pet_admin_core::GuardSettings;
use std::fmt;
use std::sync::Arc;

/// Outcome for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through untouched
    Proceed,
    /// Redirect to `location`
    Redirect { location: String },
}

impl GuardDecision {
    #[inline]
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect { .. })
    }
}

/// Scheme and authority of the incoming request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    scheme: String,
    authority: String,
}

impl Origin {
    /// Build from a `Host` header value
    ///
    /// Returns `None` for a scheme other than http/https or an authority
    /// with characters outside host/port syntax.
    #[must_use]
    pub fn new(scheme: &str, authority: &str) -> Option<Self> {
        let scheme = scheme.trim().to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return None;
        }
        let authority = authority.trim();
        let valid = !authority.is_empty()
            && authority
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '[' | ']'));
        valid.then(|| Self {
            scheme,
            authority: authority.to_string(),
        })
    }

    /// Origin from request headers
    ///
    /// `X-Forwarded-Proto` wins over `default_scheme` when it names a
    /// supported scheme.
    #[must_use]
    pub fn from_headers(host: Option<&str>, forwarded_proto: Option<&str>, default_scheme: &str) -> Option<Self> {
        let host = host?;
        forwarded_proto
            .and_then(|proto| proto.split(',').next())
            .and_then(|proto| Self::new(proto, host))
            .or_else(|| Self::new(default_scheme, host))
    }

    /// Absolute URL for `path` on this origin
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}://{}{}", self.scheme, self.authority, path)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}

/// What the guard needs to know about a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRequest {
    pub path: String,
    pub origin: Option<Origin>,
    pub token: Option<String>,
}

impl GuardRequest {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            origin: None,
            token: None,
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Option<Origin>) -> Self {
        self.origin = origin;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

/// Authentication gate for the protected area
pub struct RouteGuard {
    protected_prefix: String,
    login_path: String,
    session_cookie: String,
    scheme: String,
    resolver: Arc<dyn SessionResolver>,
}

impl fmt::Debug for RouteGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteGuard")
            .field("protected_prefix", &self.protected_prefix)
            .field("login_path", &self.login_path)
            .field("session_cookie", &self.session_cookie)
            .finish_non_exhaustive()
    }
}

impl RouteGuard {
    #[must_use]
    pub fn new(settings: &GuardSettings, resolver: Arc<dyn SessionResolver>) -> Self {
        Self {
            protected_prefix: settings.protected_prefix.clone(),
            login_path: settings.login_path.clone(),
            session_cookie: settings.session_cookie.clone(),
            scheme: settings.scheme.clone(),
            resolver,
        }
    }

    /// Plain prefix match; `/administrator` is protected under `/admin`
    #[inline]
    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        path.starts_with(&self.protected_prefix)
    }

    #[inline]
    #[must_use]
    pub fn session_cookie(&self) -> &str {
        &self.session_cookie
    }

    #[inline]
    #[must_use]
    pub fn default_scheme(&self) -> &str {
        &self.scheme
    }

    /// Login location on `origin`, or the bare login path without one
    #[must_use]
    pub fn login_location(&self, origin: Option<&Origin>) -> String {
        match origin {
            Some(origin) => origin.join(&self.login_path),
            None => self.login_path.clone(),
        }
    }

    #[must_use]
    pub fn decide(&self, path: &str, origin: Option<&Origin>, session: Option<&Session>) -> GuardDecision {
        if self.is_protected(path) && session.is_none() {
            GuardDecision::Redirect {
                location: self.login_location(origin),
            }
        } else {
            GuardDecision::Proceed
        }
    }

    /// Resolve the session (protected paths only) and decide
    #[tracing::instrument(skip(self, request), fields(path = %request.path))]
    pub async fn evaluate(&self, request: &GuardRequest) -> GuardDecision {
        if !self.is_protected(&request.path) {
            return GuardDecision::Proceed;
        }

        let session = match self.resolver.resolve(request.token.clone()).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "session resolution failed, treating as unauthenticated");
                None
            }
        };

        let decision = self.decide(&request.path, request.origin.as_ref(), session.as_ref());
        if let GuardDecision::Redirect { location } = &decision {
            tracing::info!(%location, "unauthenticated request redirected");
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{AuthError, MockSessionResolver};
    use pretty_assertions::assert_eq;

    fn guard(resolver: MockSessionResolver) -> RouteGuard {
        RouteGuard::new(&GuardSettings::default(), Arc::new(resolver))
    }

    fn origin() -> Origin {
        Origin::new("https", "pets.example.com").unwrap()
    }

    #[test]
    fn decide_redirects_protected_path_without_session() {
        let guard = guard(MockSessionResolver::new());
        assert_eq!(
            guard.decide("/admin/pets/5", Some(&origin()), None),
            GuardDecision::Redirect {
                location: "https://pets.example.com/login".to_string()
            }
        );
    }

    #[test]
    fn decide_lets_session_through() {
        let guard = guard(MockSessionResolver::new());
        let session = Session::new("op");
        assert_eq!(
            guard.decide("/admin/pets/5", Some(&origin()), Some(&session)),
            GuardDecision::Proceed
        );
    }

    #[test]
    fn decide_ignores_unprotected_paths() {
        let guard = guard(MockSessionResolver::new());
        assert_eq!(guard.decide("/login", Some(&origin()), None), GuardDecision::Proceed);
        assert_eq!(guard.decide("/", None, None), GuardDecision::Proceed);
        assert_eq!(guard.decide("/pets/admin", None, None), GuardDecision::Proceed);
    }

    #[test]
    fn prefix_match_is_plain() {
        let guard = guard(MockSessionResolver::new());
        assert!(guard.is_protected("/admin"));
        assert!(guard.is_protected("/administrator"));
        assert!(!guard.is_protected("/Admin"));
    }

    #[test]
    fn missing_origin_redirects_to_bare_path() {
        let guard = guard(MockSessionResolver::new());
        assert_eq!(guard.login_location(None), "/login");
    }

    #[test]
    fn origin_prefers_forwarded_proto() {
        let origin = Origin::from_headers(Some("pets.example.com"), Some("https, http"), "http").unwrap();
        assert_eq!(origin.to_string(), "https://pets.example.com");

        let origin = Origin::from_headers(Some("pets.example.com:8080"), None, "http").unwrap();
        assert_eq!(origin.join("/login"), "http://pets.example.com:8080/login");

        let origin = Origin::from_headers(Some("h"), Some("gopher"), "http").unwrap();
        assert_eq!(origin.to_string(), "http://h");
    }

    #[test]
    fn origin_rejects_odd_hosts() {
        assert!(Origin::from_headers(None, None, "http").is_none());
        assert!(Origin::new("http", "evil.com/path").is_none());
        assert!(Origin::new("http", "a b").is_none());
        assert!(Origin::new("ftp", "host").is_none());
    }

    #[tokio::test]
    async fn evaluate_skips_resolver_for_public_paths() {
        let mut resolver = MockSessionResolver::new();
        resolver.expect_resolve().never();

        let decision = guard(resolver).evaluate(&GuardRequest::new("/login")).await;
        assert_eq!(decision, GuardDecision::Proceed);
    }

    #[tokio::test]
    async fn evaluate_fails_closed_on_resolver_error() {
        let mut resolver = MockSessionResolver::new();
        resolver
            .expect_resolve()
            .times(1)
            .returning(|_| Err(AuthError::Resolver("issuer down".to_string())));

        let request = GuardRequest::new("/admin")
            .with_origin(Some(origin()))
            .with_token(Some("anything".to_string()));
        let decision = guard(resolver).evaluate(&request).await;
        assert!(decision.is_redirect());
    }

    #[tokio::test]
    async fn evaluate_passes_token_to_resolver() {
        let mut resolver = MockSessionResolver::new();
        resolver
            .expect_resolve()
            .withf(|token| token.as_deref() == Some("t1"))
            .returning(|_| Ok(Some(Session::new("op"))));

        let request = GuardRequest::new("/admin/pets/5").with_token(Some("t1".to_string()));
        assert_eq!(guard(resolver).evaluate(&request).await, GuardDecision::Proceed);
    }
}
