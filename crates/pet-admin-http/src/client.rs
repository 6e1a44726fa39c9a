//! Shared `reqwest` client construction

use pet_admin_core::ApiSettings;
use reqwest::Url;

/// Adapter construction errors
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// URL did not parse or cannot carry a path
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// `reqwest` refused the client configuration
    #[error("failed to build http client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Build the client shared by both adapters
///
/// No timeout is applied unless `request_timeout_secs` is set.
///
/// # Errors
/// `ClientError::Build` if the TLS backend cannot initialize.
pub fn build_client(settings: &ApiSettings) -> Result<reqwest::Client, ClientError> {
    let mut builder = reqwest::Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(timeout) = settings.request_timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Parse an absolute http(s) URL
///
/// # Errors
/// `ClientError::InvalidUrl` for unparsable, non-http or non-hierarchical URLs.
pub fn parse_url(url: &str) -> Result<Url, ClientError> {
    let invalid = |reason: String| ClientError::InvalidUrl {
        url: url.to_string(),
        reason,
    };
    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", parsed.scheme())));
    }
    if parsed.cannot_be_a_base() {
        return Err(invalid("url cannot carry a path".to_string()));
    }
    Ok(parsed)
}
