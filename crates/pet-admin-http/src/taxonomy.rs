use crate::client::{build_client, parse_url, ClientError};
use async_trait::async_trait;
use pet_admin_core::{ApiSettings, BreedsResponse, TaxonomyError, TaxonomySource};
use reqwest::Url;

/// `reqwest`-backed [`TaxonomySource`]
#[derive(Debug, Clone)]
pub struct HttpTaxonomySource {
    client: reqwest::Client,
    url: Url,
}

impl HttpTaxonomySource {
    /// # Errors
    /// Invalid `taxonomy_url` or client construction failure.
    pub fn new(settings: &ApiSettings) -> Result<Self, ClientError> {
        Ok(Self::with_client(build_client(settings)?, parse_url(&settings.taxonomy_url)?))
    }

    #[inline]
    #[must_use]
    pub fn with_client(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl TaxonomySource for HttpTaxonomySource {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn fetch_breeds(&self) -> Result<BreedsResponse, TaxonomyError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| TaxonomyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TaxonomyError::Transport(format!("status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TaxonomyError::Transport(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| TaxonomyError::Decode(e.to_string()))
    }
}
