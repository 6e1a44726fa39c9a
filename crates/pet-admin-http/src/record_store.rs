//! Record storage over HTTP
//!
//! The update is a multipart `PUT` with every field. Only `200 OK` counts
//! as accepted.

use crate::client::{build_client, parse_url, ClientError};
use async_trait::async_trait;
use pet_admin_core::{
    ApiSettings, Field, ImagePayload, Record, RecordEnvelope, RecordId, RecordStore, StoreError,
    UpdatePayload,
};
use reqwest::multipart::{Form, Part};
use reqwest::{StatusCode, Url};

/// `reqwest`-backed [`RecordStore`]
#[derive(Debug, Clone)]
pub struct HttpRecordStore {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpRecordStore {
    /// Build from settings
    ///
    /// # Errors
    /// Invalid `base_url` or client construction failure.
    pub fn new(settings: &ApiSettings) -> Result<Self, ClientError> {
        Self::with_client(build_client(settings)?, parse_url(&settings.base_url)?)
    }

    /// Use an existing client
    ///
    /// # Errors
    /// `base_url` cannot carry path segments (e.g. `mailto:`).
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Result<Self, ClientError> {
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: base_url.to_string(),
                reason: "url cannot carry a path".to_string(),
            });
        }
        Ok(Self { client, base_url })
    }

    /// `{base}/api/pet/{id}`, with the id as a single encoded segment
    #[must_use]
    pub fn record_url(&self, id: &RecordId) -> Url {
        let mut url = self.base_url.clone();
        // always Ok: with_client rejects cannot-be-a-base urls
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["api", "pet", id.as_str()]);
        }
        url
    }
}

fn transport(e: &reqwest::Error) -> StoreError {
    StoreError::Transport(e.to_string())
}

/// Multipart body for a whole-record update
///
/// # Errors
/// `StoreError::Decode` if the image carries an unparsable content type.
pub fn multipart_form(payload: &UpdatePayload) -> Result<Form, StoreError> {
    let mut form = Form::new();
    for (name, value) in payload.text_fields() {
        form = form.text(name, value);
    }

    let image = Field::Image.as_str();
    let form = match &payload.image {
        ImagePayload::File(file) => {
            let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
            if let Some(content_type) = &file.content_type {
                part = part
                    .mime_str(content_type)
                    .map_err(|e| StoreError::Decode(format!("content type {content_type}: {e}")))?;
            }
            form.part(image, part)
        }
        ImagePayload::Stored(reference) => form.text(image, reference.clone()),
    };
    Ok(form)
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    #[tracing::instrument(skip(self, id), fields(record_id = %id))]
    async fn fetch(&self, id: &RecordId) -> Result<Record, StoreError> {
        let response = self
            .client
            .get(self.record_url(id))
            .send()
            .await
            .map_err(|e| transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| transport(&e))?;
        let envelope: RecordEnvelope =
            serde_json::from_slice(&body).map_err(|e| StoreError::Decode(e.to_string()))?;
        tracing::debug!(bytes = body.len(), "record fetched");
        Ok(envelope.body)
    }

    #[tracing::instrument(skip(self, id, payload), fields(record_id = %id))]
    async fn update(&self, id: &RecordId, payload: &UpdatePayload) -> Result<(), StoreError> {
        let form = multipart_form(payload)?;
        let response = self
            .client
            .put(self.record_url(id))
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport(&e))?;

        let status = response.status();
        if status == StatusCode::OK {
            tracing::debug!("update accepted");
            Ok(())
        } else {
            Err(StoreError::Status {
                status: status.as_u16(),
            })
        }
    }
}
