//! Record storage port and load-time captures
//!
//! A successful load produces two immutable captures of the same record:
//! - `defaults`: the values the form starts from (and resets to)
//! - `snapshot`: the untouched record used for the image fallback at submit
//!
//! Neither is ever rebuilt from the mutable form state.

use crate::error::StoreError;
use crate::form::FormValues;
use crate::submission::UpdatePayload;
use crate::types::{Record, RecordId};
use async_trait::async_trait;
use std::sync::Arc;

/// Record storage API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// `GET /api/pet/{id}`
    async fn fetch(&self, id: &RecordId) -> Result<Record, StoreError>;

    /// `PUT /api/pet/{id}` with every field (whole-record replacement)
    async fn update(&self, id: &RecordId, payload: &UpdatePayload) -> Result<(), StoreError>;
}

/// Immutable captures taken once when the record loads
#[derive(Debug, Clone)]
pub struct LoadedRecord {
    defaults: Arc<FormValues>,
    snapshot: Arc<Record>,
}

impl LoadedRecord {
    #[must_use]
    pub fn capture(record: Record) -> Self {
        Self {
            defaults: Arc::new(FormValues::from_record(&record)),
            snapshot: Arc::new(record),
        }
    }

    /// Form defaults
    #[inline]
    #[must_use]
    pub fn defaults(&self) -> &FormValues {
        &self.defaults
    }

    /// Fallback snapshot
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &Record {
        &self.snapshot
    }
}

/// Fetch a record and take its load-time captures
///
/// # Errors
/// Returns the store error unchanged; the caller decides how to degrade.
pub async fn load_record(store: &dyn RecordStore, id: &RecordId) -> Result<LoadedRecord, StoreError> {
    let record = store.fetch(id).await?;
    if record.id != *id {
        tracing::warn!(requested = %id, returned = %record.id, "record store returned a different id");
    }
    tracing::debug!(record_id = %id, "record loaded");
    Ok(LoadedRecord::capture(record))
}
