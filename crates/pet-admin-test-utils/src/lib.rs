//! Testing utilities for the Pet Admin workspace
//!
//! Shared fixtures and in-memory implementations of the ports.

#![allow(missing_docs)]

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use pet_admin_core::{
    BreedsResponse, ImageFile, ImagePayload, Navigator, Record, RecordId, RecordStore, Sex,
    StoreError, TaxonomyError, TaxonomySource, UpdatePayload, WeightClass,
};
use std::collections::HashMap;

pub fn sample_record() -> Record {
    Record {
        id: RecordId::new("5"),
        name: "Rex".to_string(),
        age: 3,
        description: "Muito dócil".to_string(),
        breed: "hound/afghan".to_string(),
        sex: Sex::Male,
        weight: WeightClass::Large,
        image: "dog.jpg".to_string(),
    }
}

pub fn sample_breeds() -> BreedsResponse {
    let mut message = IndexMap::new();
    message.insert("hound".to_string(), vec!["afghan".to_string(), "basset".to_string()]);
    message.insert("pug".to_string(), Vec::new());
    BreedsResponse {
        message,
        status: "success".to_string(),
    }
}

pub fn photo_png() -> ImageFile {
    ImageFile::new("photo.png", vec![0x89, b'P', b'N', b'G']).with_content_type("image/png")
}

/// Record store backed by a map, with failure injection
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: Mutex<HashMap<RecordId, Record>>,
    updates: Mutex<Vec<(RecordId, UpdatePayload)>>,
    fail_fetch: Mutex<Option<StoreError>>,
    fail_update: Mutex<Option<StoreError>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: Record) -> Self {
        let store = Self::new();
        store.records.lock().insert(record.id.clone(), record);
        store
    }

    pub fn fail_fetch_with(self, error: StoreError) -> Self {
        *self.fail_fetch.lock() = Some(error);
        self
    }

    pub fn fail_update_with(self, error: StoreError) -> Self {
        *self.fail_update.lock() = Some(error);
        self
    }

    pub fn record(&self, id: &RecordId) -> Option<Record> {
        self.records.lock().get(id).cloned()
    }

    pub fn updates(&self) -> Vec<(RecordId, UpdatePayload)> {
        self.updates.lock().clone()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch(&self, id: &RecordId) -> Result<Record, StoreError> {
        if let Some(error) = self.fail_fetch.lock().clone() {
            return Err(error);
        }
        self.records
            .lock()
            .get(id)
            .cloned()
            .ok_or(StoreError::Status { status: 404 })
    }

    async fn update(&self, id: &RecordId, payload: &UpdatePayload) -> Result<(), StoreError> {
        self.updates.lock().push((id.clone(), payload.clone()));
        if let Some(error) = self.fail_update.lock().clone() {
            return Err(error);
        }

        let image = match &payload.image {
            ImagePayload::File(file) => file.file_name.clone(),
            ImagePayload::Stored(reference) => reference.clone(),
        };
        self.records.lock().insert(
            id.clone(),
            Record {
                id: id.clone(),
                name: payload.name.clone(),
                age: payload.age,
                description: payload.description.clone(),
                breed: payload.breed.clone(),
                sex: payload.sex,
                weight: payload.weight,
                image,
            },
        );
        Ok(())
    }
}

/// Taxonomy source returning a fixed result
#[derive(Debug, Clone)]
pub struct StaticTaxonomy(pub Result<BreedsResponse, TaxonomyError>);

impl StaticTaxonomy {
    pub fn ok(response: BreedsResponse) -> Self {
        Self(Ok(response))
    }

    pub fn failing(error: TaxonomyError) -> Self {
        Self(Err(error))
    }
}

#[async_trait]
impl TaxonomySource for StaticTaxonomy {
    async fn fetch_breeds(&self) -> Result<BreedsResponse, TaxonomyError> {
        self.0.clone()
    }
}

/// Navigator that records every path
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited.lock().push(path.to_string());
    }
}
