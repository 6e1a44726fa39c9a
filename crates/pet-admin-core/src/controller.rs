//! Edit-reconciliation controller
//!
//! Owns one edit session for one record:
//! - Mounts by fetching the record and the taxonomy concurrently
//! - Accepts operator input while `Ready`
//! - Validates, builds the whole-record payload and submits it
//! - Navigates to the listing when the update is accepted
//!
//! Each fetch degrades on its own. A failed taxonomy still yields a populated
//! form, and a failed record still yields breed options.

use crate::error::{EditError, PhaseError};
use crate::form::{FormEvent, FormState};
use crate::record::{load_record, LoadedRecord, RecordStore};
use crate::state_machine::{validate_transition, Phase};
use crate::submission::build_payload;
use crate::taxonomy::{load_options, TaxonomyOption, TaxonomySource};
use crate::types::RecordId;
use std::sync::Arc;

/// Listing page the operator lands on after a successful update
pub const ADMIN_PATH: &str = "/admin";

/// Client-side navigation
pub trait Navigator: Send + Sync {
    /// Move the operator to `path`
    fn navigate(&self, path: &str);
}

/// Navigation performed after an accepted update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub to: String,
}

/// One edit session
pub struct EditController {
    record_id: RecordId,
    store: Arc<dyn RecordStore>,
    navigator: Arc<dyn Navigator>,
    phase: Phase,
    form: FormState,
    options: Vec<TaxonomyOption>,
    loaded: Option<LoadedRecord>,
}

impl std::fmt::Debug for EditController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditController")
            .field("record_id", &self.record_id)
            .field("phase", &self.phase)
            .field("options", &self.options.len())
            .field("loaded", &self.loaded.is_some())
            .finish_non_exhaustive()
    }
}

impl EditController {
    /// Create a controller in `Loading` with an empty form
    #[must_use]
    pub fn new(record_id: RecordId, store: Arc<dyn RecordStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            record_id,
            store,
            navigator,
            phase: Phase::Loading,
            form: FormState::new(),
            options: Vec::new(),
            loaded: None,
        }
    }

    /// Create and load in one step
    pub async fn mount(
        record_id: RecordId,
        store: Arc<dyn RecordStore>,
        taxonomy: &dyn TaxonomySource,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let mut controller = Self::new(record_id, store, navigator);
        controller.load(taxonomy).await;
        controller
    }

    /// Fetch record and taxonomy concurrently, then become `Ready`
    ///
    /// Failures are logged and leave their slice of state empty. Calling
    /// this outside `Loading` does nothing.
    pub async fn load(&mut self, taxonomy: &dyn TaxonomySource) {
        if self.phase != Phase::Loading {
            tracing::debug!(record_id = %self.record_id, phase = ?self.phase, "load skipped");
            return;
        }

        let store = Arc::clone(&self.store);
        let (record, options) = tokio::join!(
            load_record(store.as_ref(), &self.record_id),
            load_options(taxonomy),
        );

        match record {
            Ok(loaded) => {
                self.form.populate(loaded.defaults());
                self.loaded = Some(loaded);
            }
            Err(e) => {
                tracing::error!(record_id = %self.record_id, error = %e, "failed to load record");
            }
        }

        match options {
            Ok(options) => self.options = options,
            Err(e) => {
                tracing::error!(error = %e, "failed to load breed taxonomy");
            }
        }

        // Loading -> Ready is always allowed
        self.phase = Phase::Ready;
        tracing::info!(
            record_id = %self.record_id,
            record_loaded = self.loaded.is_some(),
            breed_options = self.options.len(),
            "edit form ready"
        );
    }

    /// Apply an operator input event
    ///
    /// # Errors
    /// `EditError::Phase` unless the controller is `Ready`.
    pub fn apply(&mut self, event: FormEvent) -> Result<(), EditError> {
        self.require(Phase::Ready)?;
        self.form.apply(event);
        Ok(())
    }

    /// Discard edits and return to the load-time defaults
    ///
    /// # Errors
    /// `EditError::Phase` unless the controller is `Ready`.
    pub fn reset(&mut self) -> Result<(), EditError> {
        self.require(Phase::Ready)?;
        match &self.loaded {
            Some(loaded) => self.form.populate(loaded.defaults()),
            None => self.form = FormState::new(),
        }
        Ok(())
    }

    /// Validate, build the payload and send the update
    ///
    /// On success the navigator is sent to [`ADMIN_PATH`]. On any failure
    /// the controller stays `Ready` with the operator's values intact.
    ///
    /// # Errors
    /// - `EditError::Phase` if not `Ready` (a submit is already in flight)
    /// - `EditError::Validation` if fields are missing or too long; no request is made
    /// - `EditError::Store` if the update was not accepted
    pub async fn submit(&mut self) -> Result<Navigation, EditError> {
        self.require(Phase::Ready)?;

        let snapshot = self.loaded.as_ref().map(LoadedRecord::snapshot);
        let payload = match build_payload(self.form.values(), snapshot) {
            Ok(payload) => payload,
            Err(errors) => {
                tracing::warn!(record_id = %self.record_id, errors = %errors, "submit blocked by validation");
                self.form.set_errors(errors.clone());
                return Err(EditError::Validation(errors));
            }
        };

        self.form.clear_errors();
        // `&mut self` is held until the update settles, so no second submit
        // or input event can interleave with this one.
        self.transition(Phase::Submitting)?;
        tracing::info!(record_id = %self.record_id, "submitting update");

        let result = self.store.update(&self.record_id, &payload).await;

        match result {
            Ok(()) => {
                self.transition(Phase::Navigated)?;
                self.navigator.navigate(ADMIN_PATH);
                tracing::info!(record_id = %self.record_id, to = ADMIN_PATH, "update accepted");
                Ok(Navigation {
                    to: ADMIN_PATH.to_string(),
                })
            }
            Err(e) => {
                tracing::error!(record_id = %self.record_id, error = %e, "update failed");
                self.transition(Phase::Ready)?;
                Err(EditError::Store(e))
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Breed selector options
    #[inline]
    #[must_use]
    pub fn options(&self) -> &[TaxonomyOption] {
        &self.options
    }

    /// Load-time captures, if the record fetch succeeded
    #[inline]
    #[must_use]
    pub fn loaded(&self) -> Option<&LoadedRecord> {
        self.loaded.as_ref()
    }

    /// Currently stored image reference, for the preview
    #[inline]
    #[must_use]
    pub fn preview_image(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.snapshot().image.as_str())
    }

    fn require(&self, expected: Phase) -> Result<(), PhaseError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(PhaseError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn transition(&mut self, to: Phase) -> Result<(), PhaseError> {
        validate_transition(self.phase, to)?;
        tracing::debug!(record_id = %self.record_id, from = ?self.phase, to = ?to, "phase transition");
        self.phase = to;
        Ok(())
    }
}
