//! Pet Admin Core - Edit-reconciliation workflow
//!
//! Reconciles three independent sources into one submittable record:
//! - The persisted record (loaded once, captured twice)
//! - The breed taxonomy (flattened into selector options)
//! - The operator's in-progress edits
//!
//! # Example
//!
//! ```rust,ignore
//! use pet_admin_core::prelude::*;
//!
//! # async fn example(store: Arc<dyn RecordStore>, breeds: Arc<dyn TaxonomySource>,
//! #                  nav: Arc<dyn Navigator>) -> Result<(), EditError> {
//! let mut controller =
//!     EditController::mount(RecordId::new("5"), store, breeds.as_ref(), nav).await;
//!
//! controller.apply(FormEvent::Name("Rex".into()))?;
//! let navigation = controller.submit().await?;
//! assert_eq!(navigation.to, "/admin");
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod record;
pub mod state_machine;
pub mod submission;
pub mod taxonomy;
pub mod types;

// Re-exports for convenience
pub use config::{AdminConfig, ApiSettings, GuardSettings, LoggingSettings};
pub use controller::{EditController, Navigation, Navigator, ADMIN_PATH};
pub use error::{ConfigError, EditError, PhaseError, StoreError, TaxonomyError};
pub use form::{Field, FieldError, FieldErrors, FormEvent, FormState, FormValues};
pub use record::{load_record, LoadedRecord, RecordStore};
pub use state_machine::Phase;
pub use submission::{build_payload, resolve_image, ImagePayload, UpdatePayload};
pub use taxonomy::{flatten, load_options, BreedsResponse, TaxonomyOption, TaxonomySource};
pub use types::{ImageField, ImageFile, Record, RecordEnvelope, RecordId, SelectOption, Sex, WeightClass};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving an edit session
    pub use crate::{
        EditController, EditError, FormEvent, ImageFile, Navigator, Phase, RecordId, RecordStore,
        Sex, TaxonomySource, WeightClass,
    };
    pub use std::sync::Arc;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
