//! Error types for Pet Admin Core
//!
//! Provides error handling for:
//! - Record storage failures (fetch and update)
//! - Taxonomy fetch/parse failures (logged by the controller, never raised from it)
//! - Form validation rejections
//! - Illegal controller phase transitions
//! - Configuration loading

use crate::form::FieldErrors;
use crate::state_machine::Phase;

/// Main edit-workflow error type
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Record storage call failed
    #[error("record store error: {0}")]
    Store(#[from] StoreError),

    /// Submission blocked by field validation
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// Operation not allowed in the current phase
    #[error("phase error: {0}")]
    Phase(#[from] PhaseError),
}

impl EditError {
    /// Check if the operator may usefully re-trigger the action
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Store(e) => e.is_retryable(),
            Self::Validation(_) | Self::Phase(_) => false,
        }
    }

    /// Field errors, if this is a validation rejection
    #[inline]
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Record storage errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Network/transport failure
    #[error("transport failed: {0}")]
    Transport(String),

    /// Storage API answered with a non-success status
    #[error("unexpected status {status}")]
    Status { status: u16 },

    /// Response body did not match the record envelope
    #[error("malformed record: {0}")]
    Decode(String),
}

impl StoreError {
    /// Transport failures and server-side statuses may succeed on a manual retry
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status } => *status >= 500,
            Self::Decode(_) => false,
        }
    }
}

/// Taxonomy source errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaxonomyError {
    /// Network/transport failure
    #[error("transport failed: {0}")]
    Transport(String),

    /// Response body was not a breed mapping
    #[error("malformed taxonomy: {0}")]
    Decode(String),
}

impl TaxonomyError {
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Controller phase errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PhaseError {
    /// Transition not in the allowed table
    #[error("illegal transition {from:?} -> {to:?}")]
    IllegalTransition { from: Phase, to: Phase },

    /// Operation requires a different phase
    #[error("expected phase {expected:?}, controller is {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
