//! Per-record submission registry
//!
//! At most one update per record may be in flight across all requests. A
//! claim is held by an [`InFlightGuard`] and released when it drops, on every
//! exit path of the handler.

use parking_lot::Mutex;
use pet_admin_core::RecordId;
use std::collections::HashSet;
use std::sync::Arc;

/// Records with an update in flight
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    ids: Arc<Mutex<HashSet<RecordId>>>,
}

impl InFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id`, or `None` while another submission holds it
    #[must_use]
    pub fn claim(&self, id: &RecordId) -> Option<InFlightGuard> {
        if !self.ids.lock().insert(id.clone()) {
            return None;
        }
        Some(InFlightGuard {
            ids: Arc::clone(&self.ids),
            id: id.clone(),
        })
    }

    #[must_use]
    pub fn is_busy(&self, id: &RecordId) -> bool {
        self.ids.lock().contains(id)
    }
}

/// Releases its record on drop
#[derive(Debug)]
pub struct InFlightGuard {
    ids: Arc<Mutex<HashSet<RecordId>>>,
    id: RecordId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.ids.lock().remove(&self.id);
    }
}
