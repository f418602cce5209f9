//! Compensating cleanup for partially completed uploads.

use std::sync::Arc;
use vidra_storage::ObjectStore;

/// Ordered ledger of object keys written during one upload attempt.
///
/// Keys are recorded immediately after each successful put. When a later
/// step fails, [`rollback`] deletes them in reverse order so the original
/// video, the largest object, is removed last.
#[derive(Debug, Default)]
pub struct PendingUpload {
    keys: Vec<String>,
}

impl PendingUpload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: String) {
        self.keys.push(key);
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Delete every recorded object, newest first.
///
/// Rollback is best effort. A failed delete is logged and skipped rather
/// than surfaced, so the caller always sees the error that triggered the
/// rollback, not a cleanup error. Deleting an absent key is a no-op at the
/// store level, which makes this safe to run however far the upload got.
pub async fn rollback(store: &Arc<dyn ObjectStore>, pending: PendingUpload) {
    for key in pending.keys.into_iter().rev() {
        if let Err(e) = store.delete(&key).await {
            tracing::warn!(
                error = %e,
                key = %key,
                "Failed to delete object during upload rollback"
            );
        } else {
            tracing::debug!(key = %key, "Rolled back object");
        }
    }
}
