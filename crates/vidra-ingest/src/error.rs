use thiserror::Error;
use vidra_core::validation::ValidationError;
use vidra_db::PersistError;
use vidra_processing::DecodeError;
use vidra_storage::StoreError;

/// Errors surfaced by the ingestion pipeline.
///
/// Each variant wraps the error of the stage that failed, so callers can
/// tell a rejected upload from an infrastructure failure.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl IngestError {
    /// True when the failure is a duplicate `video_id` submission.
    pub fn is_conflict(&self) -> bool {
        matches!(self, IngestError::Persist(PersistError::Conflict(_)))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, IngestError::Persist(PersistError::NotFound))
    }
}
