//! Object storage abstraction trait
//!
//! This module defines the ObjectStore trait that all storage backends must
//! implement.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors, tagged with the object key involved.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Put failed for {key}: {message}")]
    PutFailed { key: String, message: String },

    #[error("Delete failed for {key}: {message}")]
    DeleteFailed { key: String, message: String },

    #[error("Presign failed for {key}: {message}")]
    PresignFailed { key: String, message: String },

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Object storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// The ingestion pipeline works against it without coupling to backend
/// details.
///
/// **Key format:** Keys are generated by [`crate::keys::object_key`] and are
/// never reused across upload attempts.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key`, overwriting any existing object.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StoreResult<()>;

    /// Delete the object at `key`.
    ///
    /// Deleting an absent key is not an error; rollback relies on this so it
    /// can retry without tracking which writes actually landed.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Generate a presigned GET URL valid for `ttl`.
    async fn presigned_url(&self, key: &str, ttl: Duration) -> StoreResult<String>;

    /// Stable public URL for `key`, independent of whether the object exists.
    fn public_url(&self, key: &str) -> String;

    /// Check whether an object exists at `key`.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// Create the backing bucket or directory if it is missing.
    ///
    /// Idempotent. Called once at process start, not per upload.
    async fn ensure_bucket(&self) -> StoreResult<()>;
}
