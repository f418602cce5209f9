use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;
use vidra_core::models::VideoAsset;

/// Persistence errors for asset metadata.
///
/// `Conflict` is distinguishable from other database failures so the
/// orchestrator can surface duplicate `video_id` submissions as such.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Asset with video_id {0} already exists")]
    Conflict(String),

    #[error("Asset not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Filters and paging for asset listings.
#[derive(Debug, Clone)]
pub struct AssetFilter {
    pub page: u32,
    pub per_page: u32,
    /// Case-insensitive substring match on the title.
    pub title_contains: Option<String>,
    pub category: Option<String>,
}

impl AssetFilter {
    pub fn page(page: u32, per_page: u32) -> Self {
        AssetFilter {
            page: page.max(1),
            per_page: per_page.max(1),
            title_contains: None,
            category: None,
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page.max(1))
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * self.limit()
    }
}

/// Metadata repository for video assets.
///
/// Reads are scoped to active assets; a soft-deleted asset behaves as absent
/// to `get_*` and `list`.
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Insert a new asset record. Fails with [`PersistError::Conflict`] when
    /// the `video_id` is already taken.
    async fn insert(&self, asset: &VideoAsset) -> Result<(), PersistError>;

    async fn get_by_id(&self, user_id: i64, id: Uuid) -> Result<VideoAsset, PersistError>;

    async fn get_by_video_id(
        &self,
        user_id: i64,
        video_id: &str,
    ) -> Result<VideoAsset, PersistError>;

    /// Flip an active asset to deleted and stamp `deleted_at`. Returns the
    /// updated record so callers can clean up its blobs.
    async fn mark_deleted(
        &self,
        user_id: i64,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<VideoAsset, PersistError>;

    /// List active assets matching `filter`, newest first, along with the
    /// total match count.
    async fn list(
        &self,
        user_id: i64,
        filter: &AssetFilter,
    ) -> Result<(Vec<VideoAsset>, i64), PersistError>;
}
