use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "asset_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Active,
    Deleted,
}

impl Display for AssetStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AssetStatus::Active => write!(f, "active"),
            AssetStatus::Deleted => write!(f, "deleted"),
        }
    }
}

/// Persisted metadata record for one ingested video.
///
/// A record exists if and only if all three referenced objects exist in the
/// object store. The ingestion pipeline maintains this by rolling back stored
/// objects whenever the record cannot be written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoAsset {
    pub id: Uuid,
    /// Client-generated identifier, unique across all assets.
    pub video_id: String,
    pub user_id: i64,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    /// Object key of the original video.
    pub storage_key: String,
    /// Object key of the extracted cover frame.
    pub cover_key: String,
    /// Object key of the cover-cropped thumbnail.
    pub thumbnail_key: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub tags: Vec<String>,
    pub duration_seconds: i64,
    pub status: AssetStatus,
    pub uploaded_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl VideoAsset {
    /// All object keys backing this asset, original first.
    pub fn blob_keys(&self) -> [&str; 3] {
        [&self.storage_key, &self.cover_key, &self.thumbnail_key]
    }

    pub fn is_deleted(&self) -> bool {
        self.status == AssetStatus::Deleted
    }
}

/// Client-facing projection of a [`VideoAsset`] with presigned access URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetView {
    pub id: Uuid,
    pub video_id: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub title: String,
    pub category: String,
    pub description: String,
    pub tags: Vec<String>,
    pub duration_seconds: i64,
    pub status: AssetStatus,
    pub uploaded_at: DateTime<Utc>,
    pub video_url: String,
    pub cover_url: String,
    pub thumbnail_url: String,
}

impl AssetView {
    pub fn from_asset(
        asset: &VideoAsset,
        video_url: String,
        cover_url: String,
        thumbnail_url: String,
    ) -> Self {
        AssetView {
            id: asset.id,
            video_id: asset.video_id.clone(),
            original_filename: asset.original_filename.clone(),
            content_type: asset.content_type.clone(),
            file_size: asset.file_size,
            title: asset.title.clone(),
            category: asset.category.clone(),
            description: asset.description.clone(),
            tags: asset.tags.clone(),
            duration_seconds: asset.duration_seconds,
            status: asset.status,
            uploaded_at: asset.uploaded_at,
            video_url,
            cover_url,
            thumbnail_url,
        }
    }
}
