//! Postgres-backed asset repository.

use crate::repository::{AssetFilter, AssetRepository, PersistError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use vidra_core::models::{AssetStatus, VideoAsset};

const ASSET_COLUMNS: &str = r#"
    id,
    video_id,
    user_id,
    original_filename,
    content_type,
    file_size,
    storage_key,
    cover_key,
    thumbnail_key,
    title,
    category,
    description,
    tags,
    duration_seconds,
    status,
    uploaded_at,
    deleted_at
"#;

#[derive(Debug, sqlx::FromRow)]
struct AssetRow {
    id: Uuid,
    video_id: String,
    user_id: i64,
    original_filename: String,
    content_type: String,
    file_size: i64,
    storage_key: String,
    cover_key: String,
    thumbnail_key: String,
    title: String,
    category: String,
    description: String,
    tags: Vec<String>,
    duration_seconds: i64,
    status: AssetStatus,
    uploaded_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<AssetRow> for VideoAsset {
    fn from(row: AssetRow) -> Self {
        VideoAsset {
            id: row.id,
            video_id: row.video_id,
            user_id: row.user_id,
            original_filename: row.original_filename,
            content_type: row.content_type,
            file_size: row.file_size,
            storage_key: row.storage_key,
            cover_key: row.cover_key,
            thumbnail_key: row.thumbnail_key,
            title: row.title,
            category: row.category,
            description: row.description,
            tags: row.tags,
            duration_seconds: row.duration_seconds,
            status: row.status,
            uploaded_at: row.uploaded_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Clone)]
pub struct PgAssetRepository {
    pool: PgPool,
}

impl PgAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetRepository for PgAssetRepository {
    #[tracing::instrument(skip(self, asset), fields(video_id = %asset.video_id))]
    async fn insert(&self, asset: &VideoAsset) -> Result<(), PersistError> {
        let result = sqlx::query(
            r#"
            INSERT INTO video_assets (
                id, video_id, user_id, original_filename, content_type,
                file_size, storage_key, cover_key, thumbnail_key, title,
                category, description, tags, duration_seconds, status,
                uploaded_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(asset.id)
        .bind(&asset.video_id)
        .bind(asset.user_id)
        .bind(&asset.original_filename)
        .bind(&asset.content_type)
        .bind(asset.file_size)
        .bind(&asset.storage_key)
        .bind(&asset.cover_key)
        .bind(&asset.thumbnail_key)
        .bind(&asset.title)
        .bind(&asset.category)
        .bind(&asset.description)
        .bind(&asset.tags)
        .bind(asset.duration_seconds)
        .bind(asset.status)
        .bind(asset.uploaded_at)
        .bind(asset.deleted_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::info!(
                    asset_id = %asset.id,
                    user_id = asset.user_id,
                    "Asset record inserted"
                );
                Ok(())
            }
            Err(e) => {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return Err(PersistError::Conflict(asset.video_id.clone()));
                    }
                }
                tracing::error!(
                    error = %e,
                    asset_id = %asset.id,
                    "Failed to insert asset record"
                );
                Err(PersistError::Database(e))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, user_id: i64, id: Uuid) -> Result<VideoAsset, PersistError> {
        let row: Option<AssetRow> = sqlx::query_as::<Postgres, AssetRow>(&format!(
            r#"
            SELECT {ASSET_COLUMNS}
            FROM video_assets
            WHERE user_id = $1 AND id = $2 AND status = 'active'
            "#,
        ))
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(VideoAsset::from).ok_or(PersistError::NotFound)
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_video_id(
        &self,
        user_id: i64,
        video_id: &str,
    ) -> Result<VideoAsset, PersistError> {
        let row: Option<AssetRow> = sqlx::query_as::<Postgres, AssetRow>(&format!(
            r#"
            SELECT {ASSET_COLUMNS}
            FROM video_assets
            WHERE user_id = $1 AND video_id = $2 AND status = 'active'
            "#,
        ))
        .bind(user_id)
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(VideoAsset::from).ok_or(PersistError::NotFound)
    }

    #[tracing::instrument(skip(self))]
    async fn mark_deleted(
        &self,
        user_id: i64,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<VideoAsset, PersistError> {
        let row: Option<AssetRow> = sqlx::query_as::<Postgres, AssetRow>(&format!(
            r#"
            UPDATE video_assets
            SET status = 'deleted',
                deleted_at = $3
            WHERE user_id = $1 AND id = $2 AND status = 'active'
            RETURNING {ASSET_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(id)
        .bind(deleted_at)
        .fetch_optional(&self.pool)
        .await?;

        let asset = row.map(VideoAsset::from).ok_or(PersistError::NotFound)?;

        tracing::info!(
            asset_id = %asset.id,
            video_id = %asset.video_id,
            user_id = user_id,
            "Asset record marked deleted"
        );

        Ok(asset)
    }

    #[tracing::instrument(skip(self))]
    async fn list(
        &self,
        user_id: i64,
        filter: &AssetFilter,
    ) -> Result<(Vec<VideoAsset>, i64), PersistError> {
        let title_pattern = filter
            .title_contains
            .as_ref()
            .map(|t| format!("%{}%", t));

        let total: i64 = sqlx::query_scalar::<Postgres, i64>(
            r#"
            SELECT COUNT(*)
            FROM video_assets
            WHERE user_id = $1
                AND status = 'active'
                AND ($2::text IS NULL OR title ILIKE $2)
                AND ($3::text IS NULL OR category = $3)
            "#,
        )
        .bind(user_id)
        .bind(&title_pattern)
        .bind(&filter.category)
        .fetch_one(&self.pool)
        .await?;

        let rows: Vec<AssetRow> = sqlx::query_as::<Postgres, AssetRow>(&format!(
            r#"
            SELECT {ASSET_COLUMNS}
            FROM video_assets
            WHERE user_id = $1
                AND status = 'active'
                AND ($2::text IS NULL OR title ILIKE $2)
                AND ($3::text IS NULL OR category = $3)
            ORDER BY uploaded_at DESC
            LIMIT $4 OFFSET $5
            "#,
        ))
        .bind(user_id)
        .bind(&title_pattern)
        .bind(&filter.category)
        .bind(filter.limit())
        .bind(filter.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(VideoAsset::from).collect(), total))
    }
}
