//! Upload orchestration and asset lifecycle.

use crate::error::IngestError;
use crate::request::{AssetSelector, UploadRequest};
use crate::rollback::{rollback, PendingUpload};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use vidra_core::config::IngestConfig;
use vidra_core::constants::{
    ALLOWED_VIDEO_CONTENT_TYPES, COVER_KEY_FOLDER, DEFAULT_FRAME_TIMESTAMP_SECONDS,
    DEFAULT_PRESIGN_TTL_SECONDS, THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH, VIDEO_KEY_FOLDER,
};
use vidra_core::duration::parse_duration_seconds;
use vidra_core::models::{AssetStatus, AssetView, Page, VideoAsset};
use vidra_core::validation::{require_field, UploadValidator, ValidationError};
use vidra_db::{AssetFilter, AssetRepository};
use vidra_processing::{render_thumbnail, FrameExtractor};
use vidra_storage::{object_key, ObjectStore};

/// Ingestion pipeline for video assets.
///
/// Upholds one invariant across the object store and the metadata store:
/// a metadata record exists if and only if the three objects it references
/// (original, cover frame, thumbnail) exist. Uploads that fail partway roll
/// back their stored objects; deletes flip the record first and then remove
/// the objects.
pub struct IngestService {
    store: Arc<dyn ObjectStore>,
    repository: Arc<dyn AssetRepository>,
    extractor: Arc<dyn FrameExtractor>,
    validator: UploadValidator,
    presign_ttl: Duration,
    frame_timestamp: f64,
}

impl IngestService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        repository: Arc<dyn AssetRepository>,
        extractor: Arc<dyn FrameExtractor>,
    ) -> Self {
        Self {
            store,
            repository,
            extractor,
            validator: UploadValidator::default(),
            presign_ttl: Duration::from_secs(DEFAULT_PRESIGN_TTL_SECONDS),
            frame_timestamp: DEFAULT_FRAME_TIMESTAMP_SECONDS,
        }
    }

    pub fn with_validator(mut self, validator: UploadValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_presign_ttl(mut self, ttl: Duration) -> Self {
        self.presign_ttl = ttl;
        self
    }

    /// Timestamp (seconds into the video) of the extracted cover frame.
    pub fn with_frame_timestamp(mut self, seconds: f64) -> Self {
        self.frame_timestamp = seconds;
        self
    }

    /// Apply the tunables carried by [`IngestConfig`].
    pub fn with_config(self, config: &IngestConfig) -> Self {
        let allowed = ALLOWED_VIDEO_CONTENT_TYPES
            .iter()
            .map(|ct| ct.to_string())
            .collect();

        self.with_validator(UploadValidator::new(config.max_file_size_bytes, allowed))
            .with_presign_ttl(config.presign_ttl())
            .with_frame_timestamp(config.frame_timestamp_seconds)
    }

    /// Create the backing bucket or directory if missing. Idempotent; call
    /// once at process start.
    pub async fn prepare(&self) -> Result<(), IngestError> {
        self.store.ensure_bucket().await?;
        Ok(())
    }

    /// Ingest one video: validate, store the original, derive the cover
    /// frame and thumbnail, and persist the metadata record.
    ///
    /// On any failure after the first object is stored, every object written
    /// by this attempt is deleted before the error is returned, so a failed
    /// upload leaves no trace in either store.
    #[tracing::instrument(skip(self, request), fields(video_id = %request.video_id, user_id = request.user_id))]
    pub async fn upload_video(&self, request: UploadRequest) -> Result<AssetView, IngestError> {
        self.validate(&request)?;

        let mut pending = PendingUpload::new();
        match self.run_upload(request, &mut pending).await {
            Ok(view) => {
                tracing::info!(
                    asset_id = %view.id,
                    video_id = %view.video_id,
                    file_size = view.file_size,
                    duration_seconds = view.duration_seconds,
                    "Video ingested"
                );
                Ok(view)
            }
            Err(e) => {
                tracing::error!(error = %e, "Upload failed, rolling back stored objects");
                rollback(&self.store, pending).await;
                Err(e)
            }
        }
    }

    fn validate(&self, request: &UploadRequest) -> Result<(), ValidationError> {
        require_field("video_id", &request.video_id)?;
        require_field("original_filename", &request.original_filename)?;
        require_field("title", &request.title)?;

        if request.user_id <= 0 {
            return Err(ValidationError::MissingField("user_id"));
        }

        self.validator.validate_file_size(request.data.len())?;
        self.validator.validate_content_type(&request.content_type)?;

        Ok(())
    }

    async fn run_upload(
        &self,
        request: UploadRequest,
        pending: &mut PendingUpload,
    ) -> Result<AssetView, IngestError> {
        let extension = file_extension(&request.original_filename, &request.content_type);
        let file_size = request.data.len() as i64;

        let storage_key = object_key(VIDEO_KEY_FOLDER, &extension);
        self.store
            .put(&storage_key, request.data.clone(), &request.content_type)
            .await?;
        pending.record(storage_key.clone());

        let frame = self
            .extractor
            .extract_frame(&request.data, self.frame_timestamp)
            .await?;
        let thumbnail = render_thumbnail(&frame, THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT)?;

        let cover_key = object_key(COVER_KEY_FOLDER, "jpg");
        self.store.put(&cover_key, frame, "image/jpeg").await?;
        pending.record(cover_key.clone());

        let thumbnail_key = object_key(COVER_KEY_FOLDER, "jpg");
        self.store
            .put(&thumbnail_key, thumbnail, "image/jpeg")
            .await?;
        pending.record(thumbnail_key.clone());

        let asset = VideoAsset {
            id: Uuid::new_v4(),
            video_id: request.video_id,
            user_id: request.user_id,
            original_filename: request.original_filename,
            content_type: request.content_type,
            file_size,
            storage_key,
            cover_key,
            thumbnail_key,
            title: request.title,
            category: request.category,
            description: request.description,
            tags: request.tags,
            duration_seconds: parse_duration_seconds(request.duration.as_deref().unwrap_or("")),
            status: AssetStatus::Active,
            uploaded_at: Utc::now(),
            deleted_at: None,
        };

        // URLs are signed before the record is written, which keeps the
        // insert as the last fallible step of the pipeline.
        let (video_url, cover_url, thumbnail_url) = self.sign_urls(&asset).await?;

        self.repository.insert(&asset).await?;

        Ok(AssetView::from_asset(
            &asset,
            video_url,
            cover_url,
            thumbnail_url,
        ))
    }

    /// Soft-delete an asset and remove its stored objects.
    ///
    /// The record is flipped to deleted first; object deletion is best
    /// effort afterwards, since a leftover blob is recoverable garbage while
    /// a dangling record is not.
    #[tracing::instrument(skip(self))]
    pub async fn delete_video(&self, user_id: i64, id: Uuid) -> Result<VideoAsset, IngestError> {
        let asset = self
            .repository
            .mark_deleted(user_id, id, Utc::now())
            .await?;

        for key in asset.blob_keys() {
            if let Err(e) = self.store.delete(key).await {
                tracing::warn!(
                    error = %e,
                    key = %key,
                    asset_id = %asset.id,
                    "Failed to delete object for removed asset"
                );
            }
        }

        tracing::info!(
            asset_id = %asset.id,
            video_id = %asset.video_id,
            "Video deleted"
        );

        Ok(asset)
    }

    /// Fetch one active asset with freshly signed URLs.
    pub async fn get_video(
        &self,
        user_id: i64,
        selector: &AssetSelector,
    ) -> Result<AssetView, IngestError> {
        let asset = match selector {
            AssetSelector::Id(id) => self.repository.get_by_id(user_id, *id).await?,
            AssetSelector::VideoId(video_id) => {
                self.repository.get_by_video_id(user_id, video_id).await?
            }
        };

        let (video_url, cover_url, thumbnail_url) = self.sign_urls(&asset).await?;
        Ok(AssetView::from_asset(
            &asset,
            video_url,
            cover_url,
            thumbnail_url,
        ))
    }

    /// List active assets, newest first, with freshly signed URLs.
    pub async fn list_videos(
        &self,
        user_id: i64,
        filter: &AssetFilter,
    ) -> Result<Page<AssetView>, IngestError> {
        let (assets, total) = self.repository.list(user_id, filter).await?;

        let mut items = Vec::with_capacity(assets.len());
        for asset in &assets {
            let (video_url, cover_url, thumbnail_url) = self.sign_urls(asset).await?;
            items.push(AssetView::from_asset(
                asset,
                video_url,
                cover_url,
                thumbnail_url,
            ));
        }

        Ok(Page::new(items, total, filter.page, filter.per_page))
    }

    async fn sign_urls(
        &self,
        asset: &VideoAsset,
    ) -> Result<(String, String, String), IngestError> {
        let video_url = self
            .store
            .presigned_url(&asset.storage_key, self.presign_ttl)
            .await?;
        let cover_url = self
            .store
            .presigned_url(&asset.cover_key, self.presign_ttl)
            .await?;
        let thumbnail_url = self
            .store
            .presigned_url(&asset.thumbnail_key, self.presign_ttl)
            .await?;

        Ok((video_url, cover_url, thumbnail_url))
    }
}

/// Pick the object key extension for an upload.
///
/// The filename extension wins when it looks sane; otherwise the extension
/// is derived from the declared content type.
fn file_extension(filename: &str, content_type: &str) -> String {
    if let Some((_, ext)) = filename.rsplit_once('.') {
        let ext = ext.to_lowercase();
        if !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return ext;
        }
    }

    match content_type.to_lowercase().as_str() {
        "video/webm" => "webm",
        "video/ogg" => "ogv",
        "video/quicktime" => "mov",
        "video/x-msvideo" => "avi",
        "video/x-matroska" => "mkv",
        "video/3gpp" => "3gp",
        "video/3gpp2" => "3g2",
        _ => "mp4",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_filename() {
        assert_eq!(file_extension("clip.MP4", "video/webm"), "mp4");
        assert_eq!(file_extension("a.b.mkv", "video/mp4"), "mkv");
    }

    #[test]
    fn test_extension_falls_back_to_content_type() {
        assert_eq!(file_extension("noextension", "video/quicktime"), "mov");
        assert_eq!(file_extension("weird.", "video/x-matroska"), "mkv");
        assert_eq!(file_extension("archive.tar.backup123456", "video/3gpp"), "3gp");
        assert_eq!(file_extension("clip", "video/unknown"), "mp4");
    }
}
