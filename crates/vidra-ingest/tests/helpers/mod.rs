#![allow(dead_code)]

//! In-memory doubles for the ingestion pipeline's collaborators.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use vidra_core::models::{AssetStatus, VideoAsset};
use vidra_db::{AssetFilter, AssetRepository, PersistError};
use vidra_ingest::UploadRequest;
use vidra_processing::{DecodeError, FrameExtractor};
use vidra_storage::{ObjectStore, StoreError, StoreResult};

/// Mock object store that keeps files in memory.
pub struct MockObjectStore {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    put_calls: AtomicUsize,
    /// 1-based index of the put call that should fail, if any.
    fail_put_on_call: Option<usize>,
    fail_deletes: bool,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            put_calls: AtomicUsize::new(0),
            fail_put_on_call: None,
            fail_deletes: false,
        }
    }

    pub fn failing_put_on_call(mut self, call: usize) -> Self {
        self.fail_put_on_call = Some(call);
        self
    }

    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn has_file(&self, key: &str) -> bool {
        self.files.lock().unwrap().contains_key(key)
    }

    pub fn get_file(&self, key: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(key).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    pub fn put_call_count(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> StoreResult<()> {
        let call = self.put_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_put_on_call == Some(call) {
            return Err(StoreError::PutFailed {
                key: key.to_string(),
                message: "injected put failure".to_string(),
            });
        }

        self.files.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        if self.fail_deletes {
            return Err(StoreError::DeleteFailed {
                key: key.to_string(),
                message: "injected delete failure".to_string(),
            });
        }

        // Absent keys are not an error, matching the real backends.
        self.files.lock().unwrap().remove(key);
        Ok(())
    }

    async fn presigned_url(&self, key: &str, ttl: Duration) -> StoreResult<String> {
        Ok(format!("https://signed.test/{}?ttl={}", key, ttl.as_secs()))
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://cdn.test/{}", key)
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(key))
    }

    async fn ensure_bucket(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Mock repository backed by a plain Vec, enforcing the `video_id` unique
/// constraint the way the real table does.
pub struct MockAssetRepository {
    assets: Mutex<Vec<VideoAsset>>,
}

impl MockAssetRepository {
    pub fn new() -> Self {
        Self {
            assets: Mutex::new(Vec::new()),
        }
    }

    pub fn record_count(&self) -> usize {
        self.assets.lock().unwrap().len()
    }

    /// Fetch a record regardless of status, for assertions on soft deletes.
    pub fn fetch_raw(&self, video_id: &str) -> Option<VideoAsset> {
        self.assets
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.video_id == video_id)
            .cloned()
    }
}

#[async_trait]
impl AssetRepository for MockAssetRepository {
    async fn insert(&self, asset: &VideoAsset) -> Result<(), PersistError> {
        let mut assets = self.assets.lock().unwrap();
        if assets.iter().any(|a| a.video_id == asset.video_id) {
            return Err(PersistError::Conflict(asset.video_id.clone()));
        }
        assets.push(asset.clone());
        Ok(())
    }

    async fn get_by_id(&self, user_id: i64, id: Uuid) -> Result<VideoAsset, PersistError> {
        self.assets
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.user_id == user_id && a.id == id && a.status == AssetStatus::Active)
            .cloned()
            .ok_or(PersistError::NotFound)
    }

    async fn get_by_video_id(
        &self,
        user_id: i64,
        video_id: &str,
    ) -> Result<VideoAsset, PersistError> {
        self.assets
            .lock()
            .unwrap()
            .iter()
            .find(|a| {
                a.user_id == user_id && a.video_id == video_id && a.status == AssetStatus::Active
            })
            .cloned()
            .ok_or(PersistError::NotFound)
    }

    async fn mark_deleted(
        &self,
        user_id: i64,
        id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<VideoAsset, PersistError> {
        let mut assets = self.assets.lock().unwrap();
        let asset = assets
            .iter_mut()
            .find(|a| a.user_id == user_id && a.id == id && a.status == AssetStatus::Active)
            .ok_or(PersistError::NotFound)?;

        asset.status = AssetStatus::Deleted;
        asset.deleted_at = Some(deleted_at);
        Ok(asset.clone())
    }

    async fn list(
        &self,
        user_id: i64,
        filter: &AssetFilter,
    ) -> Result<(Vec<VideoAsset>, i64), PersistError> {
        let assets = self.assets.lock().unwrap();
        let mut matches: Vec<VideoAsset> = assets
            .iter()
            .filter(|a| a.user_id == user_id && a.status == AssetStatus::Active)
            .filter(|a| match &filter.title_contains {
                Some(needle) => a.title.to_lowercase().contains(&needle.to_lowercase()),
                None => true,
            })
            .filter(|a| match &filter.category {
                Some(category) => &a.category == category,
                None => true,
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        let total = matches.len() as i64;

        let items = matches
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit() as usize)
            .collect();

        Ok((items, total))
    }
}

/// Frame extractor that returns a fixed decodable PNG.
pub struct StubFrameExtractor;

#[async_trait]
impl FrameExtractor for StubFrameExtractor {
    async fn extract_frame(&self, _video: &[u8], _at_seconds: f64) -> Result<Vec<u8>, DecodeError> {
        let img = RgbaImage::from_pixel(640, 360, Rgba([10, 120, 200, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(DecodeError::Image)?;
        Ok(bytes)
    }
}

/// Frame extractor that always fails, simulating an undecodable video.
pub struct FailingFrameExtractor;

#[async_trait]
impl FrameExtractor for FailingFrameExtractor {
    async fn extract_frame(&self, _video: &[u8], _at_seconds: f64) -> Result<Vec<u8>, DecodeError> {
        Err(DecodeError::EmptyFrame)
    }
}

pub fn sample_request(video_id: &str) -> UploadRequest {
    UploadRequest {
        user_id: 7,
        video_id: video_id.to_string(),
        original_filename: "clip.mp4".to_string(),
        content_type: "video/mp4".to_string(),
        data: vec![0x42; 4096],
        title: "Sample clip".to_string(),
        category: "demo".to_string(),
        description: "An uploaded clip".to_string(),
        tags: vec!["demo".to_string()],
        duration: Some("10:30".to_string()),
    }
}
