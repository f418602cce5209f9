//! End-to-end upload tests against in-memory collaborators.

mod helpers;

use helpers::{
    sample_request, FailingFrameExtractor, MockAssetRepository, MockObjectStore, StubFrameExtractor,
};
use std::sync::Arc;
use vidra_core::constants::ALLOWED_VIDEO_CONTENT_TYPES;
use vidra_core::validation::{UploadValidator, ValidationError};
use vidra_ingest::{IngestError, IngestService};

fn service(store: &Arc<MockObjectStore>, repo: &Arc<MockAssetRepository>) -> IngestService {
    IngestService::new(store.clone(), repo.clone(), Arc::new(StubFrameExtractor))
}

#[tokio::test]
async fn test_upload_happy_path() {
    let store = Arc::new(MockObjectStore::new());
    let repo = Arc::new(MockAssetRepository::new());
    let service = service(&store, &repo);

    let view = service.upload_video(sample_request("vid-1")).await.unwrap();

    assert_eq!(view.video_id, "vid-1");
    assert_eq!(view.file_size, 4096);
    assert_eq!(view.duration_seconds, 630);
    assert!(view.video_url.starts_with("https://signed.test/videos/"));
    assert!(view.cover_url.starts_with("https://signed.test/covers/"));
    assert!(view.thumbnail_url.starts_with("https://signed.test/covers/"));

    let asset = repo.fetch_raw("vid-1").unwrap();
    assert!(asset.storage_key.starts_with("videos/"));
    assert!(asset.storage_key.ends_with(".mp4"));
    assert!(asset.cover_key.starts_with("covers/"));
    assert!(asset.thumbnail_key.starts_with("covers/"));
    assert!(!asset.is_deleted());

    assert_eq!(store.file_count(), 3);
    assert_eq!(store.get_file(&asset.storage_key).unwrap().len(), 4096);

    // The stored thumbnail is a real JPEG at the fixed geometry.
    let thumbnail = store.get_file(&asset.thumbnail_key).unwrap();
    let decoded = image::load_from_memory(&thumbnail).unwrap();
    assert_eq!(decoded.width(), 320);
    assert_eq!(decoded.height(), 180);
}

#[tokio::test]
async fn test_hms_duration_is_parsed() {
    let store = Arc::new(MockObjectStore::new());
    let repo = Arc::new(MockAssetRepository::new());
    let service = service(&store, &repo);

    let mut request = sample_request("vid-hms");
    request.duration = Some("01:10:30".to_string());
    let view = service.upload_video(request).await.unwrap();
    assert_eq!(view.duration_seconds, 4230);
}

#[tokio::test]
async fn test_unparseable_duration_stored_as_zero() {
    let store = Arc::new(MockObjectStore::new());
    let repo = Arc::new(MockAssetRepository::new());
    let service = service(&store, &repo);

    let mut request = sample_request("vid-no-duration");
    request.duration = None;
    assert_eq!(
        service.upload_video(request).await.unwrap().duration_seconds,
        0
    );

    let mut request = sample_request("vid-bad-duration");
    request.duration = Some("about an hour".to_string());
    assert_eq!(
        service.upload_video(request).await.unwrap().duration_seconds,
        0
    );
}

#[tokio::test]
async fn test_duplicate_video_id_conflicts_and_rolls_back() {
    let store = Arc::new(MockObjectStore::new());
    let repo = Arc::new(MockAssetRepository::new());
    let service = service(&store, &repo);

    service.upload_video(sample_request("vid-dup")).await.unwrap();
    let err = service
        .upload_video(sample_request("vid-dup"))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    // Only the first upload's objects survive.
    assert_eq!(store.file_count(), 3);
    assert_eq!(repo.record_count(), 1);
}

#[tokio::test]
async fn test_decode_failure_rolls_back_stored_original() {
    let store = Arc::new(MockObjectStore::new());
    let repo = Arc::new(MockAssetRepository::new());
    let service = IngestService::new(
        store.clone(),
        repo.clone(),
        Arc::new(FailingFrameExtractor),
    );

    let err = service
        .upload_video(sample_request("vid-broken"))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Decode(_)));
    // The original was stored, then rolled back.
    assert_eq!(store.put_call_count(), 1);
    assert_eq!(store.file_count(), 0);
    assert_eq!(repo.record_count(), 0);
}

#[tokio::test]
async fn test_cover_put_failure_rolls_back_everything() {
    let store = Arc::new(MockObjectStore::new().failing_put_on_call(2));
    let repo = Arc::new(MockAssetRepository::new());
    let service = service(&store, &repo);

    let err = service
        .upload_video(sample_request("vid-cover-fail"))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Store(_)));
    assert_eq!(store.file_count(), 0);
    assert_eq!(repo.record_count(), 0);
}

#[tokio::test]
async fn test_thumbnail_put_failure_rolls_back_everything() {
    let store = Arc::new(MockObjectStore::new().failing_put_on_call(3));
    let repo = Arc::new(MockAssetRepository::new());
    let service = service(&store, &repo);

    let err = service
        .upload_video(sample_request("vid-thumb-fail"))
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Store(_)));
    assert_eq!(store.file_count(), 0);
    assert_eq!(repo.record_count(), 0);
}

#[tokio::test]
async fn test_oversized_file_rejected_before_any_put() {
    let store = Arc::new(MockObjectStore::new());
    let repo = Arc::new(MockAssetRepository::new());
    let allowed = ALLOWED_VIDEO_CONTENT_TYPES
        .iter()
        .map(|ct| ct.to_string())
        .collect();
    let service = service(&store, &repo).with_validator(UploadValidator::new(1024, allowed));

    let err = service
        .upload_video(sample_request("vid-too-big"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        IngestError::Validation(ValidationError::FileTooLarge { .. })
    ));
    assert_eq!(store.put_call_count(), 0);
    assert_eq!(repo.record_count(), 0);
}

#[tokio::test]
async fn test_disallowed_content_type_rejected_before_any_put() {
    let store = Arc::new(MockObjectStore::new());
    let repo = Arc::new(MockAssetRepository::new());
    let service = service(&store, &repo);

    let mut request = sample_request("vid-png");
    request.content_type = "image/png".to_string();
    let err = service.upload_video(request).await.unwrap_err();

    assert!(matches!(
        err,
        IngestError::Validation(ValidationError::InvalidContentType { .. })
    ));
    assert_eq!(store.put_call_count(), 0);
}

#[tokio::test]
async fn test_empty_file_rejected() {
    let store = Arc::new(MockObjectStore::new());
    let repo = Arc::new(MockAssetRepository::new());
    let service = service(&store, &repo);

    let mut request = sample_request("vid-empty");
    request.data = Vec::new();
    let err = service.upload_video(request).await.unwrap_err();

    assert!(matches!(
        err,
        IngestError::Validation(ValidationError::EmptyFile)
    ));
}

#[tokio::test]
async fn test_blank_required_fields_rejected() {
    let store = Arc::new(MockObjectStore::new());
    let repo = Arc::new(MockAssetRepository::new());
    let service = service(&store, &repo);

    let mut request = sample_request("");
    request.video_id = "   ".to_string();
    let err = service.upload_video(request).await.unwrap_err();
    assert!(matches!(
        err,
        IngestError::Validation(ValidationError::MissingField("video_id"))
    ));

    let mut request = sample_request("vid-no-user");
    request.user_id = 0;
    let err = service.upload_video(request).await.unwrap_err();
    assert!(matches!(
        err,
        IngestError::Validation(ValidationError::MissingField("user_id"))
    ));
}

#[tokio::test]
async fn test_rollback_failure_does_not_mask_original_error() {
    let store = Arc::new(MockObjectStore::new().failing_deletes());
    let repo = Arc::new(MockAssetRepository::new());
    let service = IngestService::new(
        store.clone(),
        repo.clone(),
        Arc::new(FailingFrameExtractor),
    );

    let err = service
        .upload_video(sample_request("vid-cleanup-fail"))
        .await
        .unwrap_err();

    // The decode error surfaces even though cleanup itself failed.
    assert!(matches!(err, IngestError::Decode(_)));
    assert_eq!(repo.record_count(), 0);
}
