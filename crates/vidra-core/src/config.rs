use crate::constants;
use std::env;
use std::time::Duration;

/// Environment-driven configuration for the ingestion pipeline.
///
/// Every knob has a code default so the struct can be built in tests without
/// touching the process environment. S3 credentials are not carried here; the
/// AWS SDK resolves them from its own environment chain.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// S3 bucket holding original and derived objects.
    pub s3_bucket: String,
    pub s3_region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, Spaces). Forces
    /// path-style addressing when set.
    pub s3_endpoint_url: Option<String>,
    /// Root directory for the local-filesystem backend.
    pub local_storage_path: String,
    /// Base URL under which locally stored objects are served.
    pub local_storage_base_url: String,
    pub max_file_size_bytes: usize,
    pub presign_ttl_seconds: u64,
    pub ffmpeg_path: String,
    /// Timestamp (seconds into the video) of the extracted cover frame.
    pub frame_timestamp_seconds: f64,
}

impl IngestConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .ok()
            .and_then(|v| v.parse::<usize>().ok());

        Self {
            s3_bucket: env::var("S3_BUCKET").unwrap_or_else(|_| "vidra-media".to_string()),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            s3_endpoint_url: env::var("S3_ENDPOINT_URL").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|_| "./media".to_string()),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/media".to_string()),
            max_file_size_bytes: max_file_size_mb
                .map(|mb| mb * 1024 * 1024)
                .unwrap_or(constants::MAX_VIDEO_SIZE_BYTES),
            presign_ttl_seconds: env::var("PRESIGN_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(constants::DEFAULT_PRESIGN_TTL_SECONDS),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            frame_timestamp_seconds: env::var("FRAME_TIMESTAMP_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(constants::DEFAULT_FRAME_TIMESTAMP_SECONDS),
        }
    }

    pub fn presign_ttl(&self) -> Duration {
        Duration::from_secs(self.presign_ttl_seconds)
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            s3_bucket: "vidra-media".to_string(),
            s3_region: "us-east-1".to_string(),
            s3_endpoint_url: None,
            local_storage_path: "./media".to_string(),
            local_storage_base_url: "http://localhost:3000/media".to_string(),
            max_file_size_bytes: constants::MAX_VIDEO_SIZE_BYTES,
            presign_ttl_seconds: constants::DEFAULT_PRESIGN_TTL_SECONDS,
            ffmpeg_path: "ffmpeg".to_string(),
            frame_timestamp_seconds: constants::DEFAULT_FRAME_TIMESTAMP_SECONDS,
        }
    }
}
