//! Shared constants for the ingestion pipeline.

/// Maximum accepted size for an uploaded video file.
pub const MAX_VIDEO_SIZE_BYTES: usize = 100 * 1024 * 1024;

/// Content types accepted for upload.
pub const ALLOWED_VIDEO_CONTENT_TYPES: [&str; 8] = [
    "video/mp4",
    "video/webm",
    "video/ogg",
    "video/quicktime",
    "video/x-msvideo",
    "video/x-matroska",
    "video/3gpp",
    "video/3gpp2",
];

/// Thumbnail geometry. Thumbnails are always cover-cropped to exactly this.
pub const THUMBNAIL_WIDTH: u32 = 320;
pub const THUMBNAIL_HEIGHT: u32 = 180;

/// Key prefix for original video objects.
pub const VIDEO_KEY_FOLDER: &str = "videos";

/// Key prefix for derived image objects (cover frame and thumbnail).
pub const COVER_KEY_FOLDER: &str = "covers";

/// Default timestamp (seconds into the video) of the extracted cover frame.
pub const DEFAULT_FRAME_TIMESTAMP_SECONDS: f64 = 1.0;

/// Default lifetime of presigned URLs handed back to clients.
pub const DEFAULT_PRESIGN_TTL_SECONDS: u64 = 3600;
