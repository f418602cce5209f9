use uuid::Uuid;

/// One video upload submission.
///
/// `duration` is the client-reported playback length as `"mm:ss"` or
/// `"hh:mm:ss"`; anything else (including absence) is stored as zero
/// seconds.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub user_id: i64,
    /// Client-generated identifier, unique across all assets.
    pub video_id: String,
    pub original_filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub title: String,
    pub category: String,
    pub description: String,
    pub tags: Vec<String>,
    pub duration: Option<String>,
}

/// How a caller addresses an existing asset.
#[derive(Debug, Clone)]
pub enum AssetSelector {
    Id(Uuid),
    VideoId(String),
}
