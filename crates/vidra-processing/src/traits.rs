use crate::error::DecodeError;
use async_trait::async_trait;

/// Extracts a single still frame from an in-memory video.
#[async_trait]
pub trait FrameExtractor: Send + Sync {
    /// Decode `video` and return the frame at `at_seconds` as encoded image
    /// bytes.
    async fn extract_frame(&self, video: &[u8], at_seconds: f64) -> Result<Vec<u8>, DecodeError>;
}
