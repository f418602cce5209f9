//! FFmpeg-backed frame extraction.

use crate::error::DecodeError;
use crate::traits::FrameExtractor;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Widest frame ffmpeg is allowed to emit; larger sources are scaled down
/// with the aspect ratio preserved.
const MAX_FRAME_WIDTH: u32 = 1280;

pub struct FfmpegFrameExtractor {
    ffmpeg_path: String,
}

impl FfmpegFrameExtractor {
    pub fn new(ffmpeg_path: String) -> Result<Self, DecodeError> {
        // Validate ffmpeg_path
        let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
        if ffmpeg_path.chars().any(|c| dangerous_chars.contains(&c)) {
            return Err(DecodeError::InvalidFfmpegPath(
                "path contains dangerous characters".to_string(),
            ));
        }

        Ok(Self { ffmpeg_path })
    }

    async fn run_extract(
        &self,
        input_path: &Path,
        output_path: &Path,
        timestamp: f64,
    ) -> Result<()> {
        // -2 keeps the height even, which JPEG encoding requires
        let scale_filter = format!("scale='min(iw,{})':-2", MAX_FRAME_WIDTH);

        let args = vec![
            "-ss".to_string(),
            timestamp.to_string(),
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
            "-vframes".to_string(),
            "1".to_string(),
            "-q:v".to_string(),
            "2".to_string(),
            "-vf".to_string(),
            scale_filter,
            "-y".to_string(),
            output_path.to_string_lossy().to_string(),
        ];

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to execute ffmpeg")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow::Error::new(DecodeError::FfmpegExit {
                status: output.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            }));
        }

        Ok(())
    }
}

#[async_trait]
impl FrameExtractor for FfmpegFrameExtractor {
    async fn extract_frame(&self, video: &[u8], at_seconds: f64) -> Result<Vec<u8>, DecodeError> {
        // Scratch files live only for the duration of this call; both are
        // removed on drop on every exit path.
        let input_temp = tempfile::NamedTempFile::new()
            .context("Failed to create ffmpeg input file")?;
        tokio::fs::write(input_temp.path(), video)
            .await
            .context("Failed to write ffmpeg input file")?;

        // Output needs a .jpg suffix so ffmpeg can infer the format.
        let output_temp = tempfile::Builder::new()
            .suffix(".jpg")
            .tempfile()
            .context("Failed to create ffmpeg output file")?;

        match self
            .run_extract(input_temp.path(), output_temp.path(), at_seconds)
            .await
        {
            Ok(()) => {}
            Err(e) => {
                return Err(match e.downcast::<DecodeError>() {
                    Ok(decode_err) => decode_err,
                    Err(other) => DecodeError::Scratch(other),
                })
            }
        }

        let frame = tokio::fs::read(output_temp.path())
            .await
            .context("Failed to read ffmpeg output file")?;

        if frame.is_empty() {
            return Err(DecodeError::EmptyFrame);
        }

        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_plain_path() {
        assert!(FfmpegFrameExtractor::new("ffmpeg".to_string()).is_ok());
        assert!(FfmpegFrameExtractor::new("/usr/bin/ffmpeg".to_string()).is_ok());
    }

    #[test]
    fn test_new_rejects_shell_metacharacters() {
        for path in ["ffmpeg; rm -rf /", "ffmpeg|cat", "ffmpeg$(x)", "ffmpeg`x`"] {
            assert!(matches!(
                FfmpegFrameExtractor::new(path.to_string()),
                Err(DecodeError::InvalidFfmpegPath(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_garbage_input_is_a_decode_error() {
        // Requires ffmpeg on PATH, as it is in development and CI images.
        let extractor = match FfmpegFrameExtractor::new("ffmpeg".to_string()) {
            Ok(e) => e,
            Err(_) => return,
        };

        let result = extractor.extract_frame(b"not a video", 1.0).await;
        match result {
            Err(DecodeError::FfmpegExit { status, .. }) => assert_ne!(status, 0),
            // ffmpeg missing from the environment; spawn failure is also an error path
            Err(DecodeError::Scratch(_)) => {}
            other => panic!("expected decode failure, got {:?}", other.map(|v| v.len())),
        }
    }
}
