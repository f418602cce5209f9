use thiserror::Error;

/// Errors from decoding video or image payloads.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid ffmpeg path: {0}")]
    InvalidFfmpegPath(String),

    #[error("ffmpeg exited with status {status}: {stderr}")]
    FfmpegExit { status: i32, stderr: String },

    #[error("ffmpeg produced an empty frame")]
    EmptyFrame,

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Scratch(#[from] anyhow::Error),
}
