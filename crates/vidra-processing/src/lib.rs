//! Vidra Processing Library
//!
//! Frame extraction and thumbnail rendering for the ingestion pipeline.

pub mod error;
pub mod ffmpeg;
pub mod thumbnail;
pub mod traits;

pub use error::DecodeError;
pub use ffmpeg::FfmpegFrameExtractor;
pub use thumbnail::render_thumbnail;
pub use traits::FrameExtractor;
