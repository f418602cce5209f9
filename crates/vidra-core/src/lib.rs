//! Vidra Core Library
//!
//! This crate provides the domain models, validation, configuration and
//! shared constants used by all vidra components.

pub mod config;
pub mod constants;
pub mod duration;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::IngestConfig;
pub use duration::parse_duration_seconds;
pub use models::{AssetStatus, AssetView, Page, VideoAsset};
pub use validation::{UploadValidator, ValidationError};
