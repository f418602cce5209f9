//! Vidra Ingest Library
//!
//! Upload orchestration for video assets. Coordinates validation, object
//! storage, frame extraction, thumbnail rendering and metadata persistence,
//! rolling back stored objects whenever a later step fails so that a metadata
//! record exists if and only if all of its objects do.

pub mod error;
pub mod request;
pub mod rollback;
pub mod service;

pub use error::IngestError;
pub use request::{AssetSelector, UploadRequest};
pub use service::IngestService;
