//! Vidra Storage Library
//!
//! Object storage abstraction for the ingestion pipeline, with S3 and
//! local-filesystem backends behind the [`ObjectStore`] trait.

pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

pub use keys::object_key;
#[cfg(feature = "storage-local")]
pub use local::LocalObjectStore;
#[cfg(feature = "storage-s3")]
pub use s3::S3ObjectStore;
pub use traits::{ObjectStore, StoreError, StoreResult};
