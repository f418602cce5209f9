//! Vidra DB Library
//!
//! Metadata persistence for ingested video assets.

pub mod postgres;
pub mod repository;

pub use postgres::PgAssetRepository;
pub use repository::{AssetFilter, AssetRepository, PersistError};
