//! Data storage layer
//!
//! - `filters` - Criteria to `WHERE` / `ORDER BY` / `LIMIT` / `OFFSET` compiler
//! - `postgres` - PostgreSQL service and repository implementations
//! - `files` - Filesystem storage for book covers and book files
//! - `types` - Rows, inputs and criteria shared by all layers
//! - `traits` - Repository traits the domain services depend on
//! - `error` - Unified error type for the data layer

pub mod error;
pub mod files;
pub mod filters;
#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod traits;
pub mod types;

pub use error::DataError;
pub use files::{AssetError, AssetKind, FilesystemStorage};
pub use postgres::PostgresService;
pub use traits::{BookRepository, UserRepository};
