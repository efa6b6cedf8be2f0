//! Book asset storage
//!
//! Covers and book files live on the local filesystem, one directory per
//! book:
//!
//! ```text
//! {base_path}/
//! └── books/
//!     └── {book_id}/
//!         ├── cover
//!         └── book
//! ```
//!
//! The book row records the path relative to `base_path`, so the base
//! directory can move without touching the database.

pub mod error;
pub mod filesystem;

use serde::Deserialize;

pub use error::AssetError;
pub use filesystem::FilesystemStorage;

/// Kind of asset attached to a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Cover,
    Book,
}

impl AssetKind {
    /// File name inside the book's directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Book => "book",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_kind_file_names() {
        assert_eq!(AssetKind::Cover.file_name(), "cover");
        assert_eq!(AssetKind::Book.file_name(), "book");
    }

    #[test]
    fn test_asset_kind_deserialize() {
        let kind: AssetKind = serde_json::from_str("\"cover\"").unwrap();
        assert_eq!(kind, AssetKind::Cover);
        assert!(serde_json::from_str::<AssetKind>("\"poster\"").is_err());
    }
}
