//! Filesystem-based asset storage
//!
//! Writes go to a staging file next to the destination and are renamed into
//! place, so readers never observe a partially written asset.

use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use super::AssetKind;
use super::error::AssetError;
use crate::utils::file::is_contained_relative_path;

const BOOKS_DIR: &str = "books";

/// Filesystem-based asset storage
#[derive(Debug, Clone)]
pub struct FilesystemStorage {
    /// Base path for asset storage
    base_path: PathBuf,
}

impl FilesystemStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Create the storage and make sure the base directory exists
    pub async fn init(base_path: PathBuf) -> Result<Self, AssetError> {
        fs::create_dir_all(&base_path).await?;
        tracing::debug!(path = %base_path.display(), "Asset storage initialized");
        Ok(Self::new(base_path))
    }

    /// Relative path recorded on the book row, e.g. `books/{id}/cover`
    pub fn relative_path(book_id: Uuid, kind: AssetKind) -> String {
        format!("{}/{}/{}", BOOKS_DIR, book_id, kind.file_name())
    }

    /// Resolve a stored relative path against the base directory
    fn resolve(&self, relative: &str) -> Result<PathBuf, AssetError> {
        let relative_path = Path::new(relative);
        if !is_contained_relative_path(relative_path) {
            return Err(AssetError::InvalidPath(relative.to_string()));
        }
        Ok(self.base_path.join(relative_path))
    }

    /// Ensure parent directories exist for a file path
    async fn ensure_parent_dirs(&self, path: &Path) -> Result<(), AssetError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Store an asset, replacing any previous one of the same kind.
    ///
    /// Returns the relative path to record on the book row.
    pub async fn save(
        &self,
        book_id: Uuid,
        kind: AssetKind,
        data: &[u8],
    ) -> Result<String, AssetError> {
        let relative = Self::relative_path(book_id, kind);
        let dest_path = self.resolve(&relative)?;
        self.ensure_parent_dirs(&dest_path).await?;

        // PID + per-call suffix: concurrent saves of one asset stage separately
        let staging = dest_path.with_extension(format!(
            "{}.{}.tmp",
            std::process::id(),
            Uuid::new_v4().simple()
        ));
        fs::write(&staging, data).await?;
        if let Err(e) = fs::rename(&staging, &dest_path).await {
            fs::remove_file(&staging).await.ok();
            return Err(AssetError::Io(e));
        }

        tracing::debug!(
            book_id = %book_id,
            kind = kind.file_name(),
            size = data.len(),
            "Asset stored"
        );
        Ok(relative)
    }

    /// Read an asset by the relative path recorded on the book row
    pub async fn load(&self, relative: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve(relative)?;

        // Map ENOENT instead of checking first; the file may vanish in between
        fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AssetError::NotFound {
                    path: relative.to_string(),
                }
            } else {
                AssetError::Io(e)
            }
        })
    }

    /// Remove every asset of a book. Missing directories are not an error.
    pub async fn delete_book_assets(&self, book_id: Uuid) -> Result<(), AssetError> {
        let dir = self.base_path.join(BOOKS_DIR).join(book_id.to_string());
        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                tracing::debug!(book_id = %book_id, "Book assets deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AssetError::Io(e)),
        }
    }
}
