//! Book service

use std::sync::Arc;

use uuid::Uuid;

use super::error::DomainError;
use crate::data::error::DataError;
use crate::data::files::{AssetKind, FilesystemStorage};
use crate::data::traits::{BookRepository, UserRepository};
use crate::data::types::{BookChanges, BookFilters, BookRow, BookStatus, NewBook, UserStatus};

/// Input for creating a book
#[derive(Debug, Clone)]
pub struct CreateBook {
    pub title: String,
    pub description: String,
    pub author_id: Uuid,
}

#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn BookRepository>,
    users: Arc<dyn UserRepository>,
    assets: Arc<FilesystemStorage>,
}

impl BookService {
    pub fn new(
        books: Arc<dyn BookRepository>,
        users: Arc<dyn UserRepository>,
        assets: Arc<FilesystemStorage>,
    ) -> Self {
        Self {
            books,
            users,
            assets,
        }
    }

    pub async fn list_books(&self, filters: &BookFilters) -> Result<Vec<BookRow>, DomainError> {
        Ok(self.books.filter_books(filters).await?)
    }

    /// Create a draft book for an active author
    pub async fn create_book(&self, input: CreateBook) -> Result<BookRow, DomainError> {
        self.require_active_author(input.author_id).await?;

        let book = self
            .books
            .create_book(&NewBook {
                title: input.title,
                description: input.description,
                author_id: input.author_id,
                status: BookStatus::Draft,
            })
            .await?;
        tracing::debug!(id = %book.id, author_id = %book.author_id, "Book created");
        Ok(book)
    }

    pub async fn get_book(&self, id: Uuid) -> Result<BookRow, DomainError> {
        Ok(self.books.get_book(id).await?)
    }

    pub async fn update_book(
        &self,
        id: Uuid,
        changes: &BookChanges,
    ) -> Result<BookRow, DomainError> {
        if let Some(author_id) = changes.author_id {
            self.require_active_author(author_id).await?;
        }
        Ok(self.books.update_book(id, changes).await?)
    }

    /// Delete a book and its stored assets
    pub async fn delete_book(&self, id: Uuid) -> Result<BookRow, DomainError> {
        let book = self.books.delete_book(id).await?;
        if let Err(e) = self.assets.delete_book_assets(id).await {
            tracing::warn!(id = %id, error = %e, "Failed to delete book assets");
        }
        tracing::debug!(id = %id, "Book deleted");
        Ok(book)
    }

    pub async fn upload_cover(&self, id: Uuid, data: &[u8]) -> Result<BookRow, DomainError> {
        self.upload(id, AssetKind::Cover, data).await
    }

    pub async fn upload_book_file(&self, id: Uuid, data: &[u8]) -> Result<BookRow, DomainError> {
        self.upload(id, AssetKind::Book, data).await
    }

    /// Read a stored asset; a book without one is `DoesNotExist`
    pub async fn read_asset(&self, id: Uuid, kind: AssetKind) -> Result<Vec<u8>, DomainError> {
        let book = self.books.get_book(id).await?;
        let path = match kind {
            AssetKind::Cover => &book.cover_path,
            AssetKind::Book => &book.book_path,
        };
        if path.is_empty() {
            return Err(DomainError::DoesNotExist { entity: "asset" });
        }
        Ok(self.assets.load(path).await?)
    }

    async fn upload(&self, id: Uuid, kind: AssetKind, data: &[u8]) -> Result<BookRow, DomainError> {
        if data.is_empty() {
            return Err(DomainError::Validation("upload must not be empty".into()));
        }
        // Fail before writing anything for an unknown book
        self.books.get_book(id).await?;

        let relative = self.assets.save(id, kind, data).await?;
        let changes = match kind {
            AssetKind::Cover => BookChanges {
                cover_path: Some(relative),
                ..Default::default()
            },
            AssetKind::Book => BookChanges {
                book_path: Some(relative),
                ..Default::default()
            },
        };
        Ok(self.books.update_book(id, &changes).await?)
    }

    async fn require_active_author(&self, author_id: Uuid) -> Result<(), DomainError> {
        match self.users.get_user(author_id, UserStatus::Active).await {
            Ok(_) => Ok(()),
            Err(DataError::NotFound { .. }) => Err(DomainError::DoesNotExist { entity: "user" }),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::MemoryRepository;
    use crate::data::types::{NewUser, UserRow};
    use crate::domain::credential::Credential;
    use tempfile::TempDir;

    struct Fixture {
        service: BookService,
        repo: MemoryRepository,
        dir: TempDir,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let repo = MemoryRepository::new();
        let assets = Arc::new(FilesystemStorage::new(dir.path().to_path_buf()));
        let service = BookService::new(Arc::new(repo.clone()), Arc::new(repo.clone()), assets);
        Fixture {
            service,
            repo,
            dir,
        }
    }

    async fn author(repo: &MemoryRepository, status: UserStatus) -> UserRow {
        repo.create_user(&NewUser {
            username: "ursula".to_string(),
            nickname: "Ursula".to_string(),
            email: "ursula@example.com".to_string(),
            bio: String::new(),
            password: Credential::Absent,
            status,
        })
        .await
        .unwrap()
    }

    fn input(author_id: Uuid) -> CreateBook {
        CreateBook {
            title: "The Dispossessed".to_string(),
            description: "An ambiguous utopia".to_string(),
            author_id,
        }
    }

    #[tokio::test]
    async fn test_create_book_as_draft() {
        let f = fixture();
        let user = author(&f.repo, UserStatus::Active).await;

        let book = f.service.create_book(input(user.id)).await.unwrap();
        assert_eq!(book.status, BookStatus::Draft);
        assert_eq!(book.author_id, user.id);
        assert!(book.cover_path.is_empty());
    }

    #[tokio::test]
    async fn test_create_book_requires_active_author() {
        let f = fixture();
        let banned = author(&f.repo, UserStatus::Banned).await;

        for author_id in [banned.id, Uuid::new_v4()] {
            let result = f.service.create_book(input(author_id)).await;
            assert!(matches!(
                result,
                Err(DomainError::DoesNotExist { entity: "user" })
            ));
        }
        assert_eq!(f.repo.book_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_book() {
        let f = fixture();
        let user = author(&f.repo, UserStatus::Active).await;
        let book = f.service.create_book(input(user.id)).await.unwrap();

        let changes = BookChanges {
            status: Some(BookStatus::Public),
            ..Default::default()
        };
        let updated = f.service.update_book(book.id, &changes).await.unwrap();
        assert_eq!(updated.status, BookStatus::Public);
        assert_eq!(updated.title, book.title);

        let missing = f.service.update_book(Uuid::new_v4(), &changes).await;
        assert!(matches!(missing, Err(DomainError::NotFound { entity: "book" })));
    }

    #[tokio::test]
    async fn test_upload_and_read_assets() {
        let f = fixture();
        let user = author(&f.repo, UserStatus::Active).await;
        let book = f.service.create_book(input(user.id)).await.unwrap();

        let updated = f.service.upload_cover(book.id, b"cover").await.unwrap();
        assert_eq!(updated.cover_path, format!("books/{}/cover", book.id));
        assert!(updated.book_path.is_empty());

        let updated = f.service.upload_book_file(book.id, b"epub").await.unwrap();
        assert_eq!(updated.book_path, format!("books/{}/book", book.id));

        let cover = f.service.read_asset(book.id, AssetKind::Cover).await.unwrap();
        assert_eq!(cover, b"cover");
        let file = f.service.read_asset(book.id, AssetKind::Book).await.unwrap();
        assert_eq!(file, b"epub");
    }

    #[tokio::test]
    async fn test_read_asset_not_uploaded() {
        let f = fixture();
        let user = author(&f.repo, UserStatus::Active).await;
        let book = f.service.create_book(input(user.id)).await.unwrap();

        let result = f.service.read_asset(book.id, AssetKind::Cover).await;
        assert!(matches!(
            result,
            Err(DomainError::DoesNotExist { entity: "asset" })
        ));
    }

    #[tokio::test]
    async fn test_upload_to_unknown_book() {
        let f = fixture();
        let result = f.service.upload_cover(Uuid::new_v4(), b"cover").await;
        assert!(matches!(result, Err(DomainError::NotFound { entity: "book" })));

        let user = author(&f.repo, UserStatus::Active).await;
        let book = f.service.create_book(input(user.id)).await.unwrap();
        let result = f.service.upload_cover(book.id, b"").await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_book_removes_assets() {
        let f = fixture();
        let user = author(&f.repo, UserStatus::Active).await;
        let book = f.service.create_book(input(user.id)).await.unwrap();
        let updated = f.service.upload_cover(book.id, b"cover").await.unwrap();

        f.service.delete_book(book.id).await.unwrap();
        assert!(!f.dir.path().join(&updated.cover_path).exists());
        assert!(matches!(
            f.service.get_book(book.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_books_by_author() {
        let f = fixture();
        let user = author(&f.repo, UserStatus::Active).await;
        f.service.create_book(input(user.id)).await.unwrap();
        f.service.create_book(input(user.id)).await.unwrap();

        let books = f
            .service
            .list_books(&BookFilters {
                author_id: Some(user.id),
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(books.len(), 1);
    }
}
