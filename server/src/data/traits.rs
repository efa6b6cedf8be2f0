//! Repository traits
//!
//! Services talk to storage only through these traits. PostgreSQL is the
//! production implementation; tests use an in-memory one.

use async_trait::async_trait;
use uuid::Uuid;

use crate::data::error::DataError;
use crate::data::types::{
    BookChanges, BookFilters, BookRow, NewBook, NewUser, UserChanges, UserFilters, UserRow,
    UserStatus,
};

/// Repository trait for user operations
///
/// Lookups that match nothing return `DataError::NotFound`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List users matching the criteria. The password is never loaded.
    async fn filter_users(&self, filters: &UserFilters) -> Result<Vec<UserRow>, DataError>;

    /// Insert a user. Email is stored lower-cased.
    async fn create_user(&self, user: &NewUser) -> Result<UserRow, DataError>;

    /// Load a user with a given status, including the password hash
    async fn get_credentials_by_username(
        &self,
        username: &str,
        status: UserStatus,
    ) -> Result<UserRow, DataError>;

    /// Load a user by case-insensitive email, including the password hash
    async fn get_credentials_by_email(
        &self,
        email: &str,
        status: UserStatus,
    ) -> Result<UserRow, DataError>;

    async fn get_user_by_username(
        &self,
        username: &str,
        status: UserStatus,
    ) -> Result<UserRow, DataError>;

    async fn get_user(&self, id: Uuid, status: UserStatus) -> Result<UserRow, DataError>;

    /// Apply the set fields of `changes` to a user currently in `status`
    async fn update_user(
        &self,
        id: Uuid,
        status: UserStatus,
        changes: &UserChanges,
    ) -> Result<UserRow, DataError>;

    /// Delete a user currently in `status` and return the removed row
    async fn delete_user(&self, id: Uuid, status: UserStatus) -> Result<UserRow, DataError>;
}

/// Repository trait for book operations
#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn filter_books(&self, filters: &BookFilters) -> Result<Vec<BookRow>, DataError>;

    /// Insert a book. An unknown author is `DataError::DoesNotExist`.
    async fn create_book(&self, book: &NewBook) -> Result<BookRow, DataError>;

    async fn get_book(&self, id: Uuid) -> Result<BookRow, DataError>;

    async fn update_book(&self, id: Uuid, changes: &BookChanges) -> Result<BookRow, DataError>;

    /// Delete a book and return the removed row
    async fn delete_book(&self, id: Uuid) -> Result<BookRow, DataError>;
}
