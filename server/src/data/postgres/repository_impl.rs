//! Repository trait implementations for PostgreSQL

use async_trait::async_trait;
use uuid::Uuid;

use super::PostgresService;
use super::repositories::{book, user};
use crate::data::error::DataError;
use crate::data::traits::{BookRepository, UserRepository};
use crate::data::types::{
    BookChanges, BookFilters, BookRow, NewBook, NewUser, UserChanges, UserFilters, UserRow,
    UserStatus,
};

#[async_trait]
impl UserRepository for PostgresService {
    async fn filter_users(&self, filters: &UserFilters) -> Result<Vec<UserRow>, DataError> {
        let clause = filters.compile()?;
        Ok(user::filter_users(self.pool(), &clause).await?)
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<UserRow, DataError> {
        Ok(user::create_user(self.pool(), new_user).await?)
    }

    async fn get_credentials_by_username(
        &self,
        username: &str,
        status: UserStatus,
    ) -> Result<UserRow, DataError> {
        user::get_credentials_by_username(self.pool(), username, status)
            .await?
            .ok_or_else(|| DataError::not_found("user"))
    }

    async fn get_credentials_by_email(
        &self,
        email: &str,
        status: UserStatus,
    ) -> Result<UserRow, DataError> {
        user::get_credentials_by_email(self.pool(), email, status)
            .await?
            .ok_or_else(|| DataError::not_found("user"))
    }

    async fn get_user_by_username(
        &self,
        username: &str,
        status: UserStatus,
    ) -> Result<UserRow, DataError> {
        user::get_by_username(self.pool(), username, status)
            .await?
            .ok_or_else(|| DataError::not_found("user"))
    }

    async fn get_user(&self, id: Uuid, status: UserStatus) -> Result<UserRow, DataError> {
        user::get_by_id(self.pool(), id, status)
            .await?
            .ok_or_else(|| DataError::not_found("user"))
    }

    async fn update_user(
        &self,
        id: Uuid,
        status: UserStatus,
        changes: &UserChanges,
    ) -> Result<UserRow, DataError> {
        user::update_user(self.pool(), id, status, changes)
            .await?
            .ok_or_else(|| DataError::not_found("user"))
    }

    async fn delete_user(&self, id: Uuid, status: UserStatus) -> Result<UserRow, DataError> {
        user::delete_user(self.pool(), id, status)
            .await?
            .ok_or_else(|| DataError::not_found("user"))
    }
}

#[async_trait]
impl BookRepository for PostgresService {
    async fn filter_books(&self, filters: &BookFilters) -> Result<Vec<BookRow>, DataError> {
        let clause = filters.compile()?;
        Ok(book::filter_books(self.pool(), &clause).await?)
    }

    async fn create_book(&self, new_book: &NewBook) -> Result<BookRow, DataError> {
        Ok(book::create_book(self.pool(), new_book).await?)
    }

    async fn get_book(&self, id: Uuid) -> Result<BookRow, DataError> {
        book::get_book(self.pool(), id)
            .await?
            .ok_or_else(|| DataError::not_found("book"))
    }

    async fn update_book(&self, id: Uuid, changes: &BookChanges) -> Result<BookRow, DataError> {
        book::update_book(self.pool(), id, changes)
            .await?
            .ok_or_else(|| DataError::not_found("book"))
    }

    async fn delete_book(&self, id: Uuid) -> Result<BookRow, DataError> {
        book::delete_book(self.pool(), id)
            .await?
            .ok_or_else(|| DataError::not_found("book"))
    }
}
