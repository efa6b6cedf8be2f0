//! User service
//!
//! Sign-up hashes the password on a blocking thread and stores the user as
//! unverified. Sign-in only considers active users and reports every failure
//! the same way, so callers cannot probe which usernames exist.

use std::sync::Arc;

use uuid::Uuid;

use super::credential::{Credential, CredentialError, MAX_SECRET_BYTES};
use super::error::DomainError;
use crate::data::error::DataError;
use crate::data::traits::{BookRepository, UserRepository};
use crate::data::types::{
    BookFilters, BookRow, BookStatus, NewUser, UserChanges, UserFilters, UserRow, UserStatus,
};

/// Input for creating an account
#[derive(Clone)]
pub struct SignUp {
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub bio: String,
    pub password: String,
}

/// An active user together with their public books
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: UserRow,
    pub books: Vec<BookRow>,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    books: Arc<dyn BookRepository>,
    password_cost: u32,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        books: Arc<dyn BookRepository>,
        password_cost: u32,
    ) -> Self {
        Self {
            users,
            books,
            password_cost,
        }
    }

    pub async fn list_users(&self, filters: &UserFilters) -> Result<Vec<UserRow>, DomainError> {
        Ok(self.users.filter_users(filters).await?)
    }

    /// Create an unverified account
    pub async fn sign_up(&self, input: SignUp) -> Result<UserRow, DomainError> {
        if input.password.trim().is_empty() {
            return Err(DomainError::Validation("password must not be blank".into()));
        }
        if input.password.len() > MAX_SECRET_BYTES {
            return Err(DomainError::Validation(format!(
                "password must be at most {} bytes",
                MAX_SECRET_BYTES
            )));
        }

        let cost = self.password_cost;
        let password = input.password;
        let credential =
            tokio::task::spawn_blocking(move || Credential::create_with_cost(&password, cost))
                .await
                .map_err(|e| CredentialError::Hashing(e.to_string()))??;

        let new_user = NewUser {
            username: input.username,
            nickname: input.nickname,
            email: input.email,
            bio: input.bio,
            password: credential,
            status: UserStatus::Unverified,
        };
        let user = self.users.create_user(&new_user).await?;
        tracing::debug!(id = %user.id, "User signed up");
        Ok(user)
    }

    /// Check a login (username, or email when it contains `@`) and password
    /// against the active users.
    pub async fn sign_in(&self, login: &str, password: &str) -> Result<UserRow, DomainError> {
        let login = login.trim();
        let found = if login.contains('@') {
            self.users
                .get_credentials_by_email(login, UserStatus::Active)
                .await
        } else {
            self.users
                .get_credentials_by_username(login, UserStatus::Active)
                .await
        };

        let mut user = match found {
            Ok(user) => user,
            Err(DataError::NotFound { .. }) => return Err(DomainError::InvalidCredentials),
            // A corrupt stored hash must look like any other failed sign-in
            Err(e) if e.is_decode() => {
                tracing::warn!(error = %e, "Stored credential could not be decoded");
                return Err(DomainError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        let stored = std::mem::replace(&mut user.password, Credential::Absent);
        let candidate = password.to_string();
        let verified = tokio::task::spawn_blocking(move || stored.verify(&candidate))
            .await
            .unwrap_or(false);

        if !verified {
            tracing::debug!(id = %user.id, "Sign-in rejected");
            return Err(DomainError::InvalidCredentials);
        }
        Ok(user)
    }

    /// Public profile: an active user and their public books, newest first
    pub async fn user_profile(&self, username: &str) -> Result<UserProfile, DomainError> {
        let user = self
            .users
            .get_user_by_username(username, UserStatus::Active)
            .await?;
        let books = self
            .books
            .filter_books(&BookFilters {
                author_id: Some(user.id),
                status: Some(BookStatus::Public),
                order_by: Some("-created_at".to_string()),
                ..Default::default()
            })
            .await?;
        Ok(UserProfile { user, books })
    }

    /// Update an active user
    pub async fn update_user(
        &self,
        id: Uuid,
        changes: &UserChanges,
    ) -> Result<UserRow, DomainError> {
        let user = self
            .users
            .update_user(id, UserStatus::Active, changes)
            .await?;
        tracing::debug!(id = %user.id, "User updated");
        Ok(user)
    }

    /// Delete an active user; their books go with them
    pub async fn delete_user(&self, id: Uuid) -> Result<UserRow, DomainError> {
        let user = self.users.delete_user(id, UserStatus::Active).await?;
        tracing::debug!(id = %user.id, "User deleted");
        Ok(user)
    }
}
