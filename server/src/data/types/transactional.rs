//! Row, input and criteria types for users and books

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::enums::{BookStatus, UserStatus};
use crate::data::filters::{ClauseBuilder, CompiledClause, FilterError, columns};
use crate::domain::credential::Credential;

// ============================================================================
// User types
// ============================================================================

/// User row from database
///
/// `password` is `Credential::Absent` for rows loaded by queries that do not
/// select the hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub bio: String,
    pub password: Credential,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub nickname: String,
    pub email: String,
    pub bio: String,
    pub password: Credential,
    pub status: UserStatus,
}

/// Partial user update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub status: Option<UserStatus>,
}

/// List criteria for users
#[derive(Debug, Clone, Default)]
pub struct UserFilters {
    pub user_id: Option<Uuid>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
    /// `+field`, `-field` or `field`
    pub order_by: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl UserFilters {
    /// Compile into a clause for the user list query
    pub fn compile(&self) -> Result<CompiledClause, FilterError> {
        Ok(ClauseBuilder::new()
            .eq("id", non_nil(self.user_id))
            .eq("status", self.status)
            .search(columns::USER_SEARCHABLE, self.search.as_deref())
            .sort(self.order_by.as_deref(), columns::USER_SORTABLE)?
            .limit(self.limit)
            .offset(self.offset)
            .build())
    }
}

// ============================================================================
// Book types
// ============================================================================

/// Book row from database
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BookRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub author_id: Uuid,
    pub book_path: String,
    pub cover_path: String,
    pub status: BookStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a book
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub description: String,
    pub author_id: Uuid,
    pub status: BookStatus,
}

/// Partial book update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct BookChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author_id: Option<Uuid>,
    pub book_path: Option<String>,
    pub cover_path: Option<String>,
    pub status: Option<BookStatus>,
}

/// List criteria for books
#[derive(Debug, Clone, Default)]
pub struct BookFilters {
    pub book_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub status: Option<BookStatus>,
    pub search: Option<String>,
    /// `+field`, `-field` or `field`
    pub order_by: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl BookFilters {
    /// Compile into a clause for the book list query
    pub fn compile(&self) -> Result<CompiledClause, FilterError> {
        Ok(ClauseBuilder::new()
            .eq("id", non_nil(self.book_id))
            .eq("author_id", non_nil(self.author_id))
            .eq("status", self.status)
            .search(columns::BOOK_SEARCHABLE, self.search.as_deref())
            .sort(self.order_by.as_deref(), columns::BOOK_SORTABLE)?
            .limit(self.limit)
            .offset(self.offset)
            .build())
    }
}

/// The nil UUID means "not set"
fn non_nil(id: Option<Uuid>) -> Option<Uuid> {
    id.filter(|id| !id.is_nil())
}
