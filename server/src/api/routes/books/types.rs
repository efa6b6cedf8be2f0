//! Book API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::types::{default_limit, validate_limit};
use crate::data::types::{BookChanges, BookFilters, BookRow, BookStatus};
use crate::domain::books::CreateBook;

/// Book DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct BookDto {
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

impl From<BookRow> for BookDto {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            author_id: row.author_id,
            book_path: row.book_path,
            cover_path: row.cover_path,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Compact book entry shown on a user profile
#[derive(Debug, Serialize, ToSchema)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub book_path: String,
    pub cover_path: String,
    pub created_at: DateTime<Utc>,
}

impl From<BookRow> for BookSummary {
    fn from(row: BookRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            book_path: row.book_path,
            cover_path: row.cover_path,
            created_at: row.created_at,
        }
    }
}

/// Query parameters for listing books
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListBooksQuery {
    pub id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub status: Option<BookStatus>,
    #[validate(length(max = 200, message = "Search must be at most 200 characters"))]
    pub search: Option<String>,
    /// `+field`, `-field` or `field`; one of title, status, created_at, updated_at
    pub order_by: Option<String>,
    #[serde(default = "default_limit")]
    #[validate(custom(function = "validate_limit"))]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

impl From<ListBooksQuery> for BookFilters {
    fn from(query: ListBooksQuery) -> Self {
        Self {
            book_id: query.id,
            author_id: query.author_id,
            status: query.status,
            search: query.search,
            order_by: query.order_by,
            limit: Some(query.limit),
            offset: Some(query.offset),
        }
    }
}

/// Request body for creating a book
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,
    pub author_id: Uuid,
}

impl From<CreateBookRequest> for CreateBook {
    fn from(req: CreateBookRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            author_id: req.author_id,
        }
    }
}

/// Request body for updating a book; omitted fields are unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
    pub author_id: Option<Uuid>,
    pub status: Option<BookStatus>,
}

impl From<UpdateBookRequest> for BookChanges {
    fn from(req: UpdateBookRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            author_id: req.author_id,
            status: req.status,
            ..Default::default()
        }
    }
}
