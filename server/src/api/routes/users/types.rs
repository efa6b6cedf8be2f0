//! User API types
//!
//! No type here carries the password hash. Request bodies that accept a
//! password hand it straight to the service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::routes::books::types::BookSummary;
use crate::api::types::{default_limit, validate_limit};
use crate::data::types::{UserChanges, UserFilters, UserRow, UserStatus};
use crate::domain::credential::MAX_SECRET_BYTES;
use crate::domain::users::{SignUp, UserProfile};

/// User DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub nickname: String,
    pub bio: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            nickname: row.nickname,
            bio: row.bio,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Public profile with the user's public books
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub nickname: String,
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub books: Vec<BookSummary>,
}

impl From<UserProfile> for UserProfileResponse {
    fn from(profile: UserProfile) -> Self {
        let UserProfile { user, books } = profile;
        Self {
            id: user.id,
            username: user.username,
            nickname: user.nickname,
            bio: user.bio,
            created_at: user.created_at,
            books: books.into_iter().map(BookSummary::from).collect(),
        }
    }
}

/// Query parameters for listing users
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    pub id: Option<Uuid>,
    pub status: Option<UserStatus>,
    #[validate(length(max = 200, message = "Search must be at most 200 characters"))]
    pub search: Option<String>,
    /// `+field`, `-field` or `field`; one of username, nickname, status, created_at, updated_at
    pub order_by: Option<String>,
    #[serde(default = "default_limit")]
    #[validate(custom(function = "validate_limit"))]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

impl From<ListUsersQuery> for UserFilters {
    fn from(query: ListUsersQuery) -> Self {
        Self {
            user_id: query.id,
            status: query.status,
            search: query.search,
            order_by: query.order_by,
            limit: Some(query.limit),
            offset: Some(query.offset),
        }
    }
}

/// Request body for signing up
#[derive(Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 64, message = "Nickname must be 1-64 characters"))]
    pub nickname: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: String,
    /// bcrypt only reads the first 72 bytes, so longer passwords are refused
    #[validate(
        length(min = 8, message = "Password must be at least 8 characters"),
        custom(function = "validate_password_bytes")
    )]
    pub password: String,
}

/// The hash limit counts bytes, not characters
fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_SECRET_BYTES {
        return Err(ValidationError::new("password_length").with_message(
            format!("Password must be at most {} bytes", MAX_SECRET_BYTES).into(),
        ));
    }
    Ok(())
}

impl From<SignUpRequest> for SignUp {
    fn from(req: SignUpRequest) -> Self {
        Self {
            username: req.username,
            nickname: req.nickname,
            email: req.email,
            bio: req.bio,
            password: req.password,
        }
    }
}

/// Request body for updating a user; omitted fields are unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: Option<String>,
    #[validate(length(min = 1, max = 64, message = "Nickname must be 1-64 characters"))]
    pub nickname: Option<String>,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            username: req.username,
            nickname: req.nickname,
            email: req.email,
            bio: req.bio,
            status: None,
        }
    }
}
