//! User API endpoints

pub mod types;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::api::extractors::{IdPath, ValidatedJson, ValidatedQuery};
use crate::api::types::ApiError;
use crate::domain::users::UserService;

use types::{ListUsersQuery, SignUpRequest, UpdateUserRequest, UserProfileResponse, UserSummary};

/// Shared state for Users API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub users: UserService,
}

/// Build Users API routes
pub fn routes(users: UserService) -> Router<()> {
    let state = UsersApiState { users };

    Router::new()
        .route("/", get(list_users).post(sign_up))
        .route("/{username}", get(get_user_profile))
        .route("/id/{id}", patch(update_user).delete(delete_user))
        .with_state(state)
}

/// List users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users matching the filters", body = Vec<UserSummary>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_users(
    State(state): State<UsersApiState>,
    ValidatedQuery(query): ValidatedQuery<ListUsersQuery>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = state.users.list_users(&query.into()).await?;
    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}

/// Sign up a new (unverified) user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "User created", body = UserSummary),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Username or email already in use")
    )
)]
pub async fn sign_up(
    State(state): State<UsersApiState>,
    ValidatedJson(body): ValidatedJson<SignUpRequest>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    let user = state.users.sign_up(body.into()).await?;
    Ok((StatusCode::CREATED, Json(UserSummary::from(user))))
}

/// Public profile of an active user
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User profile with public books", body = UserProfileResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_profile(
    State(state): State<UsersApiState>,
    Path(username): Path<String>,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let profile = state.users.user_profile(&username).await?;
    Ok(Json(UserProfileResponse::from(profile)))
}

/// Update an active user
#[utoipa::path(
    patch,
    path = "/api/v1/users/id/{id}",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserSummary),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username or email already in use")
    )
)]
pub async fn update_user(
    State(state): State<UsersApiState>,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserSummary>, ApiError> {
    let user = state.users.update_user(id, &body.into()).await?;
    Ok(Json(UserSummary::from(user)))
}

/// Delete an active user and their books
#[utoipa::path(
    delete,
    path = "/api/v1/users/id/{id}",
    tag = "users",
    params(("id" = uuid::Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<UsersApiState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    state.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
