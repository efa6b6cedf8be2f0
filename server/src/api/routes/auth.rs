//! Sign-in endpoint

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::routes::users::types::UserSummary;
use crate::api::types::ApiError;
use crate::domain::users::UserService;

#[derive(Clone)]
pub struct AuthApiState {
    pub users: UserService,
}

/// Build auth routes
pub fn routes(users: UserService) -> Router<()> {
    Router::new()
        .route("/sign-in", post(sign_in))
        .with_state(AuthApiState { users })
}

/// Sign-in credentials. `login` is a username or an email address.
#[derive(Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[serde(alias = "username", alias = "email")]
    #[validate(length(min = 1, max = 254, message = "Login is required"))]
    pub login: String,
    #[validate(length(min = 1, max = 72, message = "Password is required"))]
    pub password: String,
}

/// Check credentials of an active user
#[utoipa::path(
    post,
    path = "/api/v1/auth/sign-in",
    tag = "auth",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = UserSummary),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn sign_in(
    State(state): State<AuthApiState>,
    ValidatedJson(body): ValidatedJson<SignInRequest>,
) -> Result<Json<UserSummary>, ApiError> {
    let user = state.users.sign_in(&body.login, &body.password).await?;
    tracing::debug!(id = %user.id, "User signed in");
    Ok(Json(UserSummary::from(user)))
}
