//! OpenAPI specification and Swagger UI

use axum::http::header;
use axum::response::{Html, IntoResponse, Json};
use utoipa::OpenApi;

use crate::api::routes::auth::SignInRequest;
use crate::api::routes::books::types::{BookDto, BookSummary, CreateBookRequest, UpdateBookRequest};
use crate::api::routes::health::HealthResponse;
use crate::api::routes::users::types::{
    SignUpRequest, UpdateUserRequest, UserProfileResponse, UserSummary,
};
use crate::api::routes::{auth, books, health, users};
use crate::data::types::{BookStatus, UserStatus};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Users, books and book files"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "auth", description = "Sign-in"),
        (name = "users", description = "Sign-up, profiles and user management"),
        (name = "books", description = "Books, covers and book files")
    ),
    paths(
        health::health,
        auth::sign_in,
        users::list_users,
        users::sign_up,
        users::get_user_profile,
        users::update_user,
        users::delete_user,
        books::list_books,
        books::create_book,
        books::get_book,
        books::update_book,
        books::delete_book,
        books::upload_cover,
        books::get_cover,
        books::upload_book_file,
        books::get_book_file,
    ),
    components(schemas(
        HealthResponse,
        SignInRequest,
        SignUpRequest,
        UpdateUserRequest,
        UserSummary,
        UserProfileResponse,
        UserStatus,
        BookDto,
        BookSummary,
        CreateBookRequest,
        UpdateBookRequest,
        BookStatus,
    ))
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
pub async fn openapi_json() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        Json(ApiDoc::openapi()),
    )
}

/// Serve Swagger UI from CDN
pub async fn swagger_ui_html() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Bookshelf API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        html { box-sizing: border-box; overflow-y: scroll; }
        *, *:before, *:after { box-sizing: inherit; }
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "/api/openapi.json",
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout",
                deepLinking: true,
                showExtensions: true,
                showCommonExtensions: true
            });
        };
    </script>
</body>
</html>"#;
