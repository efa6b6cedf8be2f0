//! Book API endpoints
//!
//! Covers and book files are uploaded as raw request bodies and served back
//! as `application/octet-stream`.

pub mod types;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderName, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::extractors::{IdPath, ValidatedJson, ValidatedQuery};
use crate::api::types::ApiError;
use crate::core::constants::MAX_UPLOAD_BYTES;
use crate::data::files::AssetKind;
use crate::domain::books::BookService;

use types::{BookDto, CreateBookRequest, ListBooksQuery, UpdateBookRequest};

/// Raw asset bytes with their content type
type AssetResponse = ([(HeaderName, &'static str); 1], Vec<u8>);

/// Shared state for Books API endpoints
#[derive(Clone)]
pub struct BooksApiState {
    pub books: BookService,
}

/// Build Books API routes
pub fn routes(books: BookService) -> Router<()> {
    let state = BooksApiState { books };

    let assets = Router::new()
        .route("/{id}/cover", get(get_cover).put(upload_cover))
        .route("/{id}/file", get(get_book_file).put(upload_book_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).patch(update_book).delete(delete_book))
        .merge(assets)
        .with_state(state)
}

/// List books
#[utoipa::path(
    get,
    path = "/api/v1/books",
    tag = "books",
    params(ListBooksQuery),
    responses(
        (status = 200, description = "Books matching the filters", body = Vec<BookDto>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_books(
    State(state): State<BooksApiState>,
    ValidatedQuery(query): ValidatedQuery<ListBooksQuery>,
) -> Result<Json<Vec<BookDto>>, ApiError> {
    let books = state.books.list_books(&query.into()).await?;
    Ok(Json(books.into_iter().map(BookDto::from).collect()))
}

/// Create a draft book
#[utoipa::path(
    post,
    path = "/api/v1/books",
    tag = "books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Author does not exist")
    )
)]
pub async fn create_book(
    State(state): State<BooksApiState>,
    ValidatedJson(body): ValidatedJson<CreateBookRequest>,
) -> Result<(StatusCode, Json<BookDto>), ApiError> {
    let book = state.books.create_book(body.into()).await?;
    Ok((StatusCode::CREATED, Json(BookDto::from(book))))
}

/// Get a book
#[utoipa::path(
    get,
    path = "/api/v1/books/{id}",
    tag = "books",
    params(("id" = uuid::Uuid, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book", body = BookDto),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<BooksApiState>,
    IdPath(id): IdPath,
) -> Result<Json<BookDto>, ApiError> {
    let book = state.books.get_book(id).await?;
    Ok(Json(BookDto::from(book)))
}

/// Update a book
#[utoipa::path(
    patch,
    path = "/api/v1/books/{id}",
    tag = "books",
    params(("id" = uuid::Uuid, Path, description = "Book id")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Book updated", body = BookDto),
        (status = 404, description = "Book or author not found")
    )
)]
pub async fn update_book(
    State(state): State<BooksApiState>,
    IdPath(id): IdPath,
    ValidatedJson(body): ValidatedJson<UpdateBookRequest>,
) -> Result<Json<BookDto>, ApiError> {
    let book = state.books.update_book(id, &body.into()).await?;
    Ok(Json(BookDto::from(book)))
}

/// Delete a book and its files
#[utoipa::path(
    delete,
    path = "/api/v1/books/{id}",
    tag = "books",
    params(("id" = uuid::Uuid, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<BooksApiState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    state.books.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload or replace the cover image
#[utoipa::path(
    put,
    path = "/api/v1/books/{id}/cover",
    tag = "books",
    params(("id" = uuid::Uuid, Path, description = "Book id")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Cover stored", body = BookDto),
        (status = 404, description = "Book not found")
    )
)]
pub async fn upload_cover(
    State(state): State<BooksApiState>,
    IdPath(id): IdPath,
    body: Bytes,
) -> Result<Json<BookDto>, ApiError> {
    let book = state.books.upload_cover(id, &body).await?;
    Ok(Json(BookDto::from(book)))
}

/// Download the cover image
#[utoipa::path(
    get,
    path = "/api/v1/books/{id}/cover",
    tag = "books",
    params(("id" = uuid::Uuid, Path, description = "Book id")),
    responses(
        (status = 200, description = "Cover bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Book or cover not found")
    )
)]
pub async fn get_cover(
    State(state): State<BooksApiState>,
    IdPath(id): IdPath,
) -> Result<AssetResponse, ApiError> {
    serve_asset(&state, id, AssetKind::Cover).await
}

/// Upload or replace the book file
#[utoipa::path(
    put,
    path = "/api/v1/books/{id}/file",
    tag = "books",
    params(("id" = uuid::Uuid, Path, description = "Book id")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Book file stored", body = BookDto),
        (status = 404, description = "Book not found")
    )
)]
pub async fn upload_book_file(
    State(state): State<BooksApiState>,
    IdPath(id): IdPath,
    body: Bytes,
) -> Result<Json<BookDto>, ApiError> {
    let book = state.books.upload_book_file(id, &body).await?;
    Ok(Json(BookDto::from(book)))
}

/// Download the book file
#[utoipa::path(
    get,
    path = "/api/v1/books/{id}/file",
    tag = "books",
    params(("id" = uuid::Uuid, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book file bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Book or file not found")
    )
)]
pub async fn get_book_file(
    State(state): State<BooksApiState>,
    IdPath(id): IdPath,
) -> Result<AssetResponse, ApiError> {
    serve_asset(&state, id, AssetKind::Book).await
}

async fn serve_asset(
    state: &BooksApiState,
    id: uuid::Uuid,
    kind: AssetKind,
) -> Result<AssetResponse, ApiError> {
    let data = state.books.read_asset(id, kind).await?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], data))
}
