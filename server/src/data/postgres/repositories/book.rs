//! Book repository for PostgreSQL operations

use sqlx::PgPool;
use uuid::Uuid;

use super::bind_params;
use crate::data::filters::CompiledClause;
use crate::data::postgres::PostgresError;
use crate::data::types::{BookChanges, BookRow, NewBook};

const BOOK_COLUMNS: &str = r#""id", "title", "description", "author_id", "book_path", "cover_path", "status", "created_at", "updated_at""#;

/// List books; `clause` is appended to the base select
pub async fn filter_books(
    pool: &PgPool,
    clause: &CompiledClause,
) -> Result<Vec<BookRow>, PostgresError> {
    let sql = clause.apply_to(&format!(r#"SELECT {} FROM "books""#, BOOK_COLUMNS));
    let rows = bind_params(sqlx::query_as::<_, BookRow>(&sql), &clause.params)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Create a book with a generated UUID and empty asset paths
pub async fn create_book(pool: &PgPool, book: &NewBook) -> Result<BookRow, PostgresError> {
    let id = Uuid::new_v4();

    let sql = format!(
        r#"INSERT INTO "books" ("id", "title", "description", "author_id", "status")
           VALUES ($1, $2, $3, $4, $5)
           RETURNING {}"#,
        BOOK_COLUMNS
    );

    let row = sqlx::query_as::<_, BookRow>(&sql)
        .bind(id)
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.author_id)
        .bind(book.status)
        .fetch_one(pool)
        .await
        .map_err(|e| PostgresError::from_write(e, "user"))?;

    tracing::debug!(id = %row.id, author_id = %row.author_id, "Book created");
    Ok(row)
}

pub async fn get_book(pool: &PgPool, id: Uuid) -> Result<Option<BookRow>, PostgresError> {
    let sql = format!(r#"SELECT {} FROM "books" WHERE "id" = $1"#, BOOK_COLUMNS);
    let row = sqlx::query_as::<_, BookRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Update the set fields of a book
pub async fn update_book(
    pool: &PgPool,
    id: Uuid,
    changes: &BookChanges,
) -> Result<Option<BookRow>, PostgresError> {
    let sql = format!(
        r#"UPDATE "books" SET
               "title" = COALESCE($1, "title"),
               "description" = COALESCE($2, "description"),
               "author_id" = COALESCE($3, "author_id"),
               "book_path" = COALESCE($4, "book_path"),
               "cover_path" = COALESCE($5, "cover_path"),
               "status" = COALESCE($6, "status"),
               "updated_at" = now()
           WHERE "id" = $7
           RETURNING {}"#,
        BOOK_COLUMNS
    );

    let row = sqlx::query_as::<_, BookRow>(&sql)
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.author_id)
        .bind(changes.book_path.as_deref())
        .bind(changes.cover_path.as_deref())
        .bind(changes.status)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| PostgresError::from_write(e, "user"))?;

    if row.is_some() {
        tracing::debug!(%id, "Book updated");
    }
    Ok(row)
}

/// Delete a book, returning the removed row
pub async fn delete_book(pool: &PgPool, id: Uuid) -> Result<Option<BookRow>, PostgresError> {
    let sql = format!(
        r#"DELETE FROM "books" WHERE "id" = $1 RETURNING {}"#,
        BOOK_COLUMNS
    );
    let row = sqlx::query_as::<_, BookRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    if row.is_some() {
        tracing::debug!(%id, "Book deleted");
    }
    Ok(row)
}
