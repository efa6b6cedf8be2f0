//! PostgreSQL schema definitions
//!
//! Applied at startup. Every statement is idempotent; there is no versioned
//! migration history.

use sqlx::PgPool;

use super::error::PostgresError;

/// Complete schema SQL for PostgreSQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Users
-- =============================================================================
CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    username TEXT NOT NULL UNIQUE CHECK(length(username) >= 1 AND length(username) <= 64),
    nickname TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL UNIQUE,
    bio TEXT NOT NULL DEFAULT '',
    password TEXT,
    status SMALLINT NOT NULL CHECK(status BETWEEN 1 AND 4),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS idx_users_status ON users(status);

-- =============================================================================
-- Books
-- =============================================================================
CREATE TABLE IF NOT EXISTS books (
    id UUID PRIMARY KEY,
    title TEXT NOT NULL CHECK(length(title) >= 1 AND length(title) <= 200),
    description TEXT NOT NULL DEFAULT '',
    author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    book_path TEXT NOT NULL DEFAULT '',
    cover_path TEXT NOT NULL DEFAULT '',
    status SMALLINT NOT NULL CHECK(status BETWEEN 1 AND 4),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX IF NOT EXISTS idx_books_author ON books(author_id);
CREATE INDEX IF NOT EXISTS idx_books_status ON books(status);
"#;

/// Create tables and indexes that do not exist yet
pub async fn apply_schema(pool: &PgPool) -> Result<(), PostgresError> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    tracing::debug!("PostgreSQL schema applied");
    Ok(())
}
