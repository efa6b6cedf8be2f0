//! User repository for PostgreSQL operations

use sqlx::PgPool;
use uuid::Uuid;

use super::bind_params;
use crate::data::filters::CompiledClause;
use crate::data::postgres::PostgresError;
use crate::data::types::{NewUser, UserChanges, UserRow, UserStatus};

/// Columns including the password hash (credential lookups only)
const CREDENTIAL_COLUMNS: &str = r#""id", "username", "nickname", "email", "bio", "password", "status", "created_at", "updated_at""#;

/// Columns with the password replaced by NULL, which decodes to `Credential::Absent`
const PUBLIC_COLUMNS: &str = r#""id", "username", "nickname", "email", "bio", NULL::text AS "password", "status", "created_at", "updated_at""#;

/// List users; `clause` is appended to the base select
pub async fn filter_users(
    pool: &PgPool,
    clause: &CompiledClause,
) -> Result<Vec<UserRow>, PostgresError> {
    let sql = clause.apply_to(&format!(r#"SELECT {} FROM "users""#, PUBLIC_COLUMNS));
    let rows = bind_params(sqlx::query_as::<_, UserRow>(&sql), &clause.params)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Create a user with a generated UUID
pub async fn create_user(pool: &PgPool, user: &NewUser) -> Result<UserRow, PostgresError> {
    let id = Uuid::new_v4();

    let sql = format!(
        r#"INSERT INTO "users" ("id", "username", "nickname", "email", "bio", "password", "status")
           VALUES ($1, $2, $3, lower($4), $5, $6, $7)
           RETURNING {}"#,
        PUBLIC_COLUMNS
    );

    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(id)
        .bind(&user.username)
        .bind(&user.nickname)
        .bind(&user.email)
        .bind(&user.bio)
        .bind(&user.password)
        .bind(user.status)
        .fetch_one(pool)
        .await
        .map_err(|e| PostgresError::from_write(e, "user"))?;

    tracing::debug!(id = %row.id, username = %row.username, "User created");
    Ok(row)
}

/// Get a user with its password hash by username
pub async fn get_credentials_by_username(
    pool: &PgPool,
    username: &str,
    status: UserStatus,
) -> Result<Option<UserRow>, PostgresError> {
    let sql = format!(
        r#"SELECT {} FROM "users" WHERE "username" = $1 AND "status" = $2"#,
        CREDENTIAL_COLUMNS
    );
    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(username)
        .bind(status)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Get a user with its password hash by email (case-insensitive)
pub async fn get_credentials_by_email(
    pool: &PgPool,
    email: &str,
    status: UserStatus,
) -> Result<Option<UserRow>, PostgresError> {
    let sql = format!(
        r#"SELECT {} FROM "users" WHERE "email" = lower($1) AND "status" = $2"#,
        CREDENTIAL_COLUMNS
    );
    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(email)
        .bind(status)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn get_by_username(
    pool: &PgPool,
    username: &str,
    status: UserStatus,
) -> Result<Option<UserRow>, PostgresError> {
    let sql = format!(
        r#"SELECT {} FROM "users" WHERE "username" = $1 AND "status" = $2"#,
        PUBLIC_COLUMNS
    );
    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(username)
        .bind(status)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn get_by_id(
    pool: &PgPool,
    id: Uuid,
    status: UserStatus,
) -> Result<Option<UserRow>, PostgresError> {
    let sql = format!(
        r#"SELECT {} FROM "users" WHERE "id" = $1 AND "status" = $2"#,
        PUBLIC_COLUMNS
    );
    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Update the set fields of a user in the given status
pub async fn update_user(
    pool: &PgPool,
    id: Uuid,
    status: UserStatus,
    changes: &UserChanges,
) -> Result<Option<UserRow>, PostgresError> {
    let sql = format!(
        r#"UPDATE "users" SET
               "username" = COALESCE($1, "username"),
               "nickname" = COALESCE($2, "nickname"),
               "email" = COALESCE(lower($3), "email"),
               "bio" = COALESCE($4, "bio"),
               "status" = COALESCE($5, "status"),
               "updated_at" = now()
           WHERE "id" = $6 AND "status" = $7
           RETURNING {}"#,
        PUBLIC_COLUMNS
    );

    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(changes.username.as_deref())
        .bind(changes.nickname.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.bio.as_deref())
        .bind(changes.status)
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
        .map_err(|e| PostgresError::from_write(e, "user"))?;

    if let Some(ref user) = row {
        tracing::debug!(id = %user.id, "User updated");
    }
    Ok(row)
}

/// Delete a user in the given status, returning the removed row
pub async fn delete_user(
    pool: &PgPool,
    id: Uuid,
    status: UserStatus,
) -> Result<Option<UserRow>, PostgresError> {
    let sql = format!(
        r#"DELETE FROM "users" WHERE "id" = $1 AND "status" = $2 RETURNING {}"#,
        PUBLIC_COLUMNS
    );
    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await?;

    if row.is_some() {
        tracing::debug!(%id, "User deleted");
    }
    Ok(row)
}
