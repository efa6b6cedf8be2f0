//! PostgreSQL repositories
//!
//! Free functions over a `PgPool`, one module per table. Lookups return
//! `Option` and leave the not-found decision to the caller.

pub mod book;
pub mod user;

use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;

use crate::data::filters::BindValue;

/// Bind compiled filter parameters in placeholder order
pub(crate) fn bind_params<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q [BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for param in params {
        query = match param {
            BindValue::Uuid(value) => query.bind(*value),
            BindValue::SmallInt(value) => query.bind(*value),
            BindValue::BigInt(value) => query.bind(*value),
            BindValue::Text(value) => query.bind(value.as_str()),
        };
    }
    query
}
