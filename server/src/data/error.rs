//! Unified error type for the data layer

use thiserror::Error;

use crate::data::filters::FilterError;

/// Unified error type for data layer operations
#[derive(Error, Debug)]
pub enum DataError {
    /// PostgreSQL driver error
    #[error("PostgreSQL error: {0}")]
    Postgres(sqlx::Error),

    /// The lookup ran but matched nothing
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A referenced resource is absent or not accessible
    #[error("{entity} does not exist")]
    DoesNotExist { entity: &'static str },

    /// Unique constraint violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// List criteria could not be compiled
    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn does_not_exist(entity: &'static str) -> Self {
        Self::DoesNotExist { entity }
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "resource_not_found",
            Self::DoesNotExist { .. } => "resource_does_not_exist",
            Self::Conflict(_) => "resource_already_exist",
            Self::Filter(_) => "invalid_filter",
            Self::Postgres(_) | Self::Config(_) | Self::Io(_) => "internal",
        }
    }

    /// Check if this is a connection-related error that might be transient
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Postgres(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            ),
            _ => false,
        }
    }

    /// A stored column value could not be decoded into its Rust type
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Postgres(sqlx::Error::ColumnDecode { .. }))
    }
}

impl From<crate::data::postgres::PostgresError> for DataError {
    fn from(e: crate::data::postgres::PostgresError) -> Self {
        match e {
            crate::data::postgres::PostgresError::Database(e) => Self::Postgres(e),
            crate::data::postgres::PostgresError::Config(msg) => Self::Config(msg),
            crate::data::postgres::PostgresError::Io(e) => Self::Io(e),
            crate::data::postgres::PostgresError::Conflict(msg) => Self::Conflict(msg),
            crate::data::postgres::PostgresError::MissingReference { entity } => {
                Self::DoesNotExist { entity }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::postgres::PostgresError;

    #[test]
    fn test_not_found_display_and_code() {
        let err = DataError::not_found("book");
        assert_eq!(err.to_string(), "book not found");
        assert_eq!(err.code(), "resource_not_found");
    }

    #[test]
    fn test_does_not_exist_code() {
        let err = DataError::does_not_exist("user");
        assert_eq!(err.to_string(), "user does not exist");
        assert_eq!(err.code(), "resource_does_not_exist");
    }

    #[test]
    fn test_conflict_code() {
        let err = DataError::Conflict("username taken".into());
        assert_eq!(err.code(), "resource_already_exist");
    }

    #[test]
    fn test_filter_error_converts() {
        let err: DataError = FilterError::InvalidSortField {
            field: "password".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Invalid filter: Cannot sort by 'password'");
        assert_eq!(err.code(), "invalid_filter");
    }

    #[test]
    fn test_from_postgres_error() {
        let err: DataError = PostgresError::Conflict("email taken".into()).into();
        assert!(matches!(err, DataError::Conflict(_)));

        let err: DataError = PostgresError::MissingReference { entity: "user" }.into();
        assert!(matches!(err, DataError::DoesNotExist { entity: "user" }));

        let err: DataError = PostgresError::Database(sqlx::Error::PoolTimedOut).into();
        assert!(err.is_transient());
    }

    #[test]
    fn test_is_transient() {
        assert!(DataError::Postgres(sqlx::Error::PoolClosed).is_transient());
        assert!(!DataError::Postgres(sqlx::Error::RowNotFound).is_transient());
        assert!(!DataError::Config("bad config".into()).is_transient());
    }

    #[test]
    fn test_is_decode() {
        let err = DataError::Postgres(sqlx::Error::ColumnDecode {
            index: "\"password\"".into(),
            source: "not a bcrypt hash".into(),
        });
        assert!(err.is_decode());
        assert!(!err.is_transient());
        assert!(!DataError::Postgres(sqlx::Error::PoolClosed).is_decode());
    }
}
