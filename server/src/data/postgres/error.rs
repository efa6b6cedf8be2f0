//! PostgreSQL error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostgresError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Foreign key points at a row that is not there
    #[error("Referenced {entity} does not exist")]
    MissingReference { entity: &'static str },
}

impl PostgresError {
    /// Map constraint violations to typed errors, everything else to `Database`
    pub fn from_write(e: sqlx::Error, referenced: &'static str) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                let what = db_err.constraint().unwrap_or("unique constraint");
                return Self::Conflict(format!("{} already in use", what));
            }
            if db_err.is_foreign_key_violation() {
                return Self::MissingReference { entity: referenced };
            }
        }
        Self::Database(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = PostgresError::Config("missing URL".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing URL");
    }

    #[test]
    fn test_missing_reference_display() {
        let err = PostgresError::MissingReference { entity: "user" };
        assert_eq!(err.to_string(), "Referenced user does not exist");
    }

    #[test]
    fn test_from_write_passes_through_non_constraint_errors() {
        let err = PostgresError::from_write(sqlx::Error::RowNotFound, "user");
        assert!(matches!(err, PostgresError::Database(sqlx::Error::RowNotFound)));
    }
}
