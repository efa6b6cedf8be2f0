//! Service-level error type

use thiserror::Error;

use super::credential::CredentialError;
use crate::data::error::DataError;
use crate::data::files::AssetError;
use crate::data::filters::FilterError;

/// Errors returned by the domain services
#[derive(Error, Debug)]
pub enum DomainError {
    /// Input rejected by a service rule
    #[error("{0}")]
    Validation(String),

    /// Sign-in failed. Carries no detail on purpose.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{entity} does not exist")]
    DoesNotExist { entity: &'static str },

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Filter(FilterError),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Data error: {0}")]
    Data(DataError),

    #[error("Asset error: {0}")]
    Asset(AssetError),
}

impl From<DataError> for DomainError {
    fn from(e: DataError) -> Self {
        match e {
            DataError::NotFound { entity } => Self::NotFound { entity },
            DataError::DoesNotExist { entity } => Self::DoesNotExist { entity },
            DataError::Conflict(msg) => Self::Conflict(msg),
            DataError::Filter(e) => Self::Filter(e),
            other => Self::Data(other),
        }
    }
}

impl From<AssetError> for DomainError {
    fn from(e: AssetError) -> Self {
        match e {
            AssetError::NotFound { .. } => Self::DoesNotExist { entity: "asset" },
            other => Self::Asset(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_outcomes_keep_their_kind() {
        assert!(matches!(
            DomainError::from(DataError::not_found("book")),
            DomainError::NotFound { entity: "book" }
        ));
        assert!(matches!(
            DomainError::from(DataError::does_not_exist("user")),
            DomainError::DoesNotExist { entity: "user" }
        ));
        assert!(matches!(
            DomainError::from(DataError::Conflict("users_email_key already in use".into())),
            DomainError::Conflict(_)
        ));
        let filter = FilterError::InvalidSortField {
            field: "email".into(),
        };
        assert!(matches!(
            DomainError::from(DataError::Filter(filter)),
            DomainError::Filter(_)
        ));
    }

    #[test]
    fn test_internal_data_errors_stay_wrapped() {
        let err = DomainError::from(DataError::Config("bad".into()));
        assert!(matches!(err, DomainError::Data(_)));
    }

    #[test]
    fn test_missing_asset_does_not_exist() {
        let err = DomainError::from(AssetError::NotFound {
            path: "books/x/cover".into(),
        });
        assert!(matches!(err, DomainError::DoesNotExist { entity: "asset" }));
        assert_eq!(err.to_string(), "asset does not exist");

        let err = DomainError::from(AssetError::InvalidPath("../x".into()));
        assert!(matches!(err, DomainError::Asset(_)));
    }

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(
            DomainError::InvalidCredentials.to_string(),
            "Invalid credentials"
        );
    }
}
