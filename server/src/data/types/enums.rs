//! Status enums stored as SMALLINT
//!
//! Zero is never stored; an unknown status is `Option::None` in Rust.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::data::filters::BindValue;

/// Lifecycle state of a user account
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[repr(i16)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Unverified = 1,
    Active = 2,
    Banned = 3,
    Deleted = 4,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unverified => "Unverified",
            Self::Active => "Active",
            Self::Banned => "Banned",
            Self::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UserStatus> for BindValue {
    fn from(status: UserStatus) -> Self {
        BindValue::SmallInt(status as i16)
    }
}

/// Publication state of a book
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type,
)]
#[repr(i16)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Draft = 1,
    Public = 2,
    Private = 3,
    Deleted = 4,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Public => "Public",
            Self::Private => "Private",
            Self::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<BookStatus> for BindValue {
    fn from(status: BookStatus) -> Self {
        BindValue::SmallInt(status as i16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_status_serde() {
        let status: UserStatus = serde_json::from_str(r#""active""#).unwrap();
        assert_eq!(status, UserStatus::Active);
        assert_eq!(
            serde_json::to_string(&UserStatus::Unverified).unwrap(),
            r#""unverified""#
        );
        assert!(serde_json::from_str::<UserStatus>(r#""unknown""#).is_err());
    }

    #[test]
    fn test_book_status_serde() {
        let status: BookStatus = serde_json::from_str(r#""private""#).unwrap();
        assert_eq!(status, BookStatus::Private);
        assert_eq!(
            serde_json::to_string(&BookStatus::Public).unwrap(),
            r#""public""#
        );
    }

    #[test]
    fn test_status_display() {
        assert_eq!(UserStatus::Banned.to_string(), "Banned");
        assert_eq!(BookStatus::Draft.to_string(), "Draft");
    }

    #[test]
    fn test_status_binds_as_smallint() {
        assert_eq!(BindValue::from(UserStatus::Active), BindValue::SmallInt(2));
        assert_eq!(BindValue::from(UserStatus::Deleted), BindValue::SmallInt(4));
        assert_eq!(BindValue::from(BookStatus::Draft), BindValue::SmallInt(1));
        assert_eq!(BindValue::from(BookStatus::Private), BindValue::SmallInt(3));
    }
}
