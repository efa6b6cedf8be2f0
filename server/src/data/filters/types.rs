//! Filter compiler value types

use thiserror::Error;
use uuid::Uuid;

/// A value bound to one `$n` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Uuid(Uuid),
    SmallInt(i16),
    BigInt(i64),
    Text(String),
}

impl From<Uuid> for BindValue {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<i16> for BindValue {
    fn from(value: i16) -> Self {
        Self::SmallInt(value)
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        Self::BigInt(value)
    }
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Errors raised while compiling criteria
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Cannot sort by '{field}'")]
    InvalidSortField { field: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Validated sort specification.
///
/// `column` always points into the allow-list it was parsed against, so it
/// never carries caller text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Parse `+field`, `-field` or `field` against an allow-list of columns
    pub fn parse(raw: &str, allowed: &'static [&'static str]) -> Result<Self, FilterError> {
        let raw = raw.trim();
        let (direction, field) = if let Some(rest) = raw.strip_prefix('+') {
            (SortDirection::Asc, rest)
        } else if let Some(rest) = raw.strip_prefix('-') {
            (SortDirection::Desc, rest)
        } else {
            (SortDirection::Asc, raw)
        };

        let column = allowed
            .iter()
            .copied()
            .find(|c| *c == field)
            .ok_or_else(|| FilterError::InvalidSortField {
                field: field.to_string(),
            })?;

        Ok(Self { column, direction })
    }
}

/// Compiled clause: SQL tail and the values for its placeholders, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledClause {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl CompiledClause {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Append the clause to a base `SELECT ... FROM ...` query
    pub fn apply_to(&self, base: &str) -> String {
        let base = base.trim_end();
        if self.sql.is_empty() {
            base.to_string()
        } else {
            format!("{} {}", base, self.sql)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SORTABLE: &[&str] = &["title", "created_at"];

    #[test]
    fn sort_spec_plus_prefix_is_ascending() {
        let spec = SortSpec::parse("+title", SORTABLE).unwrap();
        assert_eq!(spec.column, "title");
        assert_eq!(spec.direction, SortDirection::Asc);
    }

    #[test]
    fn sort_spec_bare_field_is_ascending() {
        let spec = SortSpec::parse("title", SORTABLE).unwrap();
        assert_eq!(spec.direction, SortDirection::Asc);
    }

    #[test]
    fn sort_spec_minus_prefix_is_descending() {
        let spec = SortSpec::parse("-created_at", SORTABLE).unwrap();
        assert_eq!(spec.column, "created_at");
        assert_eq!(spec.direction, SortDirection::Desc);
    }

    #[test]
    fn sort_spec_rejects_unknown_field() {
        let err = SortSpec::parse("'; DROP TABLE users; --", SORTABLE).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidSortField {
                field: "'; DROP TABLE users; --".to_string()
            }
        );
    }

    #[test]
    fn sort_spec_rejects_bare_sign() {
        assert!(SortSpec::parse("-", SORTABLE).is_err());
        assert!(SortSpec::parse("+", SORTABLE).is_err());
        // Only one sign is stripped
        assert!(SortSpec::parse("--title", SORTABLE).is_err());
    }

    #[test]
    fn sort_spec_is_case_sensitive() {
        assert!(SortSpec::parse("Title", SORTABLE).is_err());
    }

    #[test]
    fn apply_to_empty_clause_keeps_base() {
        let clause = CompiledClause::default();
        assert!(clause.is_empty());
        assert_eq!(clause.apply_to("SELECT 1 FROM books "), "SELECT 1 FROM books");
    }

    #[test]
    fn apply_to_appends_with_single_space() {
        let clause = CompiledClause {
            sql: "LIMIT $1".to_string(),
            params: vec![BindValue::BigInt(5)],
        };
        assert_eq!(
            clause.apply_to("SELECT 1 FROM books\n"),
            "SELECT 1 FROM books LIMIT $1"
        );
    }
}
