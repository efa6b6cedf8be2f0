//! Structured clause builder
//!
//! Criteria are collected as predicate terms and rendered in one pass, so
//! the placeholder numbering always matches the parameter list.

use super::types::{BindValue, CompiledClause, FilterError, SortSpec};
use crate::utils::sql::{contains_pattern, quote_ident};

#[derive(Debug, Clone)]
enum Predicate {
    Eq {
        column: &'static str,
        value: BindValue,
    },
    /// Case-insensitive substring match against any of the columns
    AnyILike {
        columns: &'static [&'static str],
        pattern: String,
    },
}

/// Builder for a `WHERE` / `ORDER BY` / `LIMIT` / `OFFSET` tail
#[derive(Debug, Clone, Default)]
pub struct ClauseBuilder {
    predicates: Vec<Predicate>,
    sort: Option<SortSpec>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl ClauseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `"column" = $n` when a value is present
    pub fn eq<V: Into<BindValue>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.predicates.push(Predicate::Eq {
                column,
                value: value.into(),
            });
        }
        self
    }

    /// Add a free-text search over `columns`; blank terms are ignored
    pub fn search(mut self, columns: &'static [&'static str], term: Option<&str>) -> Self {
        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty())
            && !columns.is_empty()
        {
            self.predicates.push(Predicate::AnyILike {
                columns,
                pattern: contains_pattern(term),
            });
        }
        self
    }

    /// Set the sort order from `+field` / `-field` / `field`.
    ///
    /// An absent or blank specification leaves the order unset.
    pub fn sort(
        mut self,
        raw: Option<&str>,
        allowed: &'static [&'static str],
    ) -> Result<Self, FilterError> {
        if let Some(raw) = raw.filter(|r| !r.trim().is_empty()) {
            self.sort = Some(SortSpec::parse(raw, allowed)?);
        }
        Ok(self)
    }

    /// Limit applies only when positive
    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit.filter(|l| *l > 0).map(i64::from);
        self
    }

    /// Offset applies only when positive
    pub fn offset(mut self, offset: Option<u32>) -> Self {
        self.offset = offset.filter(|o| *o > 0).map(i64::from);
        self
    }

    /// Render the clause and its parameters
    pub fn build(self) -> CompiledClause {
        let mut params: Vec<BindValue> = Vec::new();
        let mut parts: Vec<String> = Vec::new();

        let predicates: Vec<String> = self
            .predicates
            .into_iter()
            .filter_map(|predicate| match predicate {
                Predicate::Eq { column, value } => Some(format!(
                    "{} = {}",
                    quote_ident(column),
                    bind(&mut params, value)
                )),
                Predicate::AnyILike { columns, pattern } => {
                    let terms: Vec<String> = columns
                        .iter()
                        .map(|column| {
                            format!(
                                "{} ILIKE {} ESCAPE '\\'",
                                quote_ident(column),
                                bind(&mut params, BindValue::Text(pattern.clone()))
                            )
                        })
                        .collect();
                    match terms.len() {
                        0 => None,
                        1 => terms.into_iter().next(),
                        _ => Some(format!("({})", terms.join(" OR "))),
                    }
                }
            })
            .collect();

        if !predicates.is_empty() {
            parts.push(format!("WHERE {}", predicates.join(" AND ")));
        }

        if let Some(sort) = self.sort {
            parts.push(format!(
                "ORDER BY {} {}",
                quote_ident(sort.column),
                sort.direction.as_sql()
            ));
        }

        if let Some(limit) = self.limit {
            parts.push(format!("LIMIT {}", bind(&mut params, limit.into())));
        }

        if let Some(offset) = self.offset {
            parts.push(format!("OFFSET {}", bind(&mut params, offset.into())));
        }

        let clause = CompiledClause {
            sql: parts.join(" "),
            params,
        };
        tracing::trace!(sql = %clause.sql, params = clause.params.len(), "Compiled filter clause");
        clause
    }
}

/// Push a value and return its placeholder
fn bind(params: &mut Vec<BindValue>, value: BindValue) -> String {
    params.push(value);
    format!("${}", params.len())
}

/// Column allow-lists for sortable and searchable fields
pub mod columns {
    pub const BOOK_SORTABLE: &[&str] = &["title", "status", "created_at", "updated_at"];

    pub const BOOK_SEARCHABLE: &[&str] = &["title", "description"];

    pub const USER_SORTABLE: &[&str] = &[
        "username",
        "nickname",
        "status",
        "created_at",
        "updated_at",
    ];

    pub const USER_SEARCHABLE: &[&str] = &["username", "nickname"];
}
