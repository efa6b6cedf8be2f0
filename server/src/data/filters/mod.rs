//! Filter compiler
//!
//! Turns sparse, typed list criteria into a parameterized SQL tail
//! (`WHERE ... ORDER BY ... LIMIT ... OFFSET ...`) plus the ordered bind
//! values for its `$n` placeholders.
//!
//! ## Usage
//!
//! ```
//! use bookshelf_server::data::filters::{BindValue, ClauseBuilder, columns};
//!
//! let clause = ClauseBuilder::new()
//!     .eq("status", Some(BindValue::SmallInt(2)))
//!     .sort(Some("-created_at"), columns::BOOK_SORTABLE)
//!     .unwrap()
//!     .limit(Some(10))
//!     .build();
//!
//! assert_eq!(
//!     clause.sql,
//!     r#"WHERE "status" = $1 ORDER BY "created_at" DESC LIMIT $2"#
//! );
//! assert_eq!(clause.params, vec![BindValue::SmallInt(2), BindValue::BigInt(10)]);
//! ```

mod builder;
mod types;

pub use builder::{ClauseBuilder, columns};
pub use types::{BindValue, CompiledClause, FilterError, SortDirection, SortSpec};
