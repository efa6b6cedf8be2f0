//! SQL text helpers

/// Escape LIKE/ILIKE metacharacters (`%`, `_`, `\`) in user input.
///
/// The result is meant for a pattern compared with `ESCAPE '\'`.
///
/// ```
/// use bookshelf_server::utils::sql::escape_like_pattern;
///
/// assert_eq!(escape_like_pattern("50% off_sale"), "50\\% off\\_sale");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Build a substring ILIKE pattern (`%term%`) from raw search input
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like_pattern(term))
}

/// Quote a trusted identifier for PostgreSQL.
///
/// Only ever called with column names taken from compile-time allow-lists.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
