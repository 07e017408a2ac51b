//! Statement classification.
//!
//! Decides whether a SQL statement mutates data (and is reported by its
//! affected-row count) or is a query (and is reported as a row table).

use std::fmt;

/// Keywords that mark a mutating statement, tested in this order.
pub const MUTATING_KEYWORDS: [&str; 6] = ["commit", "create", "delete", "drop", "insert", "update"];

/// The execution path chosen for a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Data-changing statement; carries the matched keyword in lowercase.
    Mutating(&'static str),
    /// Anything else, executed as a query that returns rows.
    Query,
}

impl StatementKind {
    /// Returns true if this statement is executed as an update.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::Mutating(_))
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mutating(keyword) => write!(f, "{}", keyword.to_uppercase()),
            Self::Query => write!(f, "QUERY"),
        }
    }
}

/// Classifies SQL by a case-insensitive prefix match against [`MUTATING_KEYWORDS`].
///
/// The text is matched as given; leading whitespace is not skipped.
pub fn classify_sql(sql: &str) -> StatementKind {
    MUTATING_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| starts_with_ignore_case(sql, keyword))
        .map_or(StatementKind::Query, StatementKind::Mutating)
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutating_keywords() {
        assert_eq!(
            classify_sql("insert into t values (1)"),
            StatementKind::Mutating("insert")
        );
        assert_eq!(
            classify_sql("update t set a = 1"),
            StatementKind::Mutating("update")
        );
        assert_eq!(
            classify_sql("delete from t"),
            StatementKind::Mutating("delete")
        );
        assert_eq!(classify_sql("drop table t"), StatementKind::Mutating("drop"));
        assert_eq!(
            classify_sql("create table t (a int)"),
            StatementKind::Mutating("create")
        );
        assert_eq!(classify_sql("commit"), StatementKind::Mutating("commit"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            classify_sql("INSERT INTO t VALUES (1)"),
            StatementKind::Mutating("insert")
        );
        assert_eq!(
            classify_sql("DeLeTe FROM t"),
            StatementKind::Mutating("delete")
        );
        assert_eq!(classify_sql("COMMIT"), StatementKind::Mutating("commit"));
    }

    #[test]
    fn test_queries() {
        assert_eq!(classify_sql("select current_date"), StatementKind::Query);
        assert_eq!(classify_sql("SELECT * FROM users"), StatementKind::Query);
        assert_eq!(
            classify_sql("with x as (select 1) select * from x"),
            StatementKind::Query
        );
        assert_eq!(classify_sql("explain select 1"), StatementKind::Query);
        assert_eq!(classify_sql(""), StatementKind::Query);
    }

    #[test]
    fn test_prefix_match_is_literal() {
        // Leading whitespace keeps the statement on the query path.
        assert_eq!(classify_sql("  insert into t values (1)"), StatementKind::Query);
        // Any text starting with a keyword counts, even without a word boundary.
        assert_eq!(
            classify_sql("updated_at_report"),
            StatementKind::Mutating("update")
        );
        assert_eq!(classify_sql("drop"), StatementKind::Mutating("drop"));
        assert_eq!(classify_sql("dro"), StatementKind::Query);
    }

    #[test]
    fn test_non_ascii_input() {
        assert_eq!(classify_sql("é"), StatementKind::Query);
        assert_eq!(classify_sql("créate"), StatementKind::Query);
    }

    #[test]
    fn test_is_mutating_and_display() {
        assert!(StatementKind::Mutating("drop").is_mutating());
        assert!(!StatementKind::Query.is_mutating());
        assert_eq!(StatementKind::Mutating("drop").to_string(), "DROP");
        assert_eq!(StatementKind::Query.to_string(), "QUERY");
    }
}
