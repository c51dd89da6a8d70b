//! Database-specific SQL syntax.
//!
//! Every concern is one exhaustive `match`, so adding a dialect fails to
//! build until quoting, placeholders, casts and LIKE handling are all decided
//! for it.

use crate::escape::quote_with;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    Postgres,
    MySql,
    MariaDb,
    Sqlite,
    SqlServer,
}

impl SqlDialect {
    /// Wraps an identifier (like a table or column name) in the correct
    /// quotation marks for the dialect.
    ///
    /// - PostgreSQL and SQLite use double quotes: `"my_column"`
    /// - MySQL and MariaDB use backticks: `` `my_column` ``
    /// - SQL Server uses square brackets: `[my_column]`
    pub fn quote_identifier(&self, ident: &str) -> String {
        match self {
            SqlDialect::Postgres | SqlDialect::Sqlite => quote_with(ident, '"', '"'),
            SqlDialect::MySql | SqlDialect::MariaDb => quote_with(ident, '`', '`'),
            SqlDialect::SqlServer => quote_with(ident, '[', ']'),
        }
    }

    /// Returns the placeholder for the parameter at `index`.
    ///
    /// - PostgreSQL uses `$1`, `$2`, etc.
    /// - SQL Server uses named `@p1`, `@p2`, etc.
    /// - Everything else uses `?`
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            SqlDialect::Postgres => format!("${index}"),
            SqlDialect::SqlServer => named_placeholder(index),
            SqlDialect::MySql | SqlDialect::MariaDb | SqlDialect::Sqlite => "?".to_string(),
        }
    }

    /// Casts an already quoted column to text so pattern matching also
    /// works on numeric and temporal columns.
    pub fn text_cast(&self, quoted_column: &str) -> String {
        match self {
            SqlDialect::Postgres => format!("{quoted_column}::text"),
            SqlDialect::SqlServer => format!("CAST({quoted_column} AS NVARCHAR(MAX))"),
            SqlDialect::MySql | SqlDialect::MariaDb | SqlDialect::Sqlite => {
                quoted_column.to_string()
            }
        }
    }

    /// The pattern operator used for substring matches. PostgreSQL is the
    /// only dialect whose LIKE is case sensitive, so it switches to ILIKE.
    pub fn like_operator(&self, negated: bool) -> &'static str {
        match (self, negated) {
            (SqlDialect::Postgres, false) => "ILIKE",
            (SqlDialect::Postgres, true) => "NOT ILIKE",
            (
                SqlDialect::MySql | SqlDialect::MariaDb | SqlDialect::Sqlite | SqlDialect::SqlServer,
                false,
            ) => "LIKE",
            (
                SqlDialect::MySql | SqlDialect::MariaDb | SqlDialect::Sqlite | SqlDialect::SqlServer,
                true,
            ) => "NOT LIKE",
        }
    }

    /// Appends row limiting to a complete `SELECT`.
    pub fn render_limit(&self, sql: &mut String, limit: Option<u64>, offset: Option<u64>) {
        match self {
            SqlDialect::Postgres | SqlDialect::MySql | SqlDialect::MariaDb | SqlDialect::Sqlite => {
                match (limit, offset) {
                    (Some(limit), Some(offset)) => {
                        sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"))
                    }
                    (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
                    // SQLite and MySQL reject OFFSET without LIMIT.
                    (None, Some(offset)) => {
                        sql.push_str(&format!(" LIMIT {} OFFSET {offset}", i64::MAX))
                    }
                    (None, None) => {}
                }
            }
            SqlDialect::SqlServer => {
                if limit.is_none() && offset.is_none() {
                    return;
                }
                sql.push_str(&format!(
                    " ORDER BY (SELECT NULL) OFFSET {} ROWS",
                    offset.unwrap_or(0)
                ));
                if let Some(limit) = limit {
                    sql.push_str(&format!(" FETCH NEXT {limit} ROWS ONLY"));
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SqlDialect::Postgres => "PostgreSQL",
            SqlDialect::MySql => "MySQL",
            SqlDialect::MariaDb => "MariaDB",
            SqlDialect::Sqlite => "SQLite",
            SqlDialect::SqlServer => "SQL Server",
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub(crate) fn named_placeholder(index: usize) -> String {
    format!("@{}", param_name(index))
}

pub(crate) fn param_name(index: usize) -> String {
    format!("p{index}")
}
