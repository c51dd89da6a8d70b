//! Quote and comment aware analysis of raw SQL text.
//!
//! Nothing here executes SQL or fails on malformed input. Every operation is
//! total: the worst case is an `UNKNOWN` statement type, empty results, or a
//! [`SqlValidation`] with `valid == false`.

pub mod errors;
pub mod format;
pub mod keywords;
pub mod parse;
pub mod safety;
pub mod scanner;
pub mod statements;
pub mod token;
pub mod validate;

pub use errors::{ScanError, Severity, SourcePosition, SqlValidation, ValidationIssue};
pub use format::format_sql;
pub use parse::{ParsedSql, StatementType, extract_tables, parse_sql, statement_type};
pub use safety::{detect_dangerous_operations, is_read_only_query};
pub use statements::{has_multiple_statements, minify, split_statements};
pub use validate::validate;
