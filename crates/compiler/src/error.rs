use thiserror::Error;

use crate::target::DbType;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The database type string has no dialect mapping.
    #[error("Unknown database type: {0}")]
    UnknownDatabaseType(String),

    #[error("{target} is not a {expected} target")]
    UnsupportedTarget {
        target: DbType,
        expected: &'static str,
    },
}
