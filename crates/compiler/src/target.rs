//! Maps a target database type onto the compiler that serves it.

use crate::{
    cassandra::{self, CqlFragment},
    elastic, mongo,
    error::CompileError,
    sql::{self, CompileOptions, NamedSqlFragment, SqlFragment, dialect::SqlDialect},
};
use model::filter::{FilterCondition, LogicOp};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    Postgres,
    MySql,
    MariaDb,
    Sqlite,
    SqlServer,
    MongoDb,
    Elasticsearch,
    Cassandra,
}

impl DbType {
    pub fn sql_dialect(&self) -> Option<SqlDialect> {
        match self {
            DbType::Postgres => Some(SqlDialect::Postgres),
            DbType::MySql => Some(SqlDialect::MySql),
            DbType::MariaDb => Some(SqlDialect::MariaDb),
            DbType::Sqlite => Some(SqlDialect::Sqlite),
            DbType::SqlServer => Some(SqlDialect::SqlServer),
            DbType::MongoDb | DbType::Elasticsearch | DbType::Cassandra => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DbType::Postgres => "postgres",
            DbType::MySql => "mysql",
            DbType::MariaDb => "mariadb",
            DbType::Sqlite => "sqlite",
            DbType::SqlServer => "sqlserver",
            DbType::MongoDb => "mongodb",
            DbType::Elasticsearch => "elasticsearch",
            DbType::Cassandra => "cassandra",
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DbType {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(DbType::Postgres),
            "mysql" => Ok(DbType::MySql),
            "mariadb" => Ok(DbType::MariaDb),
            "sqlite" | "sqlite3" => Ok(DbType::Sqlite),
            "sqlserver" | "mssql" => Ok(DbType::SqlServer),
            "mongodb" | "mongo" => Ok(DbType::MongoDb),
            "elasticsearch" | "elastic" | "es" => Ok(DbType::Elasticsearch),
            "cassandra" | "scylla" | "scylladb" => Ok(DbType::Cassandra),
            _ => Err(CompileError::UnknownDatabaseType(s.to_string())),
        }
    }
}

impl TryFrom<DbType> for SqlDialect {
    type Error = CompileError;

    fn try_from(db_type: DbType) -> Result<Self, Self::Error> {
        db_type.sql_dialect().ok_or(CompileError::UnsupportedTarget {
            target: db_type,
            expected: "SQL",
        })
    }
}

/// The output of whichever compiler serves a target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompiledFilter {
    Sql(SqlFragment),
    NamedSql(NamedSqlFragment),
    Mongo { query: serde_json::Value },
    Elastic { body: serde_json::Value },
    Cql(CqlFragment),
}

/// Compiles for `db_type` with default options. SQL Server gets named
/// parameters, every other SQL engine positional ones.
pub fn compile_for_target(
    db_type: DbType,
    filters: &[FilterCondition],
    logic: LogicOp,
    start_index: usize,
) -> CompiledFilter {
    let positional = |dialect: SqlDialect| {
        let options = CompileOptions::new(dialect).start_index(start_index);
        CompiledFilter::Sql(sql::compile(filters, logic, &options))
    };

    match db_type {
        DbType::SqlServer => {
            let options = CompileOptions::new(SqlDialect::SqlServer).start_index(start_index);
            CompiledFilter::NamedSql(sql::compile_named(filters, logic, &options))
        }
        DbType::Postgres => positional(SqlDialect::Postgres),
        DbType::MySql => positional(SqlDialect::MySql),
        DbType::MariaDb => positional(SqlDialect::MariaDb),
        DbType::Sqlite => positional(SqlDialect::Sqlite),
        DbType::MongoDb => CompiledFilter::Mongo {
            query: mongo::compile(filters, logic),
        },
        DbType::Elasticsearch => CompiledFilter::Elastic {
            body: elastic::compile(filters, logic),
        },
        DbType::Cassandra => CompiledFilter::Cql(cassandra::compile(filters, logic)),
    }
}

/// Compiles to SQL for a database named by string, failing loudly when the
/// name is unknown or not a SQL engine.
pub fn compile_sql_for(
    db_type: &str,
    filters: &[FilterCondition],
    logic: LogicOp,
) -> Result<SqlFragment, CompileError> {
    let dialect = SqlDialect::try_from(db_type.parse::<DbType>()?)?;
    Ok(sql::compile(filters, logic, &CompileOptions::new(dialect)))
}
