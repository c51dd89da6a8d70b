use crate::{
    commands::{Commands, SqlArgs, TargetArgs},
    env::{EnvManager, LOG_VAR},
    error::CliError,
    settings::{Overrides, Settings},
};
use clap::Parser;
use compiler::{
    cassandra,
    sql::{
        CompileOptions,
        dialect::SqlDialect,
        select::{SelectOptions, build_select},
    },
    target::{DbType, compile_for_target},
};
use model::filter::{FilterCondition, metadata_of, operators_for_column_type, validator};
use serde::Serialize;
use sql_analyzer::{
    ParsedSql, SqlValidation, detect_dangerous_operations, format_sql, has_multiple_statements,
    is_read_only_query, minify, parse_sql, split_statements, validate,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod output;
mod settings;

#[derive(Parser)]
#[command(
    name = "qal",
    version = "0.1.0",
    about = "Compiles database-agnostic filters and analyzes SQL text"
)]
struct Cli {
    #[arg(long, global = true, help = "Load settings from this .env file")]
    env_file: Option<String>,

    #[arg(short, long, global = true, help = "Log at debug level")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Serialize)]
struct AnalyzeReport {
    statements: Vec<ParsedSql>,
    validation: SqlValidation,
}

#[derive(Serialize)]
struct SqlText {
    sql: String,
}

#[derive(Serialize)]
struct SqlCheck {
    validation: SqlValidation,
    read_only: bool,
    multiple_statements: bool,
    dangerous_operations: Vec<String>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let mut env = EnvManager::new();
    if let Some(path) = &cli.env_file {
        env.load_from_file(path)?;
    }

    init_logging(&env, cli.verbose);

    run(cli.command, &env)
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_logging(env: &EnvManager, verbose: bool) {
    let directive = if verbose {
        "debug"
    } else {
        env.get(LOG_VAR).unwrap_or("info")
    };
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands, env: &EnvManager) -> Result<(), CliError> {
    match command {
        Commands::Compile {
            filters,
            target,
            start_index,
            output,
        } => {
            let settings = resolve_settings(env, &target, start_index)?;
            let filters = load_filters(&filters)?;

            info!(
                "Compiling {} filter(s) for {} with {} logic",
                filters.len(),
                settings.target,
                settings.logic
            );

            if settings.target == DbType::Cassandra && cassandra::needs_allow_filtering(&filters) {
                warn!("The compiled CQL will probably need ALLOW FILTERING");
            }

            let compiled = compile_for_target(
                settings.target,
                &filters,
                settings.logic,
                settings.start_index,
            );
            output::write_json(&compiled, output.as_deref())?;
        }
        Commands::Select {
            table,
            filters,
            target,
            limit,
            offset,
            output,
        } => {
            let settings = resolve_settings(env, &target, None)?;
            let dialect = SqlDialect::try_from(settings.target)?;
            let filters = load_filters(&filters)?;
            let options = CompileOptions::new(dialect).start_index(settings.start_index);

            let query = build_select(
                &table,
                &filters,
                settings.logic,
                &options,
                SelectOptions { limit, offset },
            );
            output::write_json(&query, output.as_deref())?;
        }
        Commands::ValidateFilters { filters, output } => {
            let filters = read_filter_file(&filters)?;
            let results = validator::validate_all(&filters);

            let invalid = results.iter().filter(|result| !result.valid).count();
            if invalid > 0 {
                warn!("{} of {} filter condition(s) are invalid", invalid, results.len());
            }

            output::write_json(&results, output.as_deref())?;
        }
        Commands::Operators {
            column_type,
            output,
        } => {
            let operators: Vec<_> = operators_for_column_type(&column_type)
                .iter()
                .map(|op| metadata_of(*op))
                .collect();
            output::write_json(&operators, output.as_deref())?;
        }
        Commands::Analyze(args) => {
            let sql = read_sql(&args)?;
            let report = AnalyzeReport {
                statements: split_statements(&sql).iter().map(|s| parse_sql(s)).collect(),
                validation: validate(&sql),
            };
            output::write_json(&report, args.output.as_deref())?;
        }
        Commands::Split(args) => {
            let sql = read_sql(&args)?;
            output::write_json(&split_statements(&sql), args.output.as_deref())?;
        }
        Commands::Minify(args) => {
            let sql = read_sql(&args)?;
            output::write_json(&SqlText { sql: minify(&sql) }, args.output.as_deref())?;
        }
        Commands::Format(args) => {
            let sql = read_sql(&args)?;
            output::write_json(
                &SqlText {
                    sql: format_sql(&sql),
                },
                args.output.as_deref(),
            )?;
        }
        Commands::CheckSql(args) => {
            let sql = read_sql(&args)?;
            let check = SqlCheck {
                validation: validate(&sql),
                read_only: is_read_only_query(&sql),
                multiple_statements: has_multiple_statements(&sql),
                dangerous_operations: detect_dangerous_operations(&sql),
            };
            output::write_json(&check, args.output.as_deref())?;
        }
    }

    Ok(())
}

fn resolve_settings(
    env: &EnvManager,
    target: &TargetArgs,
    start_index: Option<usize>,
) -> Result<Settings, CliError> {
    let overrides = Overrides {
        target: target.target.clone(),
        logic: target.logic.clone(),
        start_index,
    };
    Settings::resolve(env, &overrides)
}

fn read_filter_file(path: &str) -> Result<Vec<FilterCondition>, CliError> {
    let source = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}

/// Reads a filter file and drops half-entered rows before compiling.
fn load_filters(path: &str) -> Result<Vec<FilterCondition>, CliError> {
    let filters = read_filter_file(path)?;
    let kept = validator::drop_empty(&filters);
    if kept.len() < filters.len() {
        debug!("Dropped {} empty filter condition(s)", filters.len() - kept.len());
    }
    Ok(kept)
}

fn read_sql(args: &SqlArgs) -> Result<String, CliError> {
    output::read_sql(args.file.as_deref(), args.query.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const FILTERS: &str = r#"[
        {"id":"1","columnName":"age","operator":"greater_than","value":18},
        {"id":"2","columnName":"name","operator":"contains","value":""},
        {"id":"3","columnName":"city","operator":"in","value":"Oslo, Bergen"}
    ]"#;

    fn read_json(path: &std::path::Path) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_compile_command_writes_fragment() {
        let dir = tempfile::tempdir().unwrap();
        let filters = dir.path().join("filters.json");
        let out = dir.path().join("out.json");
        std::fs::write(&filters, FILTERS).unwrap();

        let env = EnvManager::from_vars(HashMap::from([(
            "QAL_TARGET".to_string(),
            "mysql".to_string(),
        )]));
        run(
            Commands::Compile {
                filters: filters.to_string_lossy().into_owned(),
                target: TargetArgs::default(),
                start_index: None,
                output: Some(out.to_string_lossy().into_owned()),
            },
            &env,
        )
        .unwrap();

        let json = read_json(&out);
        assert_eq!(json["kind"], "sql");
        assert_eq!(json["where_clause"], "`age` > ? AND `city` IN (?, ?)");
        assert_eq!(json["params"], serde_json::json!([18, "Oslo", "Bergen"]));
    }

    #[test]
    fn test_select_command_rejects_non_sql_target() {
        let dir = tempfile::tempdir().unwrap();
        let filters = dir.path().join("filters.json");
        std::fs::write(&filters, FILTERS).unwrap();

        let result = run(
            Commands::Select {
                table: "users".to_string(),
                filters: filters.to_string_lossy().into_owned(),
                target: TargetArgs {
                    target: Some("mongodb".to_string()),
                    logic: None,
                },
                limit: Some(10),
                offset: None,
                output: None,
            },
            &EnvManager::default(),
        );

        assert!(matches!(result, Err(CliError::Compile(_))));
    }

    #[test]
    fn test_validate_filters_reports_each_condition() {
        let dir = tempfile::tempdir().unwrap();
        let filters = dir.path().join("filters.json");
        let out = dir.path().join("out.json");
        std::fs::write(&filters, FILTERS).unwrap();

        run(
            Commands::ValidateFilters {
                filters: filters.to_string_lossy().into_owned(),
                output: Some(out.to_string_lossy().into_owned()),
            },
            &EnvManager::default(),
        )
        .unwrap();

        let json = read_json(&out);
        assert_eq!(json.as_array().unwrap().len(), 3);
        assert_eq!(json[0]["valid"], true);
        assert_eq!(json[1]["valid"], false);
        assert_eq!(json[2]["normalized"]["value"], serde_json::json!(["Oslo", "Bergen"]));
    }

    #[test]
    fn test_check_sql_command() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.json");

        run(
            Commands::CheckSql(SqlArgs {
                file: None,
                query: Some("DELETE FROM t; SELECT 1".to_string()),
                output: Some(out.to_string_lossy().into_owned()),
            }),
            &EnvManager::default(),
        )
        .unwrap();

        let json = read_json(&out);
        assert_eq!(json["validation"]["valid"], true);
        assert_eq!(json["read_only"], false);
        assert_eq!(json["multiple_statements"], true);
        assert_eq!(
            json["dangerous_operations"],
            serde_json::json!(["DELETE", "DELETE_ALL"])
        );
    }

    #[test]
    fn test_malformed_filter_file() {
        let dir = tempfile::tempdir().unwrap();
        let filters = dir.path().join("filters.json");
        std::fs::write(&filters, "{not json").unwrap();

        let result = read_filter_file(&filters.to_string_lossy());
        assert!(matches!(result, Err(CliError::FilterDeserialize(_))));
    }
}
