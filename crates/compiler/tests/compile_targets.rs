use compiler::{
    cassandra, elastic, mongo,
    sql::{self, CompileOptions, dialect::SqlDialect},
    target::{CompiledFilter, DbType, compile_for_target},
};
use model::{
    core::value::Value,
    filter::{FilterCondition, FilterOperator, LogicOp, validator},
};
use serde_json::json;

fn sample_filters() -> Vec<FilterCondition> {
    vec![
        FilterCondition::new("1", "age", FilterOperator::Between)
            .with_value(18)
            .with_value2(65),
        FilterCondition::new("2", "name", FilterOperator::Contains).with_value("ann"),
        FilterCondition::new("3", "deleted_at", FilterOperator::IsNull),
        FilterCondition::new("4", "country", FilterOperator::In).with_value("PL, DE, FR"),
    ]
}

fn count_placeholders(clause: &str, dialect: SqlDialect) -> usize {
    match dialect {
        SqlDialect::Postgres => clause.matches('$').count(),
        SqlDialect::SqlServer => clause.matches("@p").count(),
        SqlDialect::MySql | SqlDialect::MariaDb | SqlDialect::Sqlite => clause.matches('?').count(),
    }
}

#[test]
fn test_placeholder_count_matches_params_for_every_dialect() {
    let filters = sample_filters();
    for dialect in [
        SqlDialect::Postgres,
        SqlDialect::MySql,
        SqlDialect::MariaDb,
        SqlDialect::Sqlite,
        SqlDialect::SqlServer,
    ] {
        let fragment = sql::compile(&filters, LogicOp::And, &CompileOptions::new(dialect));
        assert_eq!(
            count_placeholders(&fragment.where_clause, dialect),
            fragment.params.len(),
            "{dialect}: {}",
            fragment.where_clause
        );
        // between(2) + contains(1) + in(3)
        assert_eq!(fragment.params.len(), 6);
    }
}

#[test]
fn test_postgres_placeholders_are_sequential_from_start_index() {
    let options = CompileOptions::new(SqlDialect::Postgres).start_index(4);
    let fragment = sql::compile(&sample_filters(), LogicOp::Or, &options);

    assert_eq!(
        fragment.where_clause,
        r#""age" BETWEEN $4 AND $5 OR "name"::text ILIKE $6 OR "deleted_at" IS NULL OR "country" IN ($7, $8, $9)"#
    );
    assert_eq!(fragment.params[2], Value::from("%ann%"));
}

#[test]
fn test_named_params_match_placeholders() {
    let options = CompileOptions::new(SqlDialect::SqlServer);
    let fragment = sql::compile_named(&sample_filters(), LogicOp::And, &options);

    assert_eq!(fragment.params.len(), 6);
    for name in fragment.params.keys() {
        assert!(fragment.where_clause.contains(&format!("@{name}")), "{name}");
    }
    assert_eq!(fragment.params.get("p1"), Some(&Value::Int(18)));
}

#[test]
fn test_malformed_condition_rejected_by_validator_but_skipped_by_compiler() {
    let malformed = FilterCondition::new("9", "age", FilterOperator::Between).with_value(18);
    let valid = FilterCondition::new("1", "name", FilterOperator::Equals).with_value("bob");

    let result = validator::validate(&malformed);
    assert!(!result.valid);
    assert!(result.errors[0].contains("Second value"));

    let filters = vec![malformed, valid];
    let fragment = sql::compile(&filters, LogicOp::And, &CompileOptions::new(SqlDialect::MySql));
    assert_eq!(fragment.where_clause, "`name` = ?");
    assert_eq!(fragment.params, vec![Value::from("bob")]);

    assert_eq!(mongo::compile(&filters, LogicOp::And), json!({ "name": { "$eq": "bob" } }));
    assert_eq!(cassandra::compile(&filters, LogicOp::And).where_clause, r#""name" = ?"#);
    assert_eq!(
        elastic::compile(&filters, LogicOp::And),
        json!({ "query": { "bool": { "must": [{ "term": { "name": "bob" } }] } } })
    );
}

#[test]
fn test_unknown_operator_from_json_is_reported_and_skipped() {
    let raw = r#"[
        {"id":"1","columnName":"age","operator":"approximately","value":3},
        {"id":"2","columnName":"age","operator":"less_than","value":40}
    ]"#;
    let filters: Vec<FilterCondition> = serde_json::from_str(raw).unwrap();

    let results = validator::validate_all(&filters);
    assert_eq!(results[0].errors, vec!["Unknown operator: approximately".to_string()]);
    assert!(results[1].valid);

    let fragment = sql::compile(&filters, LogicOp::And, &CompileOptions::new(SqlDialect::Sqlite));
    assert_eq!(fragment.where_clause, r#""age" < ?"#);
}

#[test]
fn test_empty_filter_list_produces_empty_outputs() {
    let sql = sql::compile(&[], LogicOp::And, &CompileOptions::new(SqlDialect::Postgres));
    assert!(sql.is_empty());
    assert!(sql.params.is_empty());

    assert_eq!(mongo::compile(&[], LogicOp::And), json!({}));
    assert!(cassandra::compile(&[], LogicOp::And).is_empty());
}

#[test]
fn test_compiled_filter_serializes_with_kind_tag() {
    let filters = vec![FilterCondition::new("1", "age", FilterOperator::GreaterThan).with_value(18)];
    let compiled = compile_for_target("pg".parse::<DbType>().unwrap(), &filters, LogicOp::And, 1);

    assert_eq!(
        serde_json::to_value(&compiled).unwrap(),
        json!({ "kind": "sql", "where_clause": r#""age" > $1"#, "params": [18] })
    );

    let compiled = compile_for_target(DbType::MongoDb, &filters, LogicOp::And, 1);
    assert_eq!(
        compiled,
        CompiledFilter::Mongo {
            query: json!({ "age": { "$gt": 18 } })
        }
    );
}
