use model::{
    core::{data_type::ColumnTypeCategory, value::Value},
    document::{flatten, unflatten},
    filter::{
        ConditionOperator, FilterCondition, FilterOperator, metadata_of, operators_for_column_type,
        validator::{drop_empty, is_empty, normalize, validate, validate_all},
    },
};
use serde_json::json;

#[test]
fn test_column_type_heuristic() {
    let string_ops = operators_for_column_type("varchar(255)");
    assert!(string_ops.contains(&FilterOperator::Contains));
    assert!(!string_ops.contains(&FilterOperator::GreaterThan));

    let number_ops = operators_for_column_type("numeric(10,2)");
    assert!(number_ops.contains(&FilterOperator::Between));
    assert!(!number_ops.contains(&FilterOperator::Contains));

    assert_eq!(operators_for_column_type("geography"), string_ops);
    assert_eq!(
        ColumnTypeCategory::classify("TIMESTAMP WITH TIME ZONE"),
        ColumnTypeCategory::Date
    );
    assert_eq!(ColumnTypeCategory::classify("bit(1)"), ColumnTypeCategory::Boolean);
}

#[test]
fn test_every_offered_operator_has_metadata() {
    for type_name in ["text", "bigint", "date", "boolean", "uuid"] {
        for op in operators_for_column_type(type_name) {
            assert_eq!(metadata_of(*op).operator, *op);
        }
    }
}

#[test]
fn test_in_list_normalizes_to_trimmed_strings() {
    let condition = FilterCondition::new("1", "tag", FilterOperator::In).with_value("a, b ,c");
    let result = validate(&condition);

    assert!(result.valid);
    let normalized = result.normalized.unwrap();
    assert_eq!(normalized.value, Some(Value::from(vec!["a", "b", "c"])));
    assert_eq!(normalize(&normalized), normalized);
}

#[test]
fn test_structural_errors_short_circuit_value_checks() {
    let condition = FilterCondition {
        id: None,
        column_name: "  ".to_string(),
        operator: ConditionOperator::from("nope"),
        value: None,
        value2: None,
    };
    let result = validate(&condition);

    assert!(!result.valid);
    assert_eq!(
        result.errors,
        vec![
            "Condition ID is required".to_string(),
            "Column name is required".to_string(),
            "Unknown operator: nope".to_string(),
        ]
    );
}

#[test]
fn test_filter_rows_from_ui_json() {
    let rows: Vec<FilterCondition> = serde_json::from_value(json!([
        { "id": "a", "columnName": "name", "operator": "equals", "value": "" },
        { "id": "b", "columnName": "name", "operator": "contains", "value": "  " },
        { "id": "c", "columnName": "age", "operator": "between", "value": 1 },
        { "id": "d", "columnName": "deleted", "operator": "is_null" }
    ]))
    .unwrap();

    let valid: Vec<bool> = validate_all(&rows).iter().map(|r| r.valid).collect();
    assert_eq!(valid, vec![true, false, false, true]);

    assert!(is_empty(&rows[1]));
    let kept: Vec<String> = drop_empty(&rows)
        .into_iter()
        .filter_map(|row| row.id)
        .collect();
    assert_eq!(kept, vec!["c", "d"]);
}

#[test]
fn test_document_round_trip() {
    let doc = json!({
        "user": { "name": "Ada", "roles": ["admin", "dev"], "meta": {} },
        "matrix": [[1, 2], [3]],
        "active": true
    });

    let flat = flatten(&doc);
    assert_eq!(flat["user.roles.1"], json!("dev"));
    assert_eq!(flat["matrix.0.1"], json!(2));
    assert_eq!(flat["user.meta"], json!({}));
    assert_eq!(unflatten(&flat), doc);
}
