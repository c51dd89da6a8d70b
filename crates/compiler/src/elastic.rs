//! Compiles filter lists into Elasticsearch Query DSL.

use crate::escape::escape_wildcard;
use model::filter::{FilterCondition, FilterOperator, LogicOp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json, json};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    #[serde(default)]
    pub order: SortOrder,
}

/// Paging and ordering for a full search request body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    pub from: Option<u64>,
    pub size: Option<u64>,
    #[serde(default)]
    pub sort: Vec<SortField>,
}

/// Returns `{"query": {"bool": {...}}}`. AND logic places the clauses under
/// `must`; OR logic places them under `should` with
/// `minimum_should_match: 1`.
pub fn compile(filters: &[FilterCondition], logic: LogicOp) -> Json {
    let clauses = compile_clauses(filters);
    json!({ "query": bool_query(clauses, logic) })
}

/// Builds a complete `_search` body. Without any usable condition the query
/// becomes `match_all`.
pub fn build_search_body(filters: &[FilterCondition], logic: LogicOp, options: &SearchOptions) -> Json {
    let clauses = compile_clauses(filters);
    let query = if clauses.is_empty() {
        json!({ "match_all": {} })
    } else {
        bool_query(clauses, logic)
    };

    let mut body = Map::new();
    body.insert("query".to_string(), query);
    if let Some(from) = options.from {
        body.insert("from".to_string(), json!(from));
    }
    if let Some(size) = options.size {
        body.insert("size".to_string(), json!(size));
    }
    if !options.sort.is_empty() {
        let sort = options
            .sort
            .iter()
            .map(|sort| keyed(&sort.field, json!({ "order": sort.order })))
            .collect::<Vec<_>>();
        body.insert("sort".to_string(), Json::Array(sort));
    }
    Json::Object(body)
}

fn compile_clauses(filters: &[FilterCondition]) -> Vec<Json> {
    filters.iter().filter_map(compile_condition).collect()
}

fn bool_query(clauses: Vec<Json>, logic: LogicOp) -> Json {
    match logic {
        LogicOp::And => json!({ "bool": { "must": clauses } }),
        LogicOp::Or => json!({ "bool": { "should": clauses, "minimum_should_match": 1 } }),
    }
}

pub fn compile_condition(condition: &FilterCondition) -> Option<Json> {
    if !condition.is_complete() {
        debug!(
            column = %condition.column_name,
            operator = %condition.operator,
            "skipping incomplete filter condition"
        );
        return None;
    }

    let field = condition.column_name.as_str();
    let value = condition.value.as_ref();

    let clause = match condition.operator()? {
        FilterOperator::Equals => json!({ "term": keyed(field, value?.to_json()) }),
        FilterOperator::NotEquals => {
            must_not(json!({ "term": keyed(field, value?.to_json()) }))
        }
        FilterOperator::Contains => {
            wildcard(field, format!("*{}*", escape_wildcard(&value?.to_string())), true)
        }
        FilterOperator::NotContains => must_not(wildcard(
            field,
            format!("*{}*", escape_wildcard(&value?.to_string())),
            true,
        )),
        FilterOperator::StartsWith => json!({
            "prefix": keyed(field, json!({ "value": value?.to_string(), "case_insensitive": true }))
        }),
        FilterOperator::EndsWith => {
            wildcard(field, format!("*{}", escape_wildcard(&value?.to_string())), false)
        }
        FilterOperator::GreaterThan => range(field, json!({ "gt": value?.to_json() })),
        FilterOperator::LessThan => range(field, json!({ "lt": value?.to_json() })),
        FilterOperator::GreaterOrEqual => range(field, json!({ "gte": value?.to_json() })),
        FilterOperator::LessOrEqual => range(field, json!({ "lte": value?.to_json() })),
        FilterOperator::IsNull => must_not(json!({ "exists": { "field": field } })),
        FilterOperator::IsNotNull => json!({ "exists": { "field": field } }),
        FilterOperator::Between => range(
            field,
            json!({ "gte": value?.to_json(), "lte": condition.value2.as_ref()?.to_json() }),
        ),
        FilterOperator::In => {
            let items: Vec<Json> = value?.to_list().iter().map(|item| item.to_json()).collect();
            if items.is_empty() {
                return None;
            }
            json!({ "terms": keyed(field, Json::Array(items)) })
        }
    };

    Some(clause)
}

fn keyed(field: &str, body: Json) -> Json {
    let mut map = Map::new();
    map.insert(field.to_string(), body);
    Json::Object(map)
}

fn must_not(clause: Json) -> Json {
    json!({ "bool": { "must_not": clause } })
}

fn range(field: &str, bounds: Json) -> Json {
    json!({ "range": keyed(field, bounds) })
}

fn wildcard(field: &str, pattern: String, case_insensitive: bool) -> Json {
    let body = if case_insensitive {
        json!({ "value": pattern, "case_insensitive": true })
    } else {
        json!({ "value": pattern })
    };
    json!({ "wildcard": keyed(field, body) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_uses_must() {
        let filters = vec![
            FilterCondition::new("1", "status", FilterOperator::Equals).with_value("open"),
            FilterCondition::new("2", "age", FilterOperator::GreaterOrEqual).with_value(21),
        ];

        assert_eq!(
            compile(&filters, LogicOp::And),
            json!({ "query": { "bool": { "must": [
                { "term": { "status": "open" } },
                { "range": { "age": { "gte": 21 } } }
            ] } } })
        );
    }

    #[test]
    fn test_or_uses_should() {
        let filters = vec![FilterCondition::new("1", "tag", FilterOperator::In).with_value("a,b")];

        assert_eq!(
            compile(&filters, LogicOp::Or),
            json!({ "query": { "bool": {
                "should": [{ "terms": { "tag": ["a", "b"] } }],
                "minimum_should_match": 1
            } } })
        );
    }

    #[test]
    fn test_text_matching() {
        let contains = FilterCondition::new("1", "name", FilterOperator::Contains).with_value("jo*");
        let not_contains = FilterCondition::new("2", "name", FilterOperator::NotContains).with_value("x");
        let prefix = FilterCondition::new("3", "name", FilterOperator::StartsWith).with_value("ab");
        let suffix = FilterCondition::new("4", "name", FilterOperator::EndsWith).with_value("yz");

        assert_eq!(
            compile_condition(&contains).unwrap(),
            json!({ "wildcard": { "name": { "value": r"*jo\**", "case_insensitive": true } } })
        );
        assert_eq!(
            compile_condition(&not_contains).unwrap(),
            json!({ "bool": { "must_not": {
                "wildcard": { "name": { "value": "*x*", "case_insensitive": true } }
            } } })
        );
        assert_eq!(
            compile_condition(&prefix).unwrap(),
            json!({ "prefix": { "name": { "value": "ab", "case_insensitive": true } } })
        );
        assert_eq!(
            compile_condition(&suffix).unwrap(),
            json!({ "wildcard": { "name": { "value": "*yz" } } })
        );
    }

    #[test]
    fn test_null_checks_use_exists() {
        let is_null = FilterCondition::new("1", "email", FilterOperator::IsNull);
        let not_null = FilterCondition::new("2", "email", FilterOperator::IsNotNull);

        assert_eq!(
            compile_condition(&is_null).unwrap(),
            json!({ "bool": { "must_not": { "exists": { "field": "email" } } } })
        );
        assert_eq!(
            compile_condition(&not_null).unwrap(),
            json!({ "exists": { "field": "email" } })
        );
    }

    #[test]
    fn test_between_range() {
        let between = FilterCondition::new("1", "price", FilterOperator::Between)
            .with_value(10)
            .with_value2(20);
        assert_eq!(
            compile_condition(&between).unwrap(),
            json!({ "range": { "price": { "gte": 10, "lte": 20 } } })
        );
    }

    #[test]
    fn test_search_body_match_all() {
        let options = SearchOptions {
            from: Some(0),
            size: Some(25),
            sort: vec![SortField {
                field: "created_at".to_string(),
                order: SortOrder::Desc,
            }],
        };

        assert_eq!(
            build_search_body(&[], LogicOp::And, &options),
            json!({
                "query": { "match_all": {} },
                "from": 0,
                "size": 25,
                "sort": [{ "created_at": { "order": "desc" } }]
            })
        );
    }
}
