//! Compiles filter lists into a MongoDB query document.

use crate::escape::escape_regex;
use model::filter::{FilterCondition, FilterOperator, LogicOp};
use serde_json::{Map, Value as Json, json};
use tracing::debug;

/// Builds the `find` filter document. No conditions produce `{}` (match
/// everything), a single condition is returned as is, and several are
/// wrapped in `$and` / `$or`.
pub fn compile(filters: &[FilterCondition], logic: LogicOp) -> Json {
    let mut clauses: Vec<Json> = filters.iter().filter_map(compile_condition).collect();

    match clauses.len() {
        0 => Json::Object(Map::new()),
        1 => clauses.remove(0),
        _ => {
            let key = match logic {
                LogicOp::And => "$and",
                LogicOp::Or => "$or",
            };
            let mut doc = Map::new();
            doc.insert(key.to_string(), Json::Array(clauses));
            Json::Object(doc)
        }
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

    let operator = condition.operator()?;
    let value = condition.value.as_ref();

    let predicate = match operator {
        FilterOperator::Equals => json!({ "$eq": value?.to_json() }),
        FilterOperator::NotEquals => json!({ "$ne": value?.to_json() }),
        FilterOperator::Contains => case_insensitive_regex(escape_regex(&value?.to_string())),
        FilterOperator::NotContains => {
            json!({ "$not": case_insensitive_regex(escape_regex(&value?.to_string())) })
        }
        FilterOperator::StartsWith => {
            case_insensitive_regex(format!("^{}", escape_regex(&value?.to_string())))
        }
        FilterOperator::EndsWith => {
            case_insensitive_regex(format!("{}$", escape_regex(&value?.to_string())))
        }
        FilterOperator::GreaterThan => json!({ "$gt": value?.to_json() }),
        FilterOperator::LessThan => json!({ "$lt": value?.to_json() }),
        FilterOperator::GreaterOrEqual => json!({ "$gte": value?.to_json() }),
        FilterOperator::LessOrEqual => json!({ "$lte": value?.to_json() }),
        FilterOperator::IsNull => json!({ "$eq": null }),
        FilterOperator::IsNotNull => json!({ "$ne": null }),
        FilterOperator::Between => json!({
            "$gte": value?.to_json(),
            "$lte": condition.value2.as_ref()?.to_json()
        }),
        FilterOperator::In => {
            let items: Vec<Json> = value?.to_list().iter().map(|item| item.to_json()).collect();
            if items.is_empty() {
                return None;
            }
            json!({ "$in": items })
        }
    };

    let mut clause = Map::new();
    clause.insert(condition.column_name.clone(), predicate);
    Some(Json::Object(clause))
}

fn case_insensitive_regex(pattern: String) -> Json {
    json!({ "$regex": pattern, "$options": "i" })
}
