//! Compiles filter lists into a CQL `WHERE` fragment.
//!
//! CQL has no `OR` and no negated pattern match. OR logic degrades to AND
//! and `not_contains` conditions are dropped; both cases are logged and
//! reported in [`CqlFragment::warnings`] so the caller can filter the rows
//! client-side.

use crate::escape::quote_with;
use model::{
    core::value::Value,
    filter::{FilterCondition, FilterOperator, LogicOp},
};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CqlFragment {
    pub where_clause: String,
    pub params: Vec<Value>,
    pub warnings: Vec<String>,
}

impl CqlFragment {
    pub fn is_empty(&self) -> bool {
        self.where_clause.is_empty()
    }
}

pub fn quote_identifier(ident: &str) -> String {
    quote_with(ident, '"', '"')
}

pub fn compile(filters: &[FilterCondition], logic: LogicOp) -> CqlFragment {
    let mut fragment = CqlFragment::default();

    if logic == LogicOp::Or {
        warn!("CQL does not support OR, combining filter conditions with AND");
        fragment
            .warnings
            .push("CQL does not support OR; conditions were combined with AND".to_string());
    }

    let mut clauses = Vec::new();
    for condition in filters {
        if let Some(clause) = compile_condition(condition, &mut fragment) {
            clauses.push(clause);
        }
    }

    fragment.where_clause = clauses.join(" AND ");
    fragment
}

fn compile_condition(condition: &FilterCondition, fragment: &mut CqlFragment) -> Option<String> {
    if !condition.is_complete() {
        debug!(
            column = %condition.column_name,
            operator = %condition.operator,
            "skipping incomplete filter condition"
        );
        return None;
    }

    let operator = condition.operator()?;
    let column = quote_identifier(&condition.column_name);
    let value = condition.value.clone();
    let params = &mut fragment.params;

    let clause = match operator {
        FilterOperator::Equals => bind(params, format!("{column} = ?"), value?),
        FilterOperator::NotEquals => bind(params, format!("{column} != ?"), value?),
        FilterOperator::Contains => {
            let pattern = Value::String(format!("%{}%", value?));
            bind(params, format!("{column} LIKE ?"), pattern)
        }
        FilterOperator::NotContains => {
            warn!(column = %condition.column_name, "CQL cannot express NOT LIKE, condition skipped");
            fragment.warnings.push(format!(
                "not_contains on '{}' is not supported by CQL and must be applied client-side",
                condition.column_name
            ));
            return None;
        }
        FilterOperator::StartsWith => {
            let pattern = Value::String(format!("{}%", value?));
            bind(params, format!("{column} LIKE ?"), pattern)
        }
        FilterOperator::EndsWith => {
            let pattern = Value::String(format!("%{}", value?));
            bind(params, format!("{column} LIKE ?"), pattern)
        }
        FilterOperator::GreaterThan => bind(params, format!("{column} > ?"), value?),
        FilterOperator::LessThan => bind(params, format!("{column} < ?"), value?),
        FilterOperator::GreaterOrEqual => bind(params, format!("{column} >= ?"), value?),
        FilterOperator::LessOrEqual => bind(params, format!("{column} <= ?"), value?),
        FilterOperator::IsNull => format!("{column} IS NULL"),
        FilterOperator::IsNotNull => format!("{column} IS NOT NULL"),
        FilterOperator::Between => {
            // CQL has no BETWEEN.
            params.push(value?);
            params.push(condition.value2.clone()?);
            format!("{column} >= ? AND {column} <= ?")
        }
        FilterOperator::In => {
            let items = value?.to_list();
            if items.is_empty() {
                return None;
            }
            let placeholders = vec!["?"; items.len()].join(", ");
            params.extend(items);
            format!("{column} IN ({placeholders})")
        }
    };

    Some(clause)
}

fn bind(params: &mut Vec<Value>, clause: String, value: Value) -> String {
    params.push(value);
    clause
}

/// Advisory check for whether the compiled query will probably need
/// `ALLOW FILTERING`.
///
/// This looks only at the operators in use. It knows nothing about the
/// table's partition and clustering keys, so an equality filter on a
/// non-key column still needs `ALLOW FILTERING` even though this returns
/// false, and a range on a clustering column may not need it even though
/// this returns true. Treat the answer as a hint.
pub fn needs_allow_filtering(filters: &[FilterCondition]) -> bool {
    filters
        .iter()
        .filter(|condition| condition.is_complete())
        .filter_map(FilterCondition::operator)
        .any(|op| {
            !matches!(
                op,
                FilterOperator::Equals | FilterOperator::In | FilterOperator::NotContains
            )
        })
}
