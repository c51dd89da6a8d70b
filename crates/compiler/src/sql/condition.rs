//! Lowering of a single filter condition into a SQL predicate.

use crate::sql::renderer::Renderer;
use model::{
    core::value::Value,
    filter::{FilterCondition, FilterOperator},
};
use tracing::debug;

/// Renders one condition, or `None` when it cannot contribute a predicate
/// (incomplete row, unknown operator, or an `in` list that resolves empty).
pub fn render_condition(condition: &FilterCondition, r: &mut Renderer) -> Option<String> {
    if !condition.is_complete() {
        debug!(
            column = %condition.column_name,
            operator = %condition.operator,
            "skipping incomplete filter condition"
        );
        return None;
    }

    let operator = condition.operator()?;
    let column = r.quote(&condition.column_name);
    let value = condition.value.clone();

    let clause = match operator {
        FilterOperator::Equals => format!("{column} = {}", r.add_param(value?)),
        FilterOperator::NotEquals => format!("{column} != {}", r.add_param(value?)),
        FilterOperator::Contains | FilterOperator::NotContains => {
            let negated = operator == FilterOperator::NotContains;
            let target = r.dialect().text_cast(&column);
            let like = r.dialect().like_operator(negated);
            let pattern = format!("%{}%", value?);
            format!("{target} {like} {}", r.add_param(Value::String(pattern)))
        }
        FilterOperator::StartsWith => {
            let pattern = format!("{}%", value?);
            format!("{column} LIKE {}", r.add_param(Value::String(pattern)))
        }
        FilterOperator::EndsWith => {
            let pattern = format!("%{}", value?);
            format!("{column} LIKE {}", r.add_param(Value::String(pattern)))
        }
        FilterOperator::GreaterThan => format!("{column} > {}", r.add_param(value?)),
        FilterOperator::LessThan => format!("{column} < {}", r.add_param(value?)),
        FilterOperator::GreaterOrEqual => format!("{column} >= {}", r.add_param(value?)),
        FilterOperator::LessOrEqual => format!("{column} <= {}", r.add_param(value?)),
        FilterOperator::IsNull => format!("{column} IS NULL"),
        FilterOperator::IsNotNull => format!("{column} IS NOT NULL"),
        FilterOperator::Between => {
            let low = r.add_param(value?);
            let high = r.add_param(condition.value2.clone()?);
            format!("{column} BETWEEN {low} AND {high}")
        }
        FilterOperator::In => {
            let items = value?.to_list();
            if items.is_empty() {
                debug!(column = %condition.column_name, "skipping empty IN list");
                return None;
            }
            let placeholders = items
                .into_iter()
                .map(|item| r.add_param(item))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{column} IN ({placeholders})")
        }
    };

    Some(clause)
}
