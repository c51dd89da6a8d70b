//! Strict validation and normalization of filter conditions.
//!
//! The validator rejects what the compilers silently skip.

use crate::{
    core::value::Value,
    filter::{
        condition::{ConditionOperator, FilterCondition},
        operator::FilterOperator,
    },
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    /// Present only when `valid` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<FilterCondition>,
}

impl ValidationResult {
    fn invalid(errors: Vec<String>) -> Self {
        Self {
            valid: false,
            errors,
            normalized: None,
        }
    }

    fn valid(normalized: FilterCondition) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            normalized: Some(normalized),
        }
    }
}

pub fn validate(condition: &FilterCondition) -> ValidationResult {
    let mut errors = Vec::new();

    let has_id = condition
        .id
        .as_deref()
        .is_some_and(|id| !id.trim().is_empty());
    if !has_id {
        errors.push("Condition ID is required".to_string());
    }

    if condition.column_name.trim().is_empty() {
        errors.push("Column name is required".to_string());
    }

    let operator = match &condition.operator {
        ConditionOperator::Known(op) => Some(*op),
        ConditionOperator::Unrecognized(name) if name.trim().is_empty() => {
            errors.push("Operator is required".to_string());
            None
        }
        ConditionOperator::Unrecognized(name) => {
            errors.push(format!("Unknown operator: {name}"));
            None
        }
    };

    // Structural problems make the operand checks meaningless.
    let Some(operator) = operator.filter(|_| errors.is_empty()) else {
        return ValidationResult::invalid(errors);
    };

    let meta = operator.metadata();

    if meta.needs_value {
        match &condition.value {
            None => errors.push(format!("Value is required for operator '{operator}'")),
            Some(Value::String(s)) if s.trim().is_empty() && !allows_empty_string(operator) => {
                errors.push(format!("Value cannot be empty for operator '{operator}'"))
            }
            Some(_) => {}
        }
    }

    if meta.needs_two_values && condition.value2.is_none() {
        errors.push(format!("Second value is required for operator '{operator}'"));
    }

    if operator == FilterOperator::In
        && let Some(value) = &condition.value
        && value.to_string_list().is_empty()
    {
        errors.push("At least one value is required for operator 'in'".to_string());
    }

    if errors.is_empty() {
        ValidationResult::valid(normalize(condition))
    } else {
        ValidationResult::invalid(errors)
    }
}

pub fn validate_all(conditions: &[FilterCondition]) -> Vec<ValidationResult> {
    conditions.iter().map(validate).collect()
}

/// Matching the literal empty string is a legitimate equality filter.
fn allows_empty_string(operator: FilterOperator) -> bool {
    matches!(operator, FilterOperator::Equals | FilterOperator::NotEquals)
}

/// Trims string operands and rewrites the operand of an `in` condition into
/// a list of trimmed, non-empty strings. Normalizing twice is a no-op.
pub fn normalize(condition: &FilterCondition) -> FilterCondition {
    let mut normalized = condition.clone();

    normalized.value = match (condition.operator(), &condition.value) {
        (Some(FilterOperator::In), Some(value)) => Some(Value::from(value.to_string_list())),
        (_, value) => value.as_ref().map(Value::trimmed),
    };
    normalized.value2 = condition.value2.as_ref().map(Value::trimmed);

    normalized
}

/// A row whose operator needs an operand but has none worth compiling.
pub fn is_empty(condition: &FilterCondition) -> bool {
    let Some(meta) = condition.metadata() else {
        return false;
    };

    if !meta.needs_value {
        return false;
    }

    match &condition.value {
        None => true,
        Some(value) => value.is_blank(),
    }
}

/// Drops half-entered rows before compiling.
pub fn drop_empty(conditions: &[FilterCondition]) -> Vec<FilterCondition> {
    conditions
        .iter()
        .filter(|condition| !is_empty(condition))
        .cloned()
        .collect()
}
