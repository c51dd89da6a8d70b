//! Operator registry: the single table describing every filter operator's
//! arity and the column types it applies to.

use crate::{core::data_type::ColumnTypeCategory, error::ModelError};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    IsNull,
    IsNotNull,
    Between,
    In,
}

impl FilterOperator {
    /// Every operator, in declaration order.
    pub const ALL: [FilterOperator; 14] = [
        FilterOperator::Equals,
        FilterOperator::NotEquals,
        FilterOperator::Contains,
        FilterOperator::NotContains,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
        FilterOperator::GreaterThan,
        FilterOperator::LessThan,
        FilterOperator::GreaterOrEqual,
        FilterOperator::LessOrEqual,
        FilterOperator::IsNull,
        FilterOperator::IsNotNull,
        FilterOperator::Between,
        FilterOperator::In,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "not_equals",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "not_contains",
            FilterOperator::StartsWith => "starts_with",
            FilterOperator::EndsWith => "ends_with",
            FilterOperator::GreaterThan => "greater_than",
            FilterOperator::LessThan => "less_than",
            FilterOperator::GreaterOrEqual => "greater_or_equal",
            FilterOperator::LessOrEqual => "less_or_equal",
            FilterOperator::IsNull => "is_null",
            FilterOperator::IsNotNull => "is_not_null",
            FilterOperator::Between => "between",
            FilterOperator::In => "in",
        }
    }

    pub fn metadata(&self) -> &'static OperatorMetadata {
        metadata_of(*self)
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterOperator::ALL
            .iter()
            .find(|op| op.as_str() == s)
            .copied()
            .ok_or_else(|| ModelError::UnknownOperator(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorMetadata {
    pub operator: FilterOperator,
    pub label: &'static str,
    pub needs_value: bool,
    pub needs_two_values: bool,
    /// The operand is a list, entered as comma separated text in the UI.
    pub needs_comma_separated: bool,
    pub applicable_types: &'static [ColumnTypeCategory],
}

impl OperatorMetadata {
    /// Number of operands a complete condition carries.
    pub fn arity(&self) -> usize {
        match (self.needs_value, self.needs_two_values) {
            (false, _) => 0,
            (true, false) => 1,
            (true, true) => 2,
        }
    }

    pub fn applies_to(&self, category: ColumnTypeCategory) -> bool {
        self.applicable_types
            .iter()
            .any(|applicable| applicable.admits(category))
    }
}

const ANY: &[ColumnTypeCategory] = &[ColumnTypeCategory::Any];
const TEXT: &[ColumnTypeCategory] = &[ColumnTypeCategory::String];
const ORDERED: &[ColumnTypeCategory] = &[ColumnTypeCategory::Number, ColumnTypeCategory::Date];
const LISTABLE: &[ColumnTypeCategory] = &[ColumnTypeCategory::String, ColumnTypeCategory::Number];

lazy_static! {
    /// Indexed by `FilterOperator as usize`.
    static ref OPERATOR_REGISTRY: Vec<OperatorMetadata> = build_registry();
}

fn build_registry() -> Vec<OperatorMetadata> {
    FilterOperator::ALL.iter().map(|op| describe(*op)).collect()
}

fn describe(operator: FilterOperator) -> OperatorMetadata {
    let (label, needs_value, needs_two_values, needs_comma_separated, applicable_types) =
        match operator {
            FilterOperator::Equals => ("Equals", true, false, false, ANY),
            FilterOperator::NotEquals => ("Not equals", true, false, false, ANY),
            FilterOperator::Contains => ("Contains", true, false, false, TEXT),
            FilterOperator::NotContains => ("Does not contain", true, false, false, TEXT),
            FilterOperator::StartsWith => ("Starts with", true, false, false, TEXT),
            FilterOperator::EndsWith => ("Ends with", true, false, false, TEXT),
            FilterOperator::GreaterThan => ("Greater than", true, false, false, ORDERED),
            FilterOperator::LessThan => ("Less than", true, false, false, ORDERED),
            FilterOperator::GreaterOrEqual => ("Greater or equal", true, false, false, ORDERED),
            FilterOperator::LessOrEqual => ("Less or equal", true, false, false, ORDERED),
            FilterOperator::IsNull => ("Is null", false, false, false, ANY),
            FilterOperator::IsNotNull => ("Is not null", false, false, false, ANY),
            FilterOperator::Between => ("Between", true, true, false, ORDERED),
            FilterOperator::In => ("In list", true, false, true, LISTABLE),
        };

    OperatorMetadata {
        operator,
        label,
        needs_value,
        needs_two_values,
        needs_comma_separated,
        applicable_types,
    }
}

pub fn metadata_of(operator: FilterOperator) -> &'static OperatorMetadata {
    &OPERATOR_REGISTRY[operator as usize]
}

const STRING_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::Contains,
    FilterOperator::NotContains,
    FilterOperator::StartsWith,
    FilterOperator::EndsWith,
    FilterOperator::In,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

const NUMBER_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::GreaterThan,
    FilterOperator::LessThan,
    FilterOperator::GreaterOrEqual,
    FilterOperator::LessOrEqual,
    FilterOperator::Between,
    FilterOperator::In,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

const DATE_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::GreaterThan,
    FilterOperator::LessThan,
    FilterOperator::GreaterOrEqual,
    FilterOperator::LessOrEqual,
    FilterOperator::Between,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

const BOOLEAN_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

pub fn operators_for_category(category: ColumnTypeCategory) -> &'static [FilterOperator] {
    match category {
        ColumnTypeCategory::Number => NUMBER_OPERATORS,
        ColumnTypeCategory::Date => DATE_OPERATORS,
        ColumnTypeCategory::Boolean => BOOLEAN_OPERATORS,
        ColumnTypeCategory::String | ColumnTypeCategory::Any => STRING_OPERATORS,
    }
}

/// Ordered operator list for a column's declared type name.
pub fn operators_for_column_type(type_name: &str) -> &'static [FilterOperator] {
    operators_for_category(ColumnTypeCategory::classify(type_name))
}
