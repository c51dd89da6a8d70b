use crate::{
    core::value::Value,
    error::ModelError,
    filter::operator::{FilterOperator, OperatorMetadata},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How the conditions of one filter list are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogicOp {
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl LogicOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
        }
    }
}

impl fmt::Display for LogicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogicOp {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(LogicOp::And),
            "OR" => Ok(LogicOp::Or),
            _ => Err(ModelError::UnknownLogic(s.to_string())),
        }
    }
}

/// The operator slot of a condition. Filter rows being edited can carry an
/// operator name this library does not know; it is kept verbatim so the
/// validator can report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionOperator {
    Known(FilterOperator),
    Unrecognized(String),
}

impl ConditionOperator {
    pub fn known(&self) -> Option<FilterOperator> {
        match self {
            ConditionOperator::Known(op) => Some(*op),
            ConditionOperator::Unrecognized(_) => None,
        }
    }
}

impl Default for ConditionOperator {
    fn default() -> Self {
        ConditionOperator::Unrecognized(String::new())
    }
}

impl From<FilterOperator> for ConditionOperator {
    fn from(op: FilterOperator) -> Self {
        ConditionOperator::Known(op)
    }
}

impl From<&str> for ConditionOperator {
    fn from(name: &str) -> Self {
        name.parse::<FilterOperator>()
            .map(ConditionOperator::Known)
            .unwrap_or_else(|_| ConditionOperator::Unrecognized(name.to_string()))
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionOperator::Known(op) => write!(f, "{op}"),
            ConditionOperator::Unrecognized(name) => write!(f, "{name}"),
        }
    }
}

/// One user-specified predicate over a single column or field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    /// Stable identifier used by the UI for diffing rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub column_name: String,
    #[serde(default)]
    pub operator: ConditionOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Upper bound of a `between` condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<Value>,
}

impl FilterCondition {
    pub fn new(
        id: impl Into<String>,
        column_name: impl Into<String>,
        operator: impl Into<ConditionOperator>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            column_name: column_name.into(),
            operator: operator.into(),
            value: None,
            value2: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_value2(mut self, value2: impl Into<Value>) -> Self {
        self.value2 = Some(value2.into());
        self
    }

    pub fn operator(&self) -> Option<FilterOperator> {
        self.operator.known()
    }

    pub fn metadata(&self) -> Option<&'static OperatorMetadata> {
        self.operator().map(|op| op.metadata())
    }

    /// A condition is complete when its column is named, its operator is
    /// known and every operand the operator declares is present.
    pub fn is_complete(&self) -> bool {
        if self.column_name.trim().is_empty() {
            return false;
        }

        match self.metadata() {
            Some(meta) => {
                (!meta.needs_value || self.value.is_some())
                    && (!meta.needs_two_values || self.value2.is_some())
            }
            None => false,
        }
    }
}
