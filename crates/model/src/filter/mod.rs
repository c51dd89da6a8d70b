pub mod condition;
pub mod operator;
pub mod validator;

pub use condition::{ConditionOperator, FilterCondition, LogicOp};
pub use operator::{FilterOperator, OperatorMetadata, metadata_of, operators_for_column_type};
