use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown filter operator: {0}")]
    UnknownOperator(String),

    #[error("Unknown logic operator '{0}', expected AND or OR")]
    UnknownLogic(String),
}
