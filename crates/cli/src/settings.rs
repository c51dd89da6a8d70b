//! Resolves compile settings from flags, then the environment, then
//! built-in defaults.

use crate::{
    env::{EnvManager, LOGIC_VAR, START_INDEX_VAR, TARGET_VAR},
    error::CliError,
};
use compiler::target::DbType;
use model::filter::LogicOp;

/// Values given on the command line. `None` falls through to the
/// environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub target: Option<String>,
    pub logic: Option<String>,
    pub start_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub target: DbType,
    pub logic: LogicOp,
    pub start_index: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: DbType::Postgres,
            logic: LogicOp::And,
            start_index: 1,
        }
    }
}

impl Settings {
    pub fn resolve(env: &EnvManager, overrides: &Overrides) -> Result<Self, CliError> {
        let defaults = Settings::default();

        let target = match overrides.target.as_deref().or(env.get(TARGET_VAR)) {
            Some(target) => target.parse::<DbType>()?,
            None => defaults.target,
        };

        let logic = match overrides.logic.as_deref().or(env.get(LOGIC_VAR)) {
            Some(logic) => logic.parse::<LogicOp>()?,
            None => defaults.logic,
        };

        let start_index = match overrides.start_index {
            Some(index) => index,
            None => match env.get(START_INDEX_VAR) {
                Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                    CliError::Config(format!("{START_INDEX_VAR} must be a positive integer, got '{raw}'"))
                })?,
                None => defaults.start_index,
            },
        };
        if start_index == 0 {
            return Err(CliError::Config("start index must be at least 1".to_string()));
        }

        Ok(Self {
            target,
            logic,
            start_index,
        })
    }
}
