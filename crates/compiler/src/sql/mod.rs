//! Compiles filter lists into parameterized SQL `WHERE` fragments.

use crate::sql::{
    condition::render_condition,
    dialect::SqlDialect,
    renderer::{PlaceholderStyle, Renderer},
};
use model::{
    core::value::Value,
    filter::{FilterCondition, LogicOp},
};
use serde::Serialize;
use std::{collections::BTreeMap, fmt};

pub mod condition;
pub mod dialect;
pub mod renderer;
pub mod select;

/// Overrides the dialect's identifier quoting.
pub type QuoteFn = fn(&str) -> String;

#[derive(Clone, Copy)]
pub struct CompileOptions {
    pub dialect: SqlDialect,
    pub quote_identifier: Option<QuoteFn>,
    /// Index given to the first placeholder. Callers splicing the fragment
    /// after existing parameters start past them.
    pub start_index: usize,
}

impl CompileOptions {
    pub fn new(dialect: SqlDialect) -> Self {
        Self {
            dialect,
            quote_identifier: None,
            start_index: 1,
        }
    }

    pub fn quote_identifier(mut self, quote: QuoteFn) -> Self {
        self.quote_identifier = Some(quote);
        self
    }

    pub fn start_index(mut self, start_index: usize) -> Self {
        self.start_index = start_index;
        self
    }
}

impl fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOptions")
            .field("dialect", &self.dialect)
            .field("custom_quoting", &self.quote_identifier.is_some())
            .field("start_index", &self.start_index)
            .finish()
    }
}

/// A `WHERE` fragment with positional parameters.
///
/// An empty `where_clause` means "no filter" and must not be spliced into a
/// query as `WHERE `.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SqlFragment {
    pub where_clause: String,
    pub params: Vec<Value>,
}

impl SqlFragment {
    pub fn is_empty(&self) -> bool {
        self.where_clause.is_empty()
    }
}

/// A `WHERE` fragment with `@pN` placeholders and parameters keyed by name
/// (without the `@`).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NamedSqlFragment {
    pub where_clause: String,
    pub params: BTreeMap<String, Value>,
}

impl NamedSqlFragment {
    pub fn is_empty(&self) -> bool {
        self.where_clause.is_empty()
    }
}

/// Compiles `filters` for `options.dialect`. Conditions that are incomplete
/// or carry an unknown operator are skipped.
pub fn compile(filters: &[FilterCondition], logic: LogicOp, options: &CompileOptions) -> SqlFragment {
    let mut renderer = Renderer::new(options, PlaceholderStyle::Dialect);
    let where_clause = render_clauses(filters, logic, &mut renderer);
    let params = renderer.finish().into_iter().map(|(_, value)| value).collect();

    SqlFragment {
        where_clause,
        params,
    }
}

/// Same as [`compile`] but with named `@pN` placeholders, as SQL Server
/// drivers expect.
pub fn compile_named(
    filters: &[FilterCondition],
    logic: LogicOp,
    options: &CompileOptions,
) -> NamedSqlFragment {
    let mut renderer = Renderer::new(options, PlaceholderStyle::Named);
    let where_clause = render_clauses(filters, logic, &mut renderer);
    let params = renderer.finish().into_iter().collect();

    NamedSqlFragment {
        where_clause,
        params,
    }
}

pub(crate) fn render_clauses(
    filters: &[FilterCondition],
    logic: LogicOp,
    renderer: &mut Renderer,
) -> String {
    let separator = format!(" {} ", logic.as_str());
    filters
        .iter()
        .filter_map(|condition| render_condition(condition, renderer))
        .collect::<Vec<_>>()
        .join(&separator)
}
