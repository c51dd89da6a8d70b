//! A complete `SELECT * FROM table WHERE ...` built around a compiled filter.

use crate::sql::{
    CompileOptions, render_clauses,
    renderer::{PlaceholderStyle, Renderer},
};
use model::{
    core::value::Value,
    filter::{FilterCondition, LogicOp},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSelect {
    /// Table name, optionally schema qualified (`schema.table`).
    pub table: String,
    pub filters: Vec<FilterCondition>,
    pub logic: LogicOp,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Row limiting for [`build_select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectOptions {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct SelectBuilder {
    ast: FilteredSelect,
}

impl SelectBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            ast: FilteredSelect {
                table: table.to_string(),
                filters: Vec::new(),
                logic: LogicOp::And,
                limit: None,
                offset: None,
            },
        }
    }

    pub fn filters(mut self, filters: &[FilterCondition]) -> Self {
        self.ast.filters = filters.to_vec();
        self
    }

    pub fn logic(mut self, logic: LogicOp) -> Self {
        self.ast.logic = logic;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.ast.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.ast.offset = Some(offset);
        self
    }

    pub fn build(self) -> FilteredSelect {
        self.ast
    }
}

impl FilteredSelect {
    pub fn render(&self, options: &CompileOptions) -> SelectQuery {
        let mut r = Renderer::new(options, PlaceholderStyle::Dialect);
        let mut sql = String::from("SELECT * FROM ");
        sql.push_str(&r.quote_qualified(&self.table));

        let where_clause = render_clauses(&self.filters, self.logic, &mut r);
        if !where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }

        options.dialect.render_limit(&mut sql, self.limit, self.offset);

        let params = r.finish().into_iter().map(|(_, value)| value).collect();
        SelectQuery { sql, params }
    }
}

pub fn build_select(
    table: &str,
    filters: &[FilterCondition],
    logic: LogicOp,
    options: &CompileOptions,
    select_options: SelectOptions,
) -> SelectQuery {
    let select = FilteredSelect {
        table: table.to_string(),
        filters: filters.to_vec(),
        logic,
        limit: select_options.limit,
        offset: select_options.offset,
    };
    select.render(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::SqlDialect;
    use model::filter::FilterOperator;

    #[test]
    fn test_render_select_postgres() {
        let select = SelectBuilder::new("public.users")
            .filters(&[FilterCondition::new("1", "age", FilterOperator::GreaterThan).with_value(18)])
            .limit(50)
            .build();

        let query = select.render(&CompileOptions::new(SqlDialect::Postgres));

        assert_eq!(
            query.sql,
            r#"SELECT * FROM "public"."users" WHERE "age" > $1 LIMIT 50"#
        );
        assert_eq!(query.params, vec![Value::Int(18)]);
    }

    #[test]
    fn test_render_select_without_filters() {
        let query = SelectBuilder::new("users")
            .build()
            .render(&CompileOptions::new(SqlDialect::MySql));

        assert_eq!(query.sql, "SELECT * FROM `users`");
        assert!(query.params.is_empty());
    }

    #[test]
    fn test_render_select_sql_server_paging() {
        let query = SelectBuilder::new("dbo.orders")
            .filters(&[FilterCondition::new("1", "status", FilterOperator::Equals).with_value("open")])
            .limit(10)
            .offset(30)
            .build()
            .render(&CompileOptions::new(SqlDialect::SqlServer));

        assert_eq!(
            query.sql,
            "SELECT * FROM [dbo].[orders] WHERE [status] = @p1 \
             ORDER BY (SELECT NULL) OFFSET 30 ROWS FETCH NEXT 10 ROWS ONLY"
        );
    }

    #[test]
    fn test_build_select_offset_only() {
        let query = build_select(
            "events",
            &[FilterCondition::new("1", "kind", FilterOperator::IsNotNull)],
            LogicOp::Or,
            &CompileOptions::new(SqlDialect::Sqlite),
            SelectOptions {
                limit: None,
                offset: Some(5),
            },
        );

        assert_eq!(
            query.sql,
            r#"SELECT * FROM "events" WHERE "kind" IS NOT NULL LIMIT 9223372036854775807 OFFSET 5"#
        );
        assert!(query.params.is_empty());
    }
}
