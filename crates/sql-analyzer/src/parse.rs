//! Best-effort description of a single SQL statement.

use crate::{
    keywords::is_keyword,
    token::{Token, TokenKind, code_tokens},
};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Alter,
    Drop,
    Truncate,
    With,
    Explain,
    Show,
    Describe,
    Grant,
    Revoke,
    Unknown,
}

impl StatementType {
    fn from_keyword(word: &str) -> Self {
        match word.to_ascii_uppercase().as_str() {
            "SELECT" => StatementType::Select,
            "INSERT" => StatementType::Insert,
            "UPDATE" => StatementType::Update,
            "DELETE" => StatementType::Delete,
            "CREATE" => StatementType::Create,
            "ALTER" => StatementType::Alter,
            "DROP" => StatementType::Drop,
            "TRUNCATE" => StatementType::Truncate,
            "WITH" => StatementType::With,
            "EXPLAIN" => StatementType::Explain,
            "SHOW" => StatementType::Show,
            "DESCRIBE" | "DESC" => StatementType::Describe,
            "GRANT" => StatementType::Grant,
            "REVOKE" => StatementType::Revoke,
            _ => StatementType::Unknown,
        }
    }

    pub fn is_modifying(&self) -> bool {
        matches!(
            self,
            StatementType::Insert
                | StatementType::Update
                | StatementType::Delete
                | StatementType::Create
                | StatementType::Alter
                | StatementType::Drop
                | StatementType::Truncate
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::Select => "SELECT",
            StatementType::Insert => "INSERT",
            StatementType::Update => "UPDATE",
            StatementType::Delete => "DELETE",
            StatementType::Create => "CREATE",
            StatementType::Alter => "ALTER",
            StatementType::Drop => "DROP",
            StatementType::Truncate => "TRUNCATE",
            StatementType::With => "WITH",
            StatementType::Explain => "EXPLAIN",
            StatementType::Show => "SHOW",
            StatementType::Describe => "DESCRIBE",
            StatementType::Grant => "GRANT",
            StatementType::Revoke => "REVOKE",
            StatementType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedSql {
    pub statement_type: StatementType,
    pub tables: Vec<String>,
    pub columns: Vec<String>,
    pub has_where: bool,
    pub has_limit: bool,
    pub has_order_by: bool,
    pub is_modifying: bool,
    pub sql: String,
}

pub fn parse_sql(sql: &str) -> ParsedSql {
    let tokens = code_tokens(sql);
    let statement_type = classify(&tokens);

    let columns = if statement_type == StatementType::Select || statement_type == StatementType::With
    {
        select_columns(&tokens)
    } else {
        Vec::new()
    };

    ParsedSql {
        statement_type,
        tables: tables_in(&tokens),
        columns,
        has_where: tokens.iter().any(|t| t.is_word("WHERE")),
        has_limit: has_limit(&tokens),
        has_order_by: followed_by(&tokens, "ORDER", "BY"),
        is_modifying: statement_type.is_modifying(),
        sql: sql.to_string(),
    }
}

/// Classifies by the first keyword, ignoring leading parentheses.
pub fn statement_type(sql: &str) -> StatementType {
    classify(&code_tokens(sql))
}

/// Table names referenced by `FROM`, `JOIN`, `INSERT INTO` and `UPDATE`,
/// unqualified and unquoted, in order of first appearance.
pub fn extract_tables(sql: &str) -> Vec<String> {
    tables_in(&code_tokens(sql))
}

fn classify(tokens: &[Token]) -> StatementType {
    tokens
        .iter()
        .find(|t| !t.is_symbol("("))
        .filter(|t| t.kind == TokenKind::Word)
        .map_or(StatementType::Unknown, |t| StatementType::from_keyword(t.text))
}

fn followed_by(tokens: &[Token], first: &str, second: &str) -> bool {
    tokens
        .windows(2)
        .any(|pair| pair[0].is_word(first) && pair[1].is_word(second))
}

fn has_limit(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| t.is_word("LIMIT"))
        || followed_by(tokens, "FETCH", "FIRST")
        || followed_by(tokens, "FETCH", "NEXT")
}

fn tables_in(tokens: &[Token]) -> Vec<String> {
    let mut tables: Vec<String> = Vec::new();
    // One entry per open parenthesis: true when it opens a function call.
    let mut parens: Vec<bool> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if token.is_symbol("(") {
            let is_call = i > 0
                && tokens[i - 1].is_identifier()
                && !(tokens[i - 1].kind == TokenKind::Word && is_keyword(tokens[i - 1].text));
            parens.push(is_call);
            continue;
        }
        if token.is_symbol(")") {
            parens.pop();
            continue;
        }
        // `EXTRACT(YEAR FROM ts)` and friends.
        if parens.last() == Some(&true) {
            continue;
        }

        let start = i + 1;
        let found = if token.is_word("FROM") {
            table_list(tokens, start)
        } else if token.is_word("JOIN") || token.is_word("UPDATE") {
            table_ref(tokens, start).map(|(name, _)| vec![name]).unwrap_or_default()
        } else if token.is_word("INTO") && i > 0 && tokens[i - 1].is_word("INSERT") {
            table_ref(tokens, start).map(|(name, _)| vec![name]).unwrap_or_default()
        } else {
            continue;
        };

        for name in found {
            if !tables.contains(&name) {
                tables.push(name);
            }
        }
    }

    tables
}

/// `a, b AS x, schema.c y`
fn table_list(tokens: &[Token], mut i: usize) -> Vec<String> {
    let mut names = Vec::new();
    while let Some((name, next)) = table_ref(tokens, i) {
        names.push(name);
        match tokens.get(next) {
            Some(t) if t.is_symbol(",") => i = next + 1,
            _ => break,
        }
    }
    names
}

/// Reads a possibly qualified, possibly aliased table reference starting at
/// `i`. Returns the bare table name and the index after the alias.
fn table_ref(tokens: &[Token], i: usize) -> Option<(String, usize)> {
    let first = tokens.get(i)?;
    // Subqueries and keywords (`DELETE FROM WHERE`) are not tables.
    if !first.is_identifier() || (first.kind == TokenKind::Word && is_keyword(first.text)) {
        return None;
    }

    let mut name = first.unquoted();
    let mut j = i + 1;
    while let (Some(dot), Some(part)) = (tokens.get(j), tokens.get(j + 1)) {
        if !dot.is_symbol(".") || !part.is_identifier() {
            break;
        }
        name = part.unquoted();
        j += 2;
    }

    match tokens.get(j) {
        Some(t) if t.is_word("AS") => j += 2,
        Some(t) if t.kind == TokenKind::QuotedIdent => j += 1,
        Some(t) if t.kind == TokenKind::Word && !is_keyword(t.text) => j += 1,
        _ => {}
    }

    Some((name, j))
}

fn select_columns(tokens: &[Token]) -> Vec<String> {
    let mut depth = 0usize;
    let mut select_at = None;
    for (i, token) in tokens.iter().enumerate() {
        if token.is_symbol("(") {
            depth += 1;
        } else if token.is_symbol(")") {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && token.is_word("SELECT") {
            select_at = Some(i);
            break;
        }
    }
    let Some(select_at) = select_at else {
        return Vec::new();
    };

    let mut i = select_at + 1;
    while let Some(t) = tokens.get(i) {
        if t.is_word("DISTINCT") || t.is_word("ALL") {
            i += 1;
        } else if t.is_word("TOP") {
            // TOP n or TOP (n)
            i += if tokens.get(i + 1).is_some_and(|t| t.is_symbol("(")) { 4 } else { 2 };
        } else {
            break;
        }
    }

    let mut columns = Vec::new();
    let mut expression: Vec<Token> = Vec::new();
    let mut depth = 0usize;

    for token in tokens.iter().skip(i) {
        if depth == 0 && is_select_list_end(token) {
            break;
        }
        if token.is_symbol("(") {
            depth += 1;
        } else if token.is_symbol(")") {
            depth = depth.saturating_sub(1);
        }
        if depth == 0 && token.is_symbol(",") {
            columns.extend(column_name(&expression));
            expression.clear();
        } else {
            expression.push(*token);
        }
    }
    columns.extend(column_name(&expression));

    columns
}

fn is_select_list_end(token: &Token) -> bool {
    token.is_symbol(";")
        || ["FROM", "INTO", "WHERE", "GROUP", "ORDER", "LIMIT", "UNION", "HAVING"]
            .iter()
            .any(|word| token.is_word(word))
}

/// Alias, then trailing `.column`, then a bare identifier. Anything else
/// (literals, arithmetic, unaliased calls) has no name.
fn column_name(expression: &[Token]) -> Option<String> {
    match expression {
        [] => None,
        [only] if only.is_symbol("*") => Some("*".to_string()),
        [.., as_kw, alias] if as_kw.is_word("AS") && alias.is_identifier() => {
            Some(alias.unquoted())
        }
        [.., dot, column] if dot.is_symbol(".") && column.is_identifier() => {
            Some(column.unquoted())
        }
        [only] if only.kind == TokenKind::QuotedIdent => Some(only.unquoted()),
        [only] if only.kind == TokenKind::Word && !is_keyword(only.text) => {
            Some(only.text.to_string())
        }
        _ => None,
    }
}
