//! Read-only and destructive statement detection.

use crate::{
    keywords::DANGEROUS_KEYWORDS,
    statements::split_statements,
    token::{Token, code_tokens},
};

pub const DELETE_ALL: &str = "DELETE_ALL";
pub const UPDATE_ALL: &str = "UPDATE_ALL";

/// True when every statement in `sql` only reads data. Empty input is not
/// read-only.
pub fn is_read_only_query(sql: &str) -> bool {
    let statements = split_statements(sql);
    !statements.is_empty()
        && statements
            .iter()
            .all(|statement| is_read_only_statement(&code_tokens(statement)))
}

fn is_read_only_statement(tokens: &[Token]) -> bool {
    let start = tokens.iter().take_while(|t| t.is_symbol("(")).count();
    let tokens = &tokens[start..];
    let Some(first) = tokens.first() else {
        return false;
    };

    match first.upper().as_str() {
        "WITH" => strip_cte_prefix(&tokens[1..]).is_some_and(is_read_only_statement),
        "EXPLAIN" | "SHOW" | "DESCRIBE" | "DESC" => true,
        // SELECT ... INTO creates a table.
        "SELECT" => !tokens.iter().any(|t| t.is_word("INTO")),
        _ => false,
    }
}

/// Skips `[RECURSIVE] name [(cols)] AS [[NOT] MATERIALIZED] (...) [, ...]`
/// and returns the main statement.
fn strip_cte_prefix<'t, 'a>(tokens: &'t [Token<'a>]) -> Option<&'t [Token<'a>]> {
    let mut i = usize::from(tokens.first()?.is_word("RECURSIVE"));

    loop {
        if !tokens.get(i)?.is_identifier() {
            return None;
        }
        i += 1;
        if tokens.get(i)?.is_symbol("(") {
            i = skip_parens(tokens, i)?;
        }
        if !tokens.get(i)?.is_word("AS") {
            return None;
        }
        i += 1;
        if tokens.get(i)?.is_word("NOT") {
            i += 1;
        }
        if tokens.get(i)?.is_word("MATERIALIZED") {
            i += 1;
        }
        if !tokens.get(i)?.is_symbol("(") {
            return None;
        }
        i = skip_parens(tokens, i)?;

        match tokens.get(i) {
            Some(t) if t.is_symbol(",") => i += 1,
            _ => return Some(&tokens[i..]),
        }
    }
}

/// Index just past the parenthesis matching the one at `open`.
fn skip_parens(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.is_symbol("(") {
            depth += 1;
        } else if token.is_symbol(")") {
            depth -= 1;
            if depth == 0 {
                return Some(i + 1);
            }
        }
    }
    None
}

/// Dangerous keywords found outside quotes and comments, followed by
/// [`DELETE_ALL`] / [`UPDATE_ALL`] when a `DELETE FROM` or `UPDATE ... SET`
/// statement has no `WHERE`.
pub fn detect_dangerous_operations(sql: &str) -> Vec<String> {
    let tokens = code_tokens(sql);
    let mut found: Vec<String> = DANGEROUS_KEYWORDS
        .iter()
        .filter(|keyword| tokens.iter().any(|t| t.is_word(keyword)))
        .map(|keyword| keyword.to_string())
        .collect();

    let mut delete_all = false;
    let mut update_all = false;
    for statement in split_statements(sql) {
        let tokens = code_tokens(&statement);
        delete_all |= is_delete_all(&tokens);
        update_all |= is_update_all(&tokens);
    }

    if delete_all {
        found.push(DELETE_ALL.to_string());
    }
    if update_all {
        found.push(UPDATE_ALL.to_string());
    }

    found
}

fn has_where(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| t.is_word("WHERE"))
}

fn is_delete_all(tokens: &[Token]) -> bool {
    tokens
        .windows(2)
        .any(|pair| pair[0].is_word("DELETE") && pair[1].is_word("FROM"))
        && !has_where(tokens)
}

fn is_update_all(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| t.is_word("UPDATE"))
        && tokens.iter().any(|t| t.is_word("SET"))
        && !has_where(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_is_read_only() {
        assert!(is_read_only_query("SELECT * FROM t"));
        assert!(is_read_only_query("(SELECT 1) UNION (SELECT 2)"));
        assert!(!is_read_only_query("SELECT * INTO bak FROM t"));
        assert!(!is_read_only_query("DELETE FROM t"));
        assert!(!is_read_only_query("   "));
    }

    #[test]
    fn test_inspection_statements_are_read_only() {
        assert!(is_read_only_query("EXPLAIN SELECT 1"));
        assert!(is_read_only_query("show tables"));
        assert!(is_read_only_query("DESCRIBE users"));
        assert!(is_read_only_query("desc users"));
    }

    #[test]
    fn test_with_checks_main_statement() {
        assert!(is_read_only_query(
            "WITH a AS (SELECT 1), b (x) AS (SELECT x FROM a) SELECT * FROM b"
        ));
        assert!(is_read_only_query(
            "WITH RECURSIVE r AS MATERIALIZED (SELECT 1) SELECT * FROM r"
        ));
        assert!(!is_read_only_query(
            "WITH old AS (SELECT id FROM t) DELETE FROM t WHERE id IN (SELECT id FROM old)"
        ));
        assert!(!is_read_only_query("WITH broken AS SELECT 1"));
    }

    #[test]
    fn test_every_statement_must_be_read_only() {
        assert!(is_read_only_query("SELECT 1; SELECT 2"));
        assert!(!is_read_only_query("SELECT 1; DROP TABLE t"));
    }

    #[test]
    fn test_into_inside_string_is_ignored() {
        assert!(is_read_only_query("SELECT 'INSERT INTO x' AS sample"));
    }

    #[test]
    fn test_detect_dangerous_operations() {
        assert_eq!(
            detect_dangerous_operations("DELETE FROM users; DROP TABLE logs"),
            vec!["DROP", "DELETE", "DELETE_ALL"]
        );
        assert_eq!(
            detect_dangerous_operations("UPDATE t SET a = 1"),
            vec!["UPDATE_ALL"]
        );
        assert!(detect_dangerous_operations("UPDATE t SET a = 1 WHERE id = 2").is_empty());
        assert!(detect_dangerous_operations("SELECT 'drop table x' -- delete\nFROM t").is_empty());
    }

    #[test]
    fn test_where_in_one_statement_does_not_cover_another() {
        assert_eq!(
            detect_dangerous_operations("DELETE FROM a WHERE id = 1; DELETE FROM b"),
            vec!["DELETE", "DELETE_ALL"]
        );
    }
}
