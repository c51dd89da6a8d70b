//! Clause-per-line SQL pretty printing.

use crate::{
    keywords::{JOIN_MODIFIERS, is_keyword},
    scanner::scan_strict,
    token::{Token, TokenKind, tokenize},
};
use tracing::trace;

const CLAUSE_KEYWORDS: [&str; 9] = [
    "SELECT", "FROM", "WHERE", "HAVING", "LIMIT", "UNION", "VALUES", "SET", "JOIN",
];

/// Puts every top-level clause on its own line and uppercases keywords.
/// Text that ends inside a quote or block comment is returned unchanged.
pub fn format_sql(sql: &str) -> String {
    if let Err(err) = scan_strict(sql) {
        trace!(%err, "leaving unscannable SQL unformatted");
        return sql.to_string();
    }

    let tokens = tokenize(sql);
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    let mut depth = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        if depth == 0 && starts_clause(&tokens, i) && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }

        if !line.is_empty() && needs_space_before(&tokens, i) {
            line.push(' ');
        }

        if token.kind == TokenKind::Word && is_keyword(token.text) {
            line.push_str(&token.upper());
        } else {
            line.push_str(token.text);
        }

        match token.text {
            "(" if token.kind == TokenKind::Symbol => depth += 1,
            ")" if token.kind == TokenKind::Symbol => depth = depth.saturating_sub(1),
            _ => {}
        }

        if token.kind == TokenKind::Comment && token.text.starts_with("--") {
            lines.push(std::mem::take(&mut line));
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines.join("\n")
}

fn starts_clause(tokens: &[Token], i: usize) -> bool {
    let token = &tokens[i];
    if token.kind != TokenKind::Word {
        return false;
    }

    let next_word = next_code(tokens, i);
    let upper = token.upper();

    if upper == "GROUP" || upper == "ORDER" {
        return next_word.is_some_and(|t| t.is_word("BY"));
    }
    if JOIN_MODIFIERS.contains(&upper.as_str()) {
        return next_word.is_some_and(|t| t.is_word("JOIN") || t.is_word("OUTER"));
    }
    if upper == "JOIN" {
        let modified = previous_code(tokens, i).is_some_and(|t| {
            t.is_word("OUTER") || JOIN_MODIFIERS.iter().any(|m| t.is_word(m))
        });
        return !modified;
    }

    CLAUSE_KEYWORDS.contains(&upper.as_str())
}

fn next_code<'t, 'a>(tokens: &'t [Token<'a>], i: usize) -> Option<&'t Token<'a>> {
    tokens[i + 1..].iter().find(|t| t.kind != TokenKind::Comment)
}

fn previous_code<'t, 'a>(tokens: &'t [Token<'a>], i: usize) -> Option<&'t Token<'a>> {
    tokens[..i].iter().rev().find(|t| t.kind != TokenKind::Comment)
}

fn needs_space_before(tokens: &[Token], i: usize) -> bool {
    let token = &tokens[i];
    let Some(previous) = i.checked_sub(1).map(|p| &tokens[p]) else {
        return false;
    };

    if token.is_symbol(",") || token.is_symbol(")") || token.is_symbol(".") || token.is_symbol(";")
    {
        return false;
    }
    if previous.is_symbol("(") || previous.is_symbol(".") {
        return false;
    }
    // Function calls keep their parenthesis attached.
    if token.is_symbol("(") {
        let is_call = previous.kind == TokenKind::QuotedIdent
            || (previous.kind == TokenKind::Word && !is_keyword(previous.text));
        return !is_call;
    }
    true
}
