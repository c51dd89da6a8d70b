//! Statement splitting and minification.

use crate::scanner::{SegmentKind, scan};

/// Splits `sql` on `;` outside quotes and comments.
///
/// Comments are dropped, string literals are kept verbatim, and only
/// statements with non-blank text are returned. A last statement without a
/// terminating `;` is still returned.
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for segment in scan(sql) {
        match segment.kind {
            SegmentKind::Code => {
                let mut parts = segment.text.split(';');
                if let Some(first) = parts.next() {
                    current.push_str(first);
                }
                for part in parts {
                    push_statement(&mut statements, &current);
                    current.clear();
                    current.push_str(part);
                }
            }
            SegmentKind::SingleQuoted | SegmentKind::DoubleQuoted => current.push_str(segment.text),
            SegmentKind::LineComment => {}
            SegmentKind::BlockComment => current.push(' '),
        }
    }
    push_statement(&mut statements, &current);

    statements
}

fn push_statement(statements: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}

pub fn has_multiple_statements(sql: &str) -> bool {
    split_statements(sql).len() > 1
}

/// Strips comments, collapses whitespace to single spaces and removes the
/// spaces around commas and parentheses. Quoted text is left untouched.
pub fn minify(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut pending_space = false;

    for segment in scan(sql) {
        match segment.kind {
            SegmentKind::LineComment | SegmentKind::BlockComment => pending_space = true,
            SegmentKind::SingleQuoted | SegmentKind::DoubleQuoted => {
                emit_space(&mut out, &mut pending_space, '\'');
                out.push_str(segment.text);
            }
            SegmentKind::Code => {
                for c in segment.text.chars() {
                    if c.is_whitespace() {
                        pending_space = true;
                    } else {
                        emit_space(&mut out, &mut pending_space, c);
                        out.push(c);
                    }
                }
            }
        }
    }

    out
}

fn emit_space(out: &mut String, pending: &mut bool, next: char) {
    let tight = |c: char| matches!(c, ',' | '(' | ')');
    if *pending && out.chars().next_back().is_some_and(|last| !tight(last)) && !tight(next) {
        out.push(' ');
    }
    *pending = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_two_statements() {
        assert_eq!(
            split_statements("SELECT 1; SELECT 2;"),
            vec!["SELECT 1".to_string(), "SELECT 2".to_string()]
        );
    }

    #[test]
    fn test_split_ignores_semicolon_in_literal() {
        assert_eq!(
            split_statements("SELECT ';' FROM t"),
            vec!["SELECT ';' FROM t".to_string()]
        );
    }

    #[test]
    fn test_split_ignores_semicolon_in_comments() {
        let sql = "SELECT 1 -- a; b\n; /* ; */ UPDATE t SET x = 1";
        assert_eq!(
            split_statements(sql),
            vec!["SELECT 1".to_string(), "UPDATE t SET x = 1".to_string()]
        );
    }

    #[test]
    fn test_split_skips_blank_statements() {
        assert!(split_statements(" ; ;\n").is_empty());
        assert!(!has_multiple_statements("SELECT 1;"));
        assert!(has_multiple_statements("SELECT 1; SELECT 2"));
    }

    #[test]
    fn test_minify() {
        let sql = "SELECT  a ,\n  b -- trailing\nFROM t /* c */ WHERE f ( x ) = 'a  b'";
        assert_eq!(minify(sql), "SELECT a,b FROM t WHERE f(x)= 'a  b'");
    }

    #[test]
    fn test_minify_keeps_space_before_literal() {
        assert_eq!(minify("  WHERE name =\n\n'x'  "), "WHERE name = 'x'");
    }
}
