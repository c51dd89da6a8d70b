use crate::{
    errors::{IssueKind, SourcePosition, SqlValidation, ValidationIssue},
    safety::{DELETE_ALL, UPDATE_ALL, detect_dangerous_operations},
    scanner::scan_strict,
    token::code_tokens,
};

/// Checks that `sql` is non-empty with balanced quotes and parentheses.
/// Destructive statements add warnings but leave the result valid.
pub fn validate(sql: &str) -> SqlValidation {
    let mut result = SqlValidation::new();

    if sql.trim().is_empty() {
        result.add_issue(ValidationIssue::error(IssueKind::EmptyQuery, None));
        return result;
    }

    if let Err(err) = scan_strict(sql) {
        result.add_issue(err.into());
    }

    check_parentheses(sql, &mut result);

    for operation in detect_dangerous_operations(sql) {
        let kind = match operation.as_str() {
            DELETE_ALL => IssueKind::DeleteWithoutWhere,
            UPDATE_ALL => IssueKind::UpdateWithoutWhere,
            _ => IssueKind::DangerousKeyword { keyword: operation },
        };
        result.add_issue(ValidationIssue::warning(kind));
    }

    result
}

fn check_parentheses(sql: &str, result: &mut SqlValidation) {
    let mut open = Vec::new();

    for token in code_tokens(sql) {
        if token.is_symbol("(") {
            open.push(token.offset);
        } else if token.is_symbol(")") && open.pop().is_none() {
            result.add_issue(ValidationIssue::error(
                IssueKind::UnmatchedCloseParen,
                Some(SourcePosition::at(sql, token.offset)),
            ));
            return;
        }
    }

    if let Some(&offset) = open.last() {
        result.add_issue(ValidationIssue::error(
            IssueKind::UnclosedParen,
            Some(SourcePosition::at(sql, offset)),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_query() {
        let result = validate("SELECT * FROM users WHERE id = 1");
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_empty_query() {
        let result = validate("  \n ");
        assert!(!result.valid);
        assert_eq!(result.errors[0].kind, IssueKind::EmptyQuery);
    }

    #[test]
    fn test_unbalanced_quote_reports_opening_position() {
        let sql = "SELECT * FROM users WHERE id = '1";
        let result = validate(sql);

        assert!(!result.valid);
        assert!(result.errors[0].message.contains("quote"));
        assert_eq!(
            result.position,
            Some(SourcePosition {
                line: 1,
                column: 32,
                offset: 31
            })
        );
    }

    #[test]
    fn test_balanced_escaped_quotes() {
        assert!(validate("SELECT 'it''s' FROM t").valid);
    }

    #[test]
    fn test_unmatched_close_paren() {
        let result = validate("SELECT (1))");
        assert_eq!(result.errors[0].kind, IssueKind::UnmatchedCloseParen);
        assert_eq!(result.position.map(|p| p.offset), Some(10));
    }

    #[test]
    fn test_unclosed_paren_reports_last_open() {
        let result = validate("SELECT ((1)\n, (2");
        assert_eq!(result.errors[0].kind, IssueKind::UnclosedParen);
        assert_eq!(
            result.position,
            Some(SourcePosition {
                line: 2,
                column: 3,
                offset: 14
            })
        );
    }

    #[test]
    fn test_parens_in_literals_are_ignored() {
        assert!(validate("SELECT ')' FROM t -- (").valid);
    }

    #[test]
    fn test_dangerous_statement_is_valid_with_warnings() {
        let result = validate("DELETE FROM users");

        assert!(result.valid);
        assert_eq!(
            result.warnings.iter().map(|w| w.kind.clone()).collect::<Vec<_>>(),
            vec![
                IssueKind::DangerousKeyword {
                    keyword: "DELETE".to_string()
                },
                IssueKind::DeleteWithoutWhere,
            ]
        );
    }

    #[test]
    fn test_update_without_where_warns() {
        let result = validate("UPDATE accounts SET balance = 0");
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, IssueKind::UpdateWithoutWhere);
    }
}
