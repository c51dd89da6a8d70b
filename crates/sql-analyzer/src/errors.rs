use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Severity level for validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A location in SQL text. `line` and `column` are 1-based and count
/// characters, `offset` is the 0-based byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl SourcePosition {
    /// Resolves a byte offset in `sql`. Offsets past the end clamp to the
    /// end, offsets inside a multi-byte character snap back to its start.
    pub fn at(sql: &str, offset: usize) -> Self {
        let mut offset = offset.min(sql.len());
        while !sql.is_char_boundary(offset) {
            offset -= 1;
        }

        let before = &sql[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;

        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum IssueKind {
    EmptyQuery,
    UnterminatedQuote { quote: char },
    UnterminatedComment,
    UnmatchedCloseParen,
    UnclosedParen,

    // Warnings
    DangerousKeyword { keyword: String },
    DeleteWithoutWhere,
    UpdateWithoutWhere,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::EmptyQuery => write!(f, "SQL query is empty"),
            IssueKind::UnterminatedQuote { quote: '\'' } => {
                write!(f, "unbalanced single quote: string literal is never closed")
            }
            IssueKind::UnterminatedQuote { quote } => {
                write!(f, "unbalanced {quote} quote: quoted identifier is never closed")
            }
            IssueKind::UnterminatedComment => write!(f, "block comment is never closed"),
            IssueKind::UnmatchedCloseParen => {
                write!(f, "unbalanced parentheses: ')' has no matching '('")
            }
            IssueKind::UnclosedParen => write!(f, "unbalanced parentheses: '(' is never closed"),
            IssueKind::DangerousKeyword { keyword } => {
                write!(f, "query contains potentially dangerous operation: {keyword}")
            }
            IssueKind::DeleteWithoutWhere => {
                write!(f, "DELETE without WHERE clause will remove every row")
            }
            IssueKind::UpdateWithoutWhere => {
                write!(f, "UPDATE without WHERE clause will modify every row")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: IssueKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<SourcePosition>,
}

impl ValidationIssue {
    pub fn error(kind: IssueKind, position: Option<SourcePosition>) -> Self {
        let message = match position {
            Some(position) => format!("{kind} (at {position})"),
            None => kind.to_string(),
        };
        Self {
            severity: Severity::Error,
            kind,
            message,
            position,
        }
    }

    pub fn warning(kind: IssueKind) -> Self {
        let message = kind.to_string();
        Self {
            severity: Severity::Warning,
            kind,
            message,
            position: None,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Outcome of [`crate::validate`]. Warnings never make a statement invalid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SqlValidation {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    /// Position of the first error, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<SourcePosition>,
}

impl SqlValidation {
    pub fn new() -> Self {
        Self {
            valid: true,
            ..Self::default()
        }
    }

    pub fn add_issue(&mut self, issue: ValidationIssue) {
        match issue.severity {
            Severity::Error => {
                if self.position.is_none() {
                    self.position = issue.position;
                }
                self.valid = false;
                self.errors.push(issue);
            }
            Severity::Warning => {
                if !self.warnings.contains(&issue) {
                    self.warnings.push(issue);
                }
            }
        }
    }

    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|issue| issue.message.as_str()).collect()
    }

    pub fn warning_messages(&self) -> Vec<&str> {
        self.warnings.iter().map(|issue| issue.message.as_str()).collect()
    }
}

impl fmt::Display for SqlValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() && self.warnings.is_empty() {
            return write!(f, "No validation issues");
        }

        for issue in self.errors.iter().chain(&self.warnings) {
            writeln!(f, "{issue}")?;
        }

        Ok(())
    }
}

/// Raised by the strict scanner when the text ends inside a quote or a
/// block comment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("unterminated {quote} quote starting at {position}")]
    UnterminatedQuote {
        quote: char,
        position: SourcePosition,
    },

    #[error("unterminated block comment starting at {position}")]
    UnterminatedComment { position: SourcePosition },
}

impl From<ScanError> for ValidationIssue {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::UnterminatedQuote { quote, position } => {
                ValidationIssue::error(IssueKind::UnterminatedQuote { quote }, Some(position))
            }
            ScanError::UnterminatedComment { position } => {
                ValidationIssue::error(IssueKind::UnterminatedComment, Some(position))
            }
        }
    }
}
