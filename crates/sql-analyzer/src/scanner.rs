//! Quote and comment aware segmentation of SQL text.
//!
//! The scanner walks the input once and cuts it into [`Segment`]s: runs of
//! plain code, quoted strings or identifiers, and comments. Everything else
//! in the crate only ever interprets `Code` segments as SQL syntax.

use crate::errors::{ScanError, SourcePosition};
use std::{iter::Peekable, str::CharIndices};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Normal,
    InSingleQuote,
    InDoubleQuote,
    InLineComment,
    InBlockComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Code,
    /// A string literal, quotes included.
    SingleQuoted,
    /// A quoted identifier, quotes included.
    DoubleQuoted,
    LineComment,
    BlockComment,
}

impl SegmentKind {
    pub fn is_comment(&self) -> bool {
        matches!(self, SegmentKind::LineComment | SegmentKind::BlockComment)
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, SegmentKind::SingleQuoted | SegmentKind::DoubleQuoted)
    }
}

impl From<ScanState> for SegmentKind {
    fn from(state: ScanState) -> Self {
        match state {
            ScanState::Normal => SegmentKind::Code,
            ScanState::InSingleQuote => SegmentKind::SingleQuoted,
            ScanState::InDoubleQuote => SegmentKind::DoubleQuoted,
            ScanState::InLineComment => SegmentKind::LineComment,
            ScanState::InBlockComment => SegmentKind::BlockComment,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    pub text: &'a str,
    /// Byte offset of the segment in the scanned text.
    pub start: usize,
    /// False when the input ended before the closing quote or `*/`.
    pub terminated: bool,
}

impl Segment<'_> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

struct Scanner<'a> {
    sql: &'a str,
    chars: Peekable<CharIndices<'a>>,
    state: ScanState,
    start: usize,
    segments: Vec<Segment<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(sql: &'a str) -> Self {
        Self {
            sql,
            chars: sql.char_indices().peekable(),
            state: ScanState::Normal,
            start: 0,
            segments: Vec::new(),
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Closes the current segment at `end` and moves to `next`.
    fn transition(&mut self, end: usize, next: ScanState) {
        self.push(end, true);
        self.start = end;
        self.state = next;
    }

    fn push(&mut self, end: usize, terminated: bool) {
        if end > self.start {
            self.segments.push(Segment {
                kind: self.state.into(),
                text: &self.sql[self.start..end],
                start: self.start,
                terminated,
            });
        }
    }

    fn run(mut self) -> Vec<Segment<'a>> {
        while let Some((i, c)) = self.chars.next() {
            match self.state {
                ScanState::Normal => match (c, self.peek()) {
                    ('\'', _) => self.transition(i, ScanState::InSingleQuote),
                    ('"', _) => self.transition(i, ScanState::InDoubleQuote),
                    ('-', Some('-')) => {
                        self.chars.next();
                        self.transition(i, ScanState::InLineComment);
                    }
                    ('/', Some('*')) => {
                        self.chars.next();
                        self.transition(i, ScanState::InBlockComment);
                    }
                    _ => {}
                },
                ScanState::InSingleQuote | ScanState::InDoubleQuote => {
                    let quote = if self.state == ScanState::InSingleQuote {
                        '\''
                    } else {
                        '"'
                    };
                    if c == quote {
                        // A doubled quote is an escaped literal quote.
                        if self.peek() == Some(quote) {
                            self.chars.next();
                        } else {
                            self.transition(i + 1, ScanState::Normal);
                        }
                    }
                }
                ScanState::InLineComment => {
                    if c == '\n' {
                        self.transition(i, ScanState::Normal);
                    }
                }
                ScanState::InBlockComment => {
                    if c == '*' && self.peek() == Some('/') {
                        self.chars.next();
                        self.transition(i + 2, ScanState::Normal);
                    }
                }
            }
        }

        let terminated = matches!(self.state, ScanState::Normal | ScanState::InLineComment);
        self.push(self.sql.len(), terminated);
        self.segments
    }
}

/// Splits `sql` into segments. Never fails: an unterminated quote or block
/// comment simply runs to the end of the input with `terminated == false`.
pub fn scan(sql: &str) -> Vec<Segment<'_>> {
    Scanner::new(sql).run()
}

/// Like [`scan`], but reports an unterminated trailing quote or comment.
pub fn scan_strict(sql: &str) -> Result<Vec<Segment<'_>>, ScanError> {
    let segments = scan(sql);
    match segments.last() {
        Some(last) if !last.terminated => {
            let position = SourcePosition::at(sql, last.start);
            Err(match last.kind {
                SegmentKind::SingleQuoted => ScanError::UnterminatedQuote {
                    quote: '\'',
                    position,
                },
                SegmentKind::DoubleQuoted => ScanError::UnterminatedQuote {
                    quote: '"',
                    position,
                },
                _ => ScanError::UnterminatedComment { position },
            })
        }
        _ => Ok(segments),
    }
}

/// Rebuilds `sql` with comments removed. A block comment becomes a single
/// space so the tokens around it stay apart.
pub fn strip_comments(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    for segment in scan(sql) {
        match segment.kind {
            SegmentKind::LineComment => {}
            SegmentKind::BlockComment => out.push(' '),
            _ => out.push_str(segment.text),
        }
    }
    out
}
