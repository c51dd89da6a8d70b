use crate::scanner::{Segment, SegmentKind, scan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Keyword or bare identifier.
    Word,
    /// `"x"`, `` `x` `` or `[x]`.
    QuotedIdent,
    StringLit,
    Number,
    /// Operator or delimiter.
    Symbol,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

impl Token<'_> {
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(word)
    }

    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Symbol && self.text == symbol
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::QuotedIdent)
    }

    pub fn upper(&self) -> String {
        self.text.to_ascii_uppercase()
    }

    /// The identifier without its quoting, with doubled closing quotes
    /// collapsed.
    pub fn unquoted(&self) -> String {
        if self.kind != TokenKind::QuotedIdent || self.text.len() < 2 {
            return self.text.to_string();
        }
        let close = match self.text.chars().next() {
            Some('[') => ']',
            Some(open) => open,
            None => return String::new(),
        };
        let inner = self
            .text
            .strip_suffix(close)
            .unwrap_or(self.text)
            .get(1..)
            .unwrap_or_default();
        inner.replace(&format!("{close}{close}"), &close.to_string())
    }
}

const MULTI_CHAR_SYMBOLS: [&str; 7] = ["<=", ">=", "<>", "!=", "||", "::", "=>"];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '@' | '#')
}

/// Tokenizes `sql`, comments included.
pub fn tokenize(sql: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for segment in scan(sql) {
        match segment.kind {
            SegmentKind::Code => tokenize_code(&segment, &mut tokens),
            SegmentKind::SingleQuoted => tokens.push(whole(&segment, TokenKind::StringLit)),
            SegmentKind::DoubleQuoted => tokens.push(whole(&segment, TokenKind::QuotedIdent)),
            SegmentKind::LineComment | SegmentKind::BlockComment => {
                tokens.push(whole(&segment, TokenKind::Comment))
            }
        }
    }
    tokens
}

/// Tokenizes `sql` without comments.
pub fn code_tokens(sql: &str) -> Vec<Token<'_>> {
    tokenize(sql)
        .into_iter()
        .filter(|token| token.kind != TokenKind::Comment)
        .collect()
}

fn whole<'a>(segment: &Segment<'a>, kind: TokenKind) -> Token<'a> {
    Token {
        kind,
        text: segment.text,
        offset: segment.start,
    }
}

fn tokenize_code<'a>(segment: &Segment<'a>, tokens: &mut Vec<Token<'a>>) {
    let text = segment.text;
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        let mut end = start + c.len_utf8();
        let kind = if c == '`' || c == '[' {
            let close = if c == '`' { '`' } else { ']' };
            end = text.len();
            while let Some((i, next)) = chars.next() {
                if next == close {
                    if chars.peek().map(|&(_, after)| after) == Some(close) {
                        chars.next();
                        continue;
                    }
                    end = i + 1;
                    break;
                }
            }
            TokenKind::QuotedIdent
        } else if is_word_char(c) {
            while let Some(&(i, next)) = chars.peek() {
                // Keeps `1.5` together but not `t.col`.
                let decimal_point = next == '.' && c.is_ascii_digit();
                if !is_word_char(next) && !decimal_point {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }
            if c.is_ascii_digit() {
                TokenKind::Number
            } else {
                TokenKind::Word
            }
        } else {
            if let Some(&(_, next)) = chars.peek() {
                let pair = &text[start..start + c.len_utf8() + next.len_utf8()];
                if MULTI_CHAR_SYMBOLS.contains(&pair) {
                    end = start + pair.len();
                    chars.next();
                }
            }
            TokenKind::Symbol
        };

        tokens.push(Token {
            kind,
            text: &text[start..end],
            offset: segment.start + start,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sql: &str) -> Vec<&str> {
        code_tokens(sql).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_tokenize_select() {
        assert_eq!(
            texts("SELECT a.id, COUNT(*) FROM \"t\" WHERE x >= 1.5"),
            vec![
                "SELECT", "a", ".", "id", ",", "COUNT", "(", "*", ")", "FROM", "\"t\"", "WHERE",
                "x", ">=", "1.5"
            ]
        );
    }

    #[test]
    fn test_bracket_and_backtick_identifiers() {
        let tokens = code_tokens("FROM [dbo].[my table] JOIN `o``k`");
        assert_eq!(tokens[1].kind, TokenKind::QuotedIdent);
        assert_eq!(tokens[1].unquoted(), "dbo");
        assert_eq!(tokens[3].unquoted(), "my table");
        assert_eq!(tokens[5].unquoted(), "o`k");
    }

    #[test]
    fn test_offsets_and_comments() {
        let tokens = tokenize("a -- c\n'x'");
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[2].kind, TokenKind::StringLit);
        assert_eq!(tokens[2].offset, 7);
    }

    #[test]
    fn test_unquoted_double_quotes() {
        let tokens = code_tokens(r#""say ""hi""""#);
        assert_eq!(tokens[0].unquoted(), r#"say "hi""#);
    }
}
