//! Source location tracking for ES|QL queries
//!
//! Offsets are byte offsets into the UTF-8 query text. Lines and columns are
//! 1-based and count characters, so a multi-byte character advances the
//! column by one and the offset by its encoded length.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    /// Create a new position
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Create the starting position (offset 0, line 1, column 1)
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advance position by one character
    ///
    /// Only `\n` starts a new line; a lone `\r` or a tab is one column wide.
    pub fn advance(self, ch: char) -> Self {
        match ch {
            '\n' => Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            },
            _ => Self {
                offset: self.offset + ch.len_utf8(),
                line: self.line,
                column: self.column + 1,
            },
        }
    }

    /// Advance position over a whole lexeme
    pub fn advance_str(self, s: &str) -> Self {
        s.chars().fold(self, |pos, ch| pos.advance(ch))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span of source text from start to end position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start.offset <= end.offset, "span ends before it starts");
        Self { start, end }
    }

    /// Zero-width span, used for `EOF`
    pub fn empty(at: Position) -> Self {
        Self::new(at, at)
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// Smallest span covering both
    pub fn merge(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end.offset - self.start.offset
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `pos` falls inside the half-open byte range
    pub fn contains(&self, pos: Position) -> bool {
        (self.start.offset..self.end.offset).contains(&pos.offset)
    }

    /// Text of `input` under this span; empty if the span does not fit
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        input.get(self.start.offset..self.end.offset).unwrap_or("")
    }

    /// Placeholder span for tokens built by hand
    pub fn dummy() -> Self {
        Self::empty(Position::start())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(f, "{}-{}", self.start, self.end.column)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Query text indexed by line for error rendering
#[derive(Debug, Clone)]
pub struct SourceMap {
    /// The query text
    pub source: String,
    line_starts: Vec<usize>,
}

impl SourceMap {
    pub fn new(source: String) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(at, _)| at + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Position of a byte offset, clamped to the end of the text
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let column = self.source[self.line_starts[line]..offset].chars().count();
        Position::new(offset, line as u32 + 1, column as u32 + 1)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line `line_num` (1-based) without its `\n` or `\r\n` terminator
    pub fn get_line(&self, line_num: u32) -> Option<&str> {
        let index = (line_num as usize).checked_sub(1)?;
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .map_or(self.source.len(), |next| next - 1);
        Some(self.source[start..end].trim_end_matches('\r'))
    }

    pub fn span_text(&self, span: &Span) -> &str {
        span.slice(&self.source)
    }

    /// Render `message` with the offending line and a caret underline
    pub fn format_error(&self, span: &Span, message: &str) -> String {
        let mut out = format!("Error: {}\n  --> {}\n", message, span.start);

        if let Some(line) = self.get_line(span.start.line) {
            let number = span.start.line.to_string();
            let gutter = " ".repeat(number.len());
            let width = if span.start.line == span.end.line {
                span.end.column.saturating_sub(span.start.column) as usize
            } else {
                (line.chars().count() + 1).saturating_sub(span.start.column as usize)
            };

            out.push_str(&format!("   {} |\n", gutter));
            out.push_str(&format!("{} | {}\n", number, line));
            out.push_str(&format!(
                "   {} | {}{}\n",
                gutter,
                " ".repeat((span.start.column as usize).saturating_sub(1)),
                "^".repeat(width.max(1))
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_tracks_lines_and_bytes() {
        let pos = Position::start().advance_str("ab\ncé");
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 3);
        assert_eq!(pos.offset, 6);
    }

    #[test]
    fn test_tab_and_carriage_return_are_one_column() {
        let pos = Position::start().advance('\t').advance('\r');
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 3);
    }

    #[test]
    fn test_position_at_matches_advance() {
        let source = "FROM a\n| WHERE b > 1";
        let map = SourceMap::new(source.to_string());
        let expected = Position::start().advance_str(&source[..9]);
        assert_eq!(map.position_at(9), expected);
        assert_eq!(map.line_count(), 2);
    }

    #[test]
    fn test_get_line_strips_crlf() {
        let map = SourceMap::new("ROW a = 1\r\n| LIMIT 1".to_string());
        assert_eq!(map.get_line(1), Some("ROW a = 1"));
        assert_eq!(map.get_line(2), Some("| LIMIT 1"));
        assert_eq!(map.get_line(3), None);
    }

    #[test]
    fn test_format_error_underlines_span() {
        let map = SourceMap::new("FROM \"abc".to_string());
        let start = map.position_at(5);
        let span = Span::new(start, start.advance('"'));
        let rendered = map.format_error(&span, "Unrecognized input");

        assert!(rendered.contains("--> 1:6"));
        assert!(rendered.contains("1 | FROM \"abc"));
        assert!(rendered.lines().last().unwrap().ends_with("     ^"));
    }
}
