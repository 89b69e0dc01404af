use once_cell::unsync::OnceCell;
use std::fmt;

/// A 1-indexed `(line, column)` pair, ordered lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub const START: SourceLocation = SourceLocation { line: 1, column: 1 };
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

const DEFAULT_TAB_WIDTH: usize = 4;

/// Drives a `(line, column)` pair forward through a byte stream under a
/// configurable tab width. A step-as-you-go cursor, since the lexer
/// contract consumes bytes incrementally rather than doing random-access
/// position lookups.
#[derive(Debug, Clone)]
pub struct Cursor {
    pub offset: usize,
    pub location: SourceLocation,
    tab_width: usize,
}

impl Cursor {
    pub fn new(tab_width: usize) -> Self {
        Self {
            offset: 0,
            location: SourceLocation::START,
            tab_width: if tab_width == 0 { DEFAULT_TAB_WIDTH } else { tab_width },
        }
    }

    /// Advance the cursor's location bookkeeping past `source[self.offset..up_to]`,
    /// then set `self.offset = up_to`. Does not interpret the bytes beyond
    /// line/tab/column accounting.
    pub fn advance_to(&mut self, source: &[u8], up_to: usize) {
        for &byte in &source[self.offset..up_to] {
            match byte {
                b'\n' => {
                    self.location.line += 1;
                    self.location.column = 1;
                }
                b'\t' => {
                    self.location.column += self.tab_width;
                }
                _ => {
                    self.location.column += 1;
                }
            }
        }
        self.offset = up_to;
    }
}

/// A byte-offset -> `SourceLocation` resolver for an entire source buffer,
/// used to attach locations to diagnostics after the fact (e.g. the Slow
/// algorithm's range-based failures, which only know a token index).
///
/// Lazily memoizes newline offsets, then binary-searches them to resolve a
/// position.
pub struct PositionIndex<'c> {
    value: &'c [u8],
    line_breaks: OnceCell<Vec<usize>>,
    tab_width: usize,
}

impl<'c> PositionIndex<'c> {
    pub fn new(value: &'c [u8], tab_width: usize) -> Self {
        Self {
            value,
            line_breaks: OnceCell::new(),
            tab_width: if tab_width == 0 { DEFAULT_TAB_WIDTH } else { tab_width },
        }
    }

    fn line_breaks(&self) -> &Vec<usize> {
        self.line_breaks.get_or_init(|| {
            self.value
                .iter()
                .enumerate()
                .filter_map(|(i, b)| if *b == b'\n' { Some(i) } else { None })
                .collect()
        })
    }

    pub fn resolve(&self, offset: usize) -> SourceLocation {
        let breaks = self.line_breaks();
        let line_index = match breaks.binary_search(&offset) {
            Ok(i) | Err(i) => i,
        };
        let line_start = if line_index == 0 {
            0
        } else {
            breaks[line_index - 1] + 1
        };
        let column = self.column_in_line(line_start, offset);
        SourceLocation::new(line_index + 1, column)
    }

    fn column_in_line(&self, line_start: usize, offset: usize) -> usize {
        let mut column = 1;
        for &byte in &self.value[line_start..offset] {
            if byte == b'\t' {
                column += self.tab_width;
            } else {
                column += 1;
            }
        }
        column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_tracks_newlines_and_tabs() {
        let src = b"ab\tc\ndef";
        let mut cursor = Cursor::new(4);
        cursor.advance_to(src, 3); // "ab\t"
        assert_eq!(cursor.location, SourceLocation::new(1, 7));
        cursor.advance_to(src, 5); // "c\n"
        assert_eq!(cursor.location, SourceLocation::new(2, 1));
    }

    #[test]
    fn position_index_matches_cursor_for_same_offset() {
        let src = b"abc\ndef\nghi";
        let index = PositionIndex::new(src, 4);
        assert_eq!(index.resolve(0), SourceLocation::new(1, 1));
        assert_eq!(index.resolve(4), SourceLocation::new(2, 1));
        assert_eq!(index.resolve(9), SourceLocation::new(3, 2));
    }
}
