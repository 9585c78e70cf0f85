use std::fmt;

use serde::Serialize;

/// A position in the decoded character stream
///
/// `index` counts characters, so two marks delimit an exact slice of the
/// decoded buffer; `byte` is the offset of the same position in the raw
/// input. `line` and `column` are zero-based; `Display` shows them one-based
/// for humans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Mark {
    pub index: usize,
    pub byte: usize,
    pub line: usize,
    pub column: usize,
}

impl Mark {
    pub(crate) fn advance(&mut self, c: char) {
        self.index += 1;
        self.byte += c.len_utf8();
        self.column += 1;
    }

    pub(crate) fn new_line(&mut self, chars: usize, bytes: usize) {
        self.index += chars;
        self.byte += bytes;
        self.line += 1;
        self.column = 0;
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line + 1, self.column + 1)
    }
}

/// Line break characters recognized by the reader
pub fn is_break(c: char) -> bool {
    matches!(c, '\r' | '\n' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

pub fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}
