use std::fmt;

use crate::input::Mark;

/// Token kinds of the Cooklang alphabet
///
/// The scanner itself only ever produces `Integer` for digit runs; the
/// finer numeric kinds are decided by the amount resolver, which sees the
/// whole text of an amount group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Word,
    Integer,
    Decimal,
    Fractional,
    WholeFractional,
    Whitespace,
    Colon,
    At,
    Percent,
    BraceLeft,
    BraceRight,
    Pipe,
    Chevron,
    Tilde,
    Hash,
    Eol,
    Eof,
}

impl TokenKind {
    /// Token kind of a reserved single-character punctuation
    pub fn punctuation(c: char) -> Option<TokenKind> {
        let kind = match c {
            ':' => TokenKind::Colon,
            '@' => TokenKind::At,
            '%' => TokenKind::Percent,
            '{' => TokenKind::BraceLeft,
            '}' => TokenKind::BraceRight,
            '|' => TokenKind::Pipe,
            '>' => TokenKind::Chevron,
            '~' => TokenKind::Tilde,
            '#' => TokenKind::Hash,
            _ => return None,
        };
        Some(kind)
    }

    /// `@`, `#` and `~` open a direction
    pub fn is_direction_marker(self) -> bool {
        matches!(self, TokenKind::At | TokenKind::Hash | TokenKind::Tilde)
    }

    pub fn is_line_end(self) -> bool {
        matches!(self, TokenKind::Eol | TokenKind::Eof)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Word => "word",
            TokenKind::Integer => "integer",
            TokenKind::Decimal => "decimal",
            TokenKind::Fractional => "fraction",
            TokenKind::WholeFractional => "whole fraction",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Colon => "':'",
            TokenKind::At => "'@'",
            TokenKind::Percent => "'%'",
            TokenKind::BraceLeft => "'{'",
            TokenKind::BraceRight => "'}'",
            TokenKind::Pipe => "'|'",
            TokenKind::Chevron => "'>'",
            TokenKind::Tilde => "'~'",
            TokenKind::Hash => "'#'",
            TokenKind::Eol => "end of line",
            TokenKind::Eof => "end of file",
        };
        f.write_str(name)
    }
}

/// A classified span of the input; the text is recovered from the reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: Mark,
    pub end: Mark,
}
