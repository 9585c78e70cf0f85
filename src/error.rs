use std::fmt;

use thiserror::Error;

use crate::input::Mark;
use crate::scanner::TokenKind;

/// Errors that can occur while parsing a recipe
///
/// Every error is terminal: the first one stops the parse and no partial
/// recipe is returned.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A buffer or queue could not grow
    #[error("Out of memory while growing the {0} buffer")]
    Memory(&'static str),

    /// The input is not valid UTF-8
    #[error("Reader error at byte {offset}: {problem}")]
    Reader { problem: String, offset: usize },

    /// The input source failed to deliver bytes
    #[error("Failed to read input at byte {offset}: {source}")]
    Io {
        offset: usize,
        #[source]
        source: std::io::Error,
    },

    /// No token can start at the current position
    #[error("Scanner error {context} at {mark}: {problem}")]
    Scanner {
        context: &'static str,
        problem: &'static str,
        mark: Mark,
    },

    /// The token stream does not form a valid line
    #[error("Syntax error at {mark}: found {found}{}", ExpectedList(.expected))]
    Syntax {
        found: TokenKind,
        mark: Mark,
        expected: Vec<TokenKind>,
    },

    /// A construct is well-formed but meaningless
    #[error("Value error at {mark}: {problem}")]
    Value { problem: String, mark: Mark },

    /// The parser was set up incorrectly
    #[error("Usage error: {0}")]
    Usage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Coarse classification of a [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Memory,
    Reader,
    Scanner,
    Syntax,
    Value,
    Usage,
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Memory(_) => ErrorKind::Memory,
            ParseError::Reader { .. } | ParseError::Io { .. } => ErrorKind::Reader,
            ParseError::Scanner { .. } => ErrorKind::Scanner,
            ParseError::Syntax { .. } => ErrorKind::Syntax,
            ParseError::Value { .. } => ErrorKind::Value,
            ParseError::Usage(_) | ParseError::Config(_) => ErrorKind::Usage,
        }
    }

    /// Source position the error points at, when there is one
    pub fn mark(&self) -> Option<Mark> {
        match self {
            ParseError::Scanner { mark, .. }
            | ParseError::Syntax { mark, .. }
            | ParseError::Value { mark, .. } => Some(*mark),
            _ => None,
        }
    }
}

struct ExpectedList<'a>(&'a [TokenKind]);

impl fmt::Display for ExpectedList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            [] => Ok(()),
            [only] => write!(f, ", expected {}", only),
            kinds => {
                write!(f, ", expected one of ")?;
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", kind)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_lists_expected_tokens() {
        let err = ParseError::Syntax {
            found: TokenKind::Eol,
            mark: Mark {
                index: 1,
                byte: 1,
                line: 0,
                column: 1,
            },
            expected: vec![TokenKind::Word],
        };

        assert_eq!(
            err.to_string(),
            "Syntax error at line 1, column 2: found end of line, expected word"
        );
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert_eq!(err.mark().map(|m| m.column), Some(1));
    }

    #[test]
    fn test_syntax_error_with_several_expected_tokens() {
        let err = ParseError::Syntax {
            found: TokenKind::Whitespace,
            mark: Mark::default(),
            expected: vec![TokenKind::Word, TokenKind::BraceLeft],
        };

        assert_eq!(
            err.to_string(),
            "Syntax error at line 1, column 1: found whitespace, expected one of word, '{'"
        );
    }

    #[test]
    fn test_reader_errors_share_a_kind() {
        let utf8 = ParseError::Reader {
            problem: "invalid leading UTF-8 octet".to_string(),
            offset: 3,
        };
        let io = ParseError::Io {
            offset: 0,
            source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        };

        assert_eq!(utf8.kind(), ErrorKind::Reader);
        assert_eq!(io.kind(), ErrorKind::Reader);
        assert!(utf8.mark().is_none());
    }
}
