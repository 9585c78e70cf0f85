//! Tokenizer for the Cooklang alphabet
//!
//! The scanner pulls characters from the [`Reader`] and classifies them into
//! [`Token`]s, one rule at a time, longest match first:
//!
//! 1. end of input: `Eof`
//! 2. a run of line breaks: one `Eol`
//! 3. a run of spaces and tabs: `Whitespace`
//! 4. a run of ASCII digits: `Integer`
//! 5. a reserved punctuation character: its own kind
//! 6. a run of any other printable characters: `Word`
//!
//! Line comments (`-- ...`) and block comments (`[- ... -]`) are dropped
//! before each classification. A control character that fits none of the
//! rules is a scanner error.

mod token;

use std::collections::VecDeque;

use log::trace;

use crate::error::ParseError;
use crate::input::{is_blank, is_break, Mark, Reader};

pub use token::{Token, TokenKind};

pub struct Scanner {
    reader: Reader,
    tokens: VecDeque<Token>,
}

impl Scanner {
    pub fn new(reader: Reader) -> Self {
        Scanner {
            reader,
            tokens: VecDeque::new(),
        }
    }

    /// Look at the next token without consuming it
    pub fn peek(&mut self) -> Result<Token, ParseError> {
        if let Some(token) = self.tokens.front() {
            return Ok(*token);
        }
        let token = self.fetch_next_token()?;
        self.tokens
            .try_reserve(1)
            .map_err(|_| ParseError::Memory("token queue"))?;
        self.tokens.push_back(token);
        Ok(token)
    }

    /// Consume the next token; after the input ends this keeps yielding `Eof`
    pub fn next(&mut self) -> Result<Token, ParseError> {
        match self.tokens.pop_front() {
            Some(token) => Ok(token),
            None => self.fetch_next_token(),
        }
    }

    pub fn lexeme(&self, token: &Token) -> String {
        self.reader.slice(token.start, token.end)
    }

    pub fn slice(&self, start: Mark, end: Mark) -> String {
        self.reader.slice(start, end)
    }

    /// Forget decoded text before `mark`
    pub fn release_before(&mut self, mark: Mark) {
        let mark = match self.tokens.front() {
            Some(token) if token.start < mark => token.start,
            _ => mark,
        };
        self.reader.release_before(mark);
    }

    /// Scan the whole input, `Eof` included
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next()?;
            tokens
                .try_reserve(1)
                .map_err(|_| ParseError::Memory("token list"))?;
            tokens.push(token);
            if token.kind == TokenKind::Eof {
                return Ok(tokens);
            }
        }
    }

    fn fetch_next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_comments()?;
        self.reader.ensure_available(2)?;

        let start = self.reader.mark();
        let Some(c) = self.reader.peek() else {
            return Ok(self.produce(TokenKind::Eof, start));
        };

        let kind = if is_break(c) {
            self.scan_breaks()?;
            TokenKind::Eol
        } else if is_blank(c) {
            self.scan_run(is_blank)?;
            TokenKind::Whitespace
        } else if c.is_ascii_digit() {
            self.scan_run(|c| c.is_ascii_digit())?;
            TokenKind::Integer
        } else if let Some(kind) = TokenKind::punctuation(c) {
            self.reader.skip();
            kind
        } else if is_word_char(c) {
            self.scan_word()?;
            TokenKind::Word
        } else {
            return Err(ParseError::Scanner {
                context: "while scanning for the next token",
                problem: "found character that cannot start any token",
                mark: start,
            });
        };

        Ok(self.produce(kind, start))
    }

    fn produce(&self, kind: TokenKind, start: Mark) -> Token {
        let token = Token {
            kind,
            start,
            end: self.reader.mark(),
        };
        trace!(
            "{:?} at {}..{}",
            token.kind,
            token.start.index,
            token.end.index
        );
        token
    }

    fn scan_breaks(&mut self) -> Result<(), ParseError> {
        while self.reader.peek().is_some_and(is_break) {
            self.reader.ensure_available(2)?;
            self.reader.skip_line();
            self.reader.ensure_available(2)?;
        }
        Ok(())
    }

    fn scan_run(&mut self, accept: impl Fn(char) -> bool) -> Result<(), ParseError> {
        while self.reader.peek().is_some_and(&accept) {
            self.reader.skip();
            self.reader.ensure_available(1)?;
        }
        Ok(())
    }

    fn scan_word(&mut self) -> Result<(), ParseError> {
        loop {
            self.reader.ensure_available(2)?;
            match self.reader.peek() {
                Some(c) if is_word_char(c) && !self.at_comment_start() => self.reader.skip(),
                _ => return Ok(()),
            }
        }
    }

    fn at_comment_start(&self) -> bool {
        matches!(
            (self.reader.peek(), self.reader.peek_at(1)),
            (Some('-'), Some('-')) | (Some('['), Some('-'))
        )
    }

    /// Drop any comments at the current position
    fn skip_comments(&mut self) -> Result<(), ParseError> {
        loop {
            self.reader.ensure_available(2)?;
            match (self.reader.peek(), self.reader.peek_at(1)) {
                (Some('-'), Some('-')) => self.skip_line_comment()?,
                (Some('['), Some('-')) => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    /// `-- ...` up to, not including, the line break
    fn skip_line_comment(&mut self) -> Result<(), ParseError> {
        let start = self.reader.mark();
        while self.reader.peek().is_some_and(|c| !is_break(c)) {
            self.reader.skip();
            self.reader.ensure_available(1)?;
        }
        trace!("line comment at {}", start);
        Ok(())
    }

    /// `[- ... -]`, possibly over several lines; an unterminated comment
    /// runs to the end of the input
    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.reader.mark();
        self.reader.skip();
        self.reader.skip();
        loop {
            self.reader.ensure_available(2)?;
            match (self.reader.peek(), self.reader.peek_at(1)) {
                (None, _) => {
                    trace!("unterminated block comment at {}", start);
                    return Ok(());
                }
                (Some('-'), Some(']')) => {
                    self.reader.skip();
                    self.reader.skip();
                    trace!("block comment at {}", start);
                    return Ok(());
                }
                (Some(c), _) if is_break(c) => self.reader.skip_line(),
                _ => self.reader.skip(),
            }
        }
    }
}

fn is_word_char(c: char) -> bool {
    !is_blank(c)
        && !is_break(c)
        && !c.is_ascii_digit()
        && !c.is_control()
        && TokenKind::punctuation(c).is_none()
}
