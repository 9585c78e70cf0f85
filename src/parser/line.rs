use log::debug;

use super::quantity::{resolve_amount, Amount};
use crate::error::ParseError;
use crate::model::{Direction, Metadata, Quantity, Step};
use crate::scanner::{Scanner, Token, TokenKind};

/// The tokens of one physical line and the token that ended it
pub struct Line {
    pub tokens: Vec<Token>,
    pub end: Token,
}

/// What a line turned into
#[derive(Debug, PartialEq)]
pub enum LineContent {
    Metadata(Metadata),
    Step(Step),
    Empty,
}

pub fn parse_line(scanner: &Scanner, line: &Line) -> Result<LineContent, ParseError> {
    if let Some(metadata) = metadata(scanner, &line.tokens) {
        return Ok(LineContent::Metadata(metadata));
    }

    let mut builder = StepBuilder {
        scanner,
        tokens: &line.tokens,
        end: line.end,
        pos: 0,
        text: String::new(),
        directions: Vec::new(),
    };
    builder.run()?;

    if builder.directions.is_empty() {
        Ok(LineContent::Empty)
    } else {
        Ok(LineContent::Step(Step {
            directions: builder.directions,
        }))
    }
}

/// `identifier: content`, optionally behind `>>`, with the colon before
/// any direction marker
fn metadata(scanner: &Scanner, tokens: &[Token]) -> Option<Metadata> {
    let body_start = tokens
        .iter()
        .position(|t| !matches!(t.kind, TokenKind::Whitespace | TokenKind::Chevron))?;
    let body = &tokens[body_start..];

    let colon = body
        .iter()
        .position(|t| t.kind == TokenKind::Colon || t.kind.is_direction_marker())?;
    if body[colon].kind != TokenKind::Colon {
        return None;
    }

    let identifier = join_lexemes(scanner, &body[..colon]);
    let content = join_lexemes(scanner, &body[colon + 1..]);
    let (identifier, content) = (identifier.trim(), content.trim());
    if identifier.is_empty() || content.is_empty() {
        return None;
    }

    Some(Metadata {
        identifier: identifier.to_string(),
        content: content.to_string(),
    })
}

fn join_lexemes(scanner: &Scanner, tokens: &[Token]) -> String {
    tokens.iter().map(|t| scanner.lexeme(t)).collect()
}

struct StepBuilder<'a> {
    scanner: &'a Scanner,
    tokens: &'a [Token],
    end: Token,
    pos: usize,
    /// Plain text not yet emitted as a direction
    text: String,
    directions: Vec<Direction>,
}

impl StepBuilder<'_> {
    fn run(&mut self) -> Result<(), ParseError> {
        while let Some(&token) = self.tokens.get(self.pos) {
            match token.kind {
                kind if kind.is_direction_marker() => {
                    self.flush_text();
                    self.pos += 1;
                    let direction = self.direction(token)?;
                    self.directions.push(direction);
                }
                TokenKind::Whitespace => {
                    // indentation before anything else is dropped
                    let started = !self.text.is_empty() || !self.directions.is_empty();
                    if started && !self.text.ends_with(' ') {
                        self.text.push(' ');
                    }
                    self.pos += 1;
                }
                _ => {
                    self.text.push_str(&self.scanner.lexeme(&token));
                    self.pos += 1;
                }
            }
        }
        self.flush_text();
        Ok(())
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.directions.push(Direction::Text {
                value: std::mem::take(&mut self.text),
            });
        }
    }

    fn peek_kind(&self) -> (TokenKind, Token) {
        match self.tokens.get(self.pos) {
            Some(token) => (token.kind, *token),
            None => (self.end.kind, self.end),
        }
    }

    /// Build the direction opened by `marker`, which is already consumed
    fn direction(&mut self, marker: Token) -> Result<Direction, ParseError> {
        let expected: &[TokenKind] = match marker.kind {
            TokenKind::Tilde => &[TokenKind::Word, TokenKind::BraceLeft],
            _ => &[TokenKind::Word],
        };
        let (kind, found) = self.peek_kind();
        if !expected.contains(&kind) {
            return Err(ParseError::Syntax {
                found: kind,
                mark: found.start,
                expected: expected.to_vec(),
            });
        }

        let name = if kind == TokenKind::BraceLeft {
            None
        } else {
            Some(self.name())
        };
        let amount = if self.peek_kind().0 == TokenKind::BraceLeft {
            self.pos += 1;
            self.amount_group()?
        } else {
            Amount::default()
        };

        match marker.kind {
            TokenKind::At => Ok(Direction::Ingredient {
                name: name.unwrap_or_default(),
                quantity: amount.quantity,
                unit: amount.unit,
            }),
            TokenKind::Hash => {
                if let Some(unit) = &amount.unit {
                    debug!("dropping unit {:?} from cookware at {}", unit, marker.start);
                }
                Ok(Direction::Cookware {
                    name: name.unwrap_or_default(),
                    quantity: amount.quantity,
                })
            }
            _ => timer(name, amount, marker),
        }
    }

    /// A name reaching a `{` on this line may span several words; otherwise
    /// it is the single word after the marker
    fn name(&mut self) -> String {
        let start = self.pos;
        let mut end = start;
        while self.tokens.get(end).is_some_and(|t| is_name_token(t.kind)) {
            end += 1;
        }

        let reaches_group = self
            .tokens
            .get(end)
            .is_some_and(|t| t.kind == TokenKind::BraceLeft);
        if reaches_group {
            self.pos = end;
            let mut name = String::new();
            for token in &self.tokens[start..end] {
                if token.kind == TokenKind::Whitespace {
                    if !name.ends_with(' ') {
                        name.push(' ');
                    }
                } else {
                    name.push_str(&self.scanner.lexeme(token));
                }
            }
            return name.trim().to_string();
        }

        self.pos = start + 1;
        let word = self.scanner.lexeme(&self.tokens[start]);
        let (name, rest) = split_trailing_punctuation(&word);
        self.text.push_str(rest);
        name.to_string()
    }

    /// Everything up to the closing `}`; the opening brace is consumed
    fn amount_group(&mut self) -> Result<Amount, ParseError> {
        let start = self.pos;
        let close = self.tokens[start..]
            .iter()
            .position(|t| t.kind == TokenKind::BraceRight)
            .map(|offset| start + offset);

        let Some(close) = close else {
            return Err(ParseError::Syntax {
                found: self.end.kind,
                mark: self.end.start,
                expected: vec![TokenKind::BraceRight],
            });
        };

        let raw = join_lexemes(self.scanner, &self.tokens[start..close]);
        self.pos = close + 1;
        Ok(resolve_amount(&raw))
    }
}

fn timer(name: Option<String>, amount: Amount, marker: Token) -> Result<Direction, ParseError> {
    if name.is_none() && amount.quantity == Quantity::None {
        return Err(ParseError::Value {
            problem: "timer has neither a name nor a quantity".to_string(),
            mark: marker.start,
        });
    }
    Ok(Direction::Timer {
        name,
        quantity: amount.quantity,
        unit: amount.unit,
    })
}

fn is_name_token(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Word
            | TokenKind::Integer
            | TokenKind::Whitespace
            | TokenKind::Colon
            | TokenKind::Percent
            | TokenKind::Pipe
            | TokenKind::Chevron
    )
}

/// `salt,` is the ingredient `salt` followed by the text `,`
fn split_trailing_punctuation(word: &str) -> (&str, &str) {
    let name = word.trim_end_matches(|c: char| c.is_ascii_punctuation());
    if name.is_empty() {
        (word, "")
    } else {
        word.split_at(name.len())
    }
}
