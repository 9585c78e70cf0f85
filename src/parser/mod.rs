//! Line grammar
//!
//! A recipe is read one physical line at a time. A line whose first colon
//! comes before any direction marker, and which has text on both sides of
//! it, is metadata. Every other line with content is a step.

mod line;
mod quantity;

use log::{debug, info};

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::input::{InputSource, Reader};
use crate::model::Recipe;
use crate::scanner::Scanner;

use line::{parse_line, Line, LineContent};
pub use quantity::{parse_number, resolve_amount, Amount};

pub struct RecipeParser {
    scanner: Scanner,
}

impl RecipeParser {
    pub fn new(source: InputSource, config: &ParserConfig) -> Result<Self, ParseError> {
        let reader = Reader::new(source, config)?;
        Ok(RecipeParser {
            scanner: Scanner::new(reader),
        })
    }

    pub fn builder() -> crate::builder::RecipeParserBuilder {
        crate::builder::RecipeParserBuilder::new()
    }

    /// Parse the whole input
    ///
    /// Stops at the first error; nothing parsed before it is returned.
    pub fn parse(mut self) -> Result<Recipe, ParseError> {
        let mut recipe = Recipe::default();

        loop {
            let line = self.read_line()?;

            match parse_line(&self.scanner, &line)? {
                LineContent::Metadata(metadata) => {
                    debug!(
                        "line {}: metadata {:?} = {:?}",
                        line.end.start.line + 1,
                        metadata.identifier,
                        metadata.content
                    );
                    recipe.metadata.push(metadata);
                }
                LineContent::Step(step) => {
                    debug!(
                        "line {}: step with {} directions",
                        line.end.start.line + 1,
                        step.len()
                    );
                    recipe.push_step(step);
                }
                LineContent::Empty => {}
            }

            self.scanner.release_before(line.end.end);
            if line.end.kind == crate::scanner::TokenKind::Eof {
                break;
            }
        }

        info!(
            "parsed recipe: {} metadata, {} steps, {} ingredients, {} cookware",
            recipe.metadata.len(),
            recipe.steps.len(),
            recipe.ingredients.len(),
            recipe.cookware.len()
        );
        Ok(recipe)
    }

    /// Tokens up to the next line end, which is consumed
    fn read_line(&mut self) -> Result<Line, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scanner.next()?;
            if token.kind.is_line_end() {
                return Ok(Line { tokens, end: token });
            }
            tokens
                .try_reserve(1)
                .map_err(|_| ParseError::Memory("line buffer"))?;
            tokens.push(token);
        }
    }
}
