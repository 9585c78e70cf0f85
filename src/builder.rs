use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use log::debug;

use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::input::InputSource;
use crate::model::Recipe;
use crate::parser::RecipeParser;

/// A source chosen on the builder; paths are opened in `build()`
#[derive(Debug)]
enum Selected {
    Source(InputSource),
    Path(PathBuf),
}

/// Builder for configuring a [`RecipeParser`]
///
/// Exactly one input source must be chosen.
#[derive(Debug, Default)]
pub struct RecipeParserBuilder {
    source: Option<Selected>,
    duplicate: bool,
    config: ParserConfig,
}

impl RecipeParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(mut self, selected: Selected) -> Self {
        if self.source.is_some() {
            self.duplicate = true;
        } else {
            self.source = Some(selected);
        }
        self
    }

    /// Parse a recipe held in a string
    ///
    /// # Example
    /// ```
    /// use cooklang_parser::RecipeParser;
    ///
    /// let recipe = RecipeParser::builder()
    ///     .text("Boil @water{1%l}.")
    ///     .parse()
    ///     .unwrap();
    /// assert_eq!(recipe.ingredients, vec!["water"]);
    /// ```
    pub fn text(self, text: impl Into<String>) -> Self {
        self.select(Selected::Source(InputSource::bytes(text.into())))
    }

    /// Parse raw bytes, which must be UTF-8
    pub fn bytes(self, data: impl Into<Vec<u8>>) -> Self {
        self.select(Selected::Source(InputSource::bytes(data)))
    }

    /// Parse an already opened file
    pub fn file(self, file: File) -> Self {
        self.select(Selected::Source(InputSource::File(file)))
    }

    /// Open and parse the file at `path`
    ///
    /// The file is opened by [`build`](Self::build), which reports a failure
    /// to open it.
    pub fn path(self, path: impl Into<PathBuf>) -> Self {
        self.select(Selected::Path(path.into()))
    }

    /// Parse everything a reader yields
    pub fn reader(self, reader: impl Read + 'static) -> Self {
        self.select(Selected::Source(InputSource::Reader(Box::new(reader))))
    }

    /// Pull bytes from a callback until it returns `Ok(0)`
    ///
    /// # Example
    /// ```
    /// use cooklang_parser::RecipeParser;
    ///
    /// let mut chunks = vec![&b"~{10%minutes}"[..], &b"Chop @leek"[..]];
    /// let recipe = RecipeParser::builder()
    ///     .callback(move |buf: &mut [u8]| {
    ///         let Some(chunk) = chunks.pop() else { return Ok(0) };
    ///         buf[..chunk.len()].copy_from_slice(chunk);
    ///         Ok(chunk.len())
    ///     })
    ///     .config(cooklang_parser::ParserConfig { read_chunk_size: 64, initial_capacity: 0 })
    ///     .parse()
    ///     .unwrap();
    /// assert_eq!(recipe.steps.len(), 1);
    /// ```
    pub fn callback<F>(self, read: F) -> Self
    where
        F: FnMut(&mut [u8]) -> io::Result<usize> + 'static,
    {
        self.select(Selected::Source(InputSource::callback(read)))
    }

    pub fn config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate the setup and create the parser
    ///
    /// # Errors
    /// Returns `ParseError::Usage` if no source or more than one source was
    /// chosen, and `ParseError::Io` if a path cannot be opened.
    pub fn build(self) -> Result<RecipeParser, ParseError> {
        if self.duplicate {
            return Err(ParseError::Usage("input source already set".to_string()));
        }
        let source = match self.source {
            None => {
                return Err(ParseError::Usage(
                    "no input source specified; use .text(), .bytes(), .file(), .path(), .reader() or .callback()"
                        .to_string(),
                ))
            }
            Some(Selected::Source(source)) => source,
            Some(Selected::Path(path)) => {
                debug!("opening {}", path.display());
                let file =
                    File::open(&path).map_err(|source| ParseError::Io { offset: 0, source })?;
                InputSource::File(file)
            }
        };

        RecipeParser::new(source, &self.config)
    }

    /// Build the parser and run it
    pub fn parse(self) -> Result<Recipe, ParseError> {
        self.build()?.parse()
    }
}
