//! Parser for the Cooklang recipe markup language
//!
//! ```
//! let recipe = cooklang_parser::parse_str(">> servings: 2\nChop @onions{3%medium} in #pan{}.").unwrap();
//! assert_eq!(recipe.metadata_value("servings"), Some("2"));
//! assert_eq!(recipe.ingredients, vec!["onions"]);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod parser;
pub mod scanner;

use std::io::Read;
use std::path::Path;

pub use builder::RecipeParserBuilder;
pub use config::{load_config, CliConfig, OutputFormat, ParserConfig};
pub use error::{ErrorKind, ParseError};
pub use input::{InputSource, Mark, Reader};
pub use model::{Direction, Metadata, Quantity, Recipe, Step};
pub use parser::{resolve_amount, Amount, RecipeParser};
pub use scanner::{Scanner, Token, TokenKind};

/// Parse a recipe held in a string
pub fn parse_str(text: &str) -> Result<Recipe, ParseError> {
    RecipeParser::builder().text(text).parse()
}

/// Parse a recipe from UTF-8 bytes
pub fn parse_bytes(data: &[u8]) -> Result<Recipe, ParseError> {
    RecipeParser::builder().bytes(data).parse()
}

/// Parse the recipe file at `path`
pub fn parse_file(path: impl AsRef<Path>) -> Result<Recipe, ParseError> {
    RecipeParser::builder().path(path.as_ref()).parse()
}

/// Parse everything `reader` yields
pub fn parse_reader(reader: impl Read + 'static) -> Result<Recipe, ParseError> {
    RecipeParser::builder().reader(reader).parse()
}
