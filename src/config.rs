use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Tuning knobs for the reader
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Bytes requested from the input source per read
    #[serde(default = "default_read_chunk_size")]
    pub read_chunk_size: usize,
    /// Characters reserved up front in the decoded buffer
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: default_read_chunk_size(),
            initial_capacity: default_initial_capacity(),
        }
    }
}

/// How the command line tool prints a parsed recipe
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

/// Configuration for the `cooklang` binary
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default)]
    pub output: OutputFormat,
    /// Default log filter when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub parser: ParserConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output: OutputFormat::default(),
            log_level: default_log_level(),
            parser: ParserConfig::default(),
        }
    }
}

// Default value functions
fn default_read_chunk_size() -> usize {
    16384
}

fn default_initial_capacity() -> usize {
    1024
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl CliConfig {
    /// Load configuration from file and environment variables
    ///
    /// See [`load_config`] for the lookup order.
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// Configuration is loaded with the following priority (highest to lowest):
/// 1. Environment variables with COOKLANG__ prefix
/// 2. cooklang.toml file in current directory
/// 3. Default values
///
/// Environment variable format: COOKLANG__PARSER__READ_CHUNK_SIZE
pub fn load_config() -> Result<CliConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("cooklang").required(false))
        // Use double underscore for nested: COOKLANG__PARSER__READ_CHUNK_SIZE
        .add_source(
            Environment::with_prefix("COOKLANG")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
