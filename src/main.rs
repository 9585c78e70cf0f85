use std::env;
use std::process::ExitCode;

use log::{debug, warn};

use cooklang_parser::{CliConfig, OutputFormat, ParseError, Recipe, RecipeParser};

fn main() -> ExitCode {
    let (config, config_error) = match CliConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (CliConfig::default(), Some(e)),
    };

    let env = env_logger::Env::default().default_filter_or(config.log_level.as_str());
    env_logger::Builder::from_env(env).init();
    if let Some(e) = config_error {
        warn!("Ignoring invalid configuration: {}", e);
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig) -> Result<(), String> {
    // Get the recipe path from command-line arguments
    let args: Vec<String> = env::args().collect();
    let path = args
        .get(1)
        .ok_or("Usage: cooklang <recipe.cook>".to_string())?;

    debug!("parsing {} with {:?}", path, config.parser);
    let recipe = RecipeParser::builder()
        .path(path)
        .config(config.parser.clone())
        .parse()
        .map_err(|e| describe(path, &e))?;

    let output = render(&recipe, config.output).map_err(|e| e.to_string())?;
    print!("{}", output);
    Ok(())
}

fn describe(path: &str, e: &ParseError) -> String {
    debug!("{:?}", e);
    match e.mark() {
        Some(mark) => format!("{}:{}:{}: {}", path, mark.line + 1, mark.column + 1, e),
        None => format!("{}: {}", path, e),
    }
}

fn render(recipe: &Recipe, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Pretty => Ok(recipe.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(recipe).map(|json| json + "\n"),
    }
}
