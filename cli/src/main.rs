use std::path::PathBuf;

use clap::Parser as ClapParser;
use optscan_core::{ParseOutcome, ParsedArgs, ParserDefinition};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

mod help;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, ClapParser)]
#[command(name = "optscan")]
#[command(version, about = "Parse an argument vector against a parser definition")]
struct Cli {
    /// Parser definition file (.yml, .yaml or .json).
    #[arg(long)]
    spec: PathBuf,
    /// Output format for parsed values.
    #[arg(long, value_enum, default_value_t = CliOutputFormat::Json)]
    format: CliOutputFormat,
    /// Column width for rendered help text.
    #[arg(long, default_value_t = 80)]
    width: usize,
    /// Argument vector to parse, given after `--`.
    #[arg(last = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Loads the definition and parses the argument vector, returning the exit
/// status. Definition problems are errors; parse failures are reported here
/// and turn into status 1.
fn run(cli: Cli) -> Result<i32, String> {
    let definition = ParserDefinition::load(&cli.spec)
        .map_err(|err| format!("Failed to load '{}': {err}", cli.spec.display()))?;
    let mut parser = definition
        .build()
        .map_err(|err| format!("Invalid definition '{}': {err}", cli.spec.display()))?;
    debug!(path = %cli.spec.display(), args = cli.args.len(), "Parsing argument vector");

    match parser.parse(&cli.args) {
        Ok(ParseOutcome::Values(args)) => {
            println!("{}", render_values(&args, cli.format)?);
            Ok(0)
        }
        Ok(ParseOutcome::HelpRequested) => {
            print!("{}", help::render(&parser, cli.width));
            Ok(0)
        }
        Ok(ParseOutcome::VersionRequested) => {
            println!("{}", parser.version_text().unwrap_or_default());
            Ok(0)
        }
        Err(err) => {
            eprintln!("Error: {err}.");
            eprintln!("Try --help for help.");
            Ok(1)
        }
    }
}

fn render_values(args: &ParsedArgs, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(args)
            .map_err(|err| format!("Failed to serialize JSON: {err}")),
        CliOutputFormat::Yaml => serde_yaml::to_string(args)
            .map(|yaml| yaml.trim_end().to_string())
            .map_err(|err| format!("Failed to serialize YAML: {err}")),
    }
}
