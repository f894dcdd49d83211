// logscrub/src/cli.rs
//! Command-line interface definition for the `logscrub` tool.
//! License: MIT OR Apache-2.0

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use logscrub_core::{MatchMode, OutputFormat};

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "logscrub",
    version = env!("CARGO_PKG_VERSION"),
    about = "Null out personally identifiable fields in gzip NDJSON logs",
    long_about = "logscrub decodes gzip-compressed, newline-delimited JSON logs, replaces the value of every field whose name matches a sensitive key with null (at any depth), and re-encodes the result. The same pipeline runs as a Lambda function; the `invoke` subcommand replays Lambda events against a local directory.",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress all informational and debug messages.
    #[arg(long, short = 'q', global = true, conflicts_with = "debug")]
    pub quiet: bool,

    /// Enable debug logging, overriding RUST_LOG.
    #[arg(long, short = 'd', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redact a gzip NDJSON file and write the gzip result.
    Scrub(ScrubCommand),

    /// Report where sensitive keys occur in a gzip NDJSON file, without redacting.
    Search(SearchCommand),

    /// Replay a Lambda event payload against a local directory-backed store.
    Invoke(InvokeCommand),
}

/// Options shared by commands that build a scrub configuration.
#[derive(Parser, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a YAML scrub configuration (defaults to LOGSCRUB_CONFIG or the built-in file).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Sensitive keys to use instead of the configured ones (comma-separated).
    #[arg(long, short = 'k', value_delimiter = ',', value_name = "KEY")]
    pub keys: Vec<String>,

    /// How keys are matched against field names.
    #[arg(long = "match-mode", value_enum, value_name = "MODE")]
    pub match_mode: Option<MatchModeChoice>,
}

#[derive(Parser, Debug)]
pub struct ScrubCommand {
    /// Gzip NDJSON input file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file (defaults to overwriting the input in place).
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Layout of the re-encoded records (defaults to the configured format).
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub format: Option<FormatChoice>,

    /// Print the scrub report as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Parser, Debug)]
pub struct SearchCommand {
    /// Gzip NDJSON input file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Print hits as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Exit with a non-zero code if any hit is found.
    #[arg(long = "fail-on-hit")]
    pub fail_on_hit: bool,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Parser, Debug)]
pub struct InvokeCommand {
    /// JSON file holding an event notification or batch-job payload.
    #[arg(value_name = "EVENT")]
    pub event: PathBuf,

    /// Directory acting as the object store: objects live at <ROOT>/<bucket>/<key>.
    #[arg(long, value_name = "DIR", env = "LOGSCRUB_STORE_ROOT")]
    pub root: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchModeChoice {
    /// Case-insensitive substring of the field name.
    Substring,
    /// Case-insensitive equality with the field name.
    Exact,
    /// Case-insensitive regular expression.
    Regex,
}

impl From<MatchModeChoice> for MatchMode {
    fn from(choice: MatchModeChoice) -> Self {
        match choice {
            MatchModeChoice::Substring => MatchMode::Substring,
            MatchModeChoice::Exact => MatchMode::Exact,
            MatchModeChoice::Regex => MatchMode::Regex,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatChoice {
    /// One JSON document per line.
    JsonLines,
    /// A single JSON array.
    JsonArray,
}

impl From<FormatChoice> for OutputFormat {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::JsonLines => OutputFormat::JsonLines,
            FormatChoice::JsonArray => OutputFormat::JsonArray,
        }
    }
}
