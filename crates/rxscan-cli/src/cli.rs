//! CLI argument definitions for the drug mention scanner.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rxscan",
    version,
    about = "Find drug and ingredient mentions in free text",
    long_about = "Find drug and ingredient mentions in free text.\n\n\
                  Matches candidate phrases against an openFDA-style product \
                  dataset by exact name, confirmed partial name, or nearest \
                  neighbor."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan a document for drug mentions.
    Extract(ExtractArgs),

    /// Resolve a product code or name against the catalog.
    Lookup(LookupArgs),

    /// List the nearest catalog names for a term.
    Query(QueryArgs),

    /// Explain whether the candidate filter drops a term.
    Check(CheckArgs),

    /// Print the lines of a document that mention a term.
    Lines(LinesArgs),
}

#[derive(Args)]
pub struct CatalogArgs {
    /// openFDA-style product dataset (JSON).
    #[arg(long, env = "RXSCAN_DATASET", value_name = "PATH")]
    pub dataset: PathBuf,

    /// Scan configuration file (TOML).
    #[arg(long, env = "RXSCAN_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Document to scan; `-` reads stdin.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Exclusion word lists (TOML) replacing the built-in lexicon.
    #[arg(long, value_name = "PATH")]
    pub lexicon: Option<PathBuf>,

    /// Additional word to exclude; repeatable.
    #[arg(long = "exclude-word", value_name = "WORD")]
    pub exclude_words: Vec<String>,

    /// Use the lenient threshold preset.
    #[arg(long)]
    pub lenient: bool,

    /// Maximum distance confirming a partial match.
    #[arg(long = "partial-threshold", value_name = "DISTANCE")]
    pub partial_threshold: Option<f32>,

    /// Maximum distance accepting an approximate match.
    #[arg(long = "approximate-threshold", value_name = "DISTANCE")]
    pub approximate_threshold: Option<f32>,

    /// How ambiguous single words are screened.
    #[arg(long, value_enum, default_value = "reject-all")]
    pub oracle: OracleArg,

    /// Similarity backend for partial and approximate matching.
    #[arg(long, value_enum, default_value = "fuzzy")]
    pub similarity: SimilarityArg,

    /// Drop fuzzy neighbors farther than this distance.
    #[arg(long = "max-distance", value_name = "DISTANCE")]
    pub max_distance: Option<f32>,

    /// Print matches as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct LookupArgs {
    /// Product code (`00071-0155`) or drug/ingredient name.
    #[arg(value_name = "IDENTIFIER")]
    pub identifier: String,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Print the entry as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct QueryArgs {
    #[arg(value_name = "TERM")]
    pub term: String,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Number of neighbors (default from config).
    #[arg(long = "top-k", value_name = "N")]
    pub top_k: Option<usize>,

    /// Print hits as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Terms to test against the candidate filter.
    #[arg(value_name = "TERM", required = true)]
    pub terms: Vec<String>,

    /// Exclusion word lists (TOML) replacing the built-in lexicon.
    #[arg(long, value_name = "PATH")]
    pub lexicon: Option<PathBuf>,

    /// Additional word to exclude; repeatable.
    #[arg(long = "exclude-word", value_name = "WORD")]
    pub exclude_words: Vec<String>,
}

#[derive(Args)]
pub struct LinesArgs {
    /// Document to search; `-` reads stdin.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    #[arg(value_name = "TERM")]
    pub query: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OracleArg {
    RejectAll,
    AcceptAll,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SimilarityArg {
    Fuzzy,
    None,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
