//! Clap derive structures for the `pfsight` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use pfsight_api::{Operation, SortOrder};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pfsight -- query and watch a pfSense firewall
#[derive(Debug, Parser)]
#[command(
    name = "pfsight",
    version,
    about = "Query the pfSense REST API and watch interface throughput",
    long_about = "Issues authenticated requests against the pfSense REST API (v2).\n\n\
        Credentials come from PFSENSE_API_URL and PFSENSE_API_KEY, or from\n\
        the config file named by --config.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the TOML config file
    #[arg(long, env = "PFSIGHT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PFSIGHT_OUTPUT",
        default_value = "plain",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines (default)
    Plain,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send one request to the firewall API and print the result envelope
    #[command(alias = "q")]
    Query(QueryArgs),

    /// Poll an interface and print throughput samples
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Inspect resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Endpoint path, e.g. /api/v2/firewall/rules
    pub endpoint: String,

    /// HTTP operation
    #[arg(long = "request", short = 'X', default_value = "get", value_parser = parse_operation)]
    pub operation: Operation,

    /// Filter as key=value (repeatable, order kept)
    #[arg(long = "filter", short = 'f', value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Field to sort by
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort flags passed through to the API
    #[arg(long)]
    pub sort_flags: Option<String>,

    /// Sort direction
    #[arg(long, value_parser = parse_sort_order)]
    pub sort_order: Option<SortOrder>,

    /// JSON request body (required for post and put)
    #[arg(long, short = 'd')]
    pub data: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Interface to sample (overrides config)
    #[arg(long, short = 'i')]
    pub interface: Option<String>,

    /// Poll interval in milliseconds (overrides config)
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Stop after this many rate samples
    #[arg(long, short = 'n')]
    pub count: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved settings (API key redacted)
    Show,
    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

// ── Value parsers ────────────────────────────────────────────────────

fn parse_operation(s: &str) -> Result<Operation, String> {
    s.parse()
}

fn parse_sort_order(s: &str) -> Result<SortOrder, String> {
    s.parse()
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
        _ => Err(format!("expected key=value, got '{s}'")),
    }
}
