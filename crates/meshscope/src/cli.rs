//! Clap derive structures for the `meshscope` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Only depends on clap + clap_complete so `build.rs` can include it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// meshscope -- WiFi mesh topology and coverage analysis
#[derive(Debug, Parser)]
#[command(
    name = "meshscope",
    version,
    about = "Classify WiFi mesh topologies and score coverage from scan data",
    long_about = "Reads `iw` scan/link output (or JSON exports) and reports, per SSID,\n\
        whether the network is a single AP, independent APs, or a mesh.\n\n\
        Mesh networks get a coverage score, issue list, and an estimated\n\
        overlap layout of their nodes.",
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
    /// Output format [default: table, or `defaults.output` from config]
    #[arg(long, short = 'o', env = "MESHSCOPE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto]
    #[arg(long, env = "MESHSCOPE_COLOR", global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Config file to use instead of the platform default
    #[arg(long, env = "MESHSCOPE_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
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

/// Format of scan and link input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Raw `iw dev <if> scan` / `iw dev <if> link` text
    Iw,
    /// JSON exported by `meshscope` or another collector
    Json,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify the topology of every SSID in a scan
    #[command(alias = "a")]
    Analyze(AnalyzeArgs),

    /// Rank roaming candidates for the current connection
    #[command(alias = "alt")]
    Alternatives(AlternativesArgs),

    /// Detect connection problem patterns in an event log
    #[command(alias = "p")]
    Patterns(PatternsArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ANALYZE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Scan file, or `-` for stdin
    pub input: PathBuf,

    /// Only analyze this SSID
    #[arg(long, short = 's')]
    pub ssid: Option<String>,

    /// Input format
    #[arg(long, short = 'f', default_value = "iw")]
    pub input_format: InputFormat,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ALTERNATIVES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AlternativesArgs {
    /// Scan file, or `-` for stdin
    pub scan: PathBuf,

    /// Current link (`iw dev <if> link` output, or a JSON object)
    #[arg(long, short = 'l')]
    pub link: PathBuf,

    /// Connection event log (JSON array) used for stability scores
    #[arg(long, short = 'e')]
    pub events: Option<PathBuf>,

    /// Max candidates [default: `alternatives.limit` from config]
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Format of the scan and link files
    #[arg(long, short = 'f', default_value = "iw")]
    pub input_format: InputFormat,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PATTERNS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PatternsArgs {
    /// Connection event log (JSON array), or `-` for stdin
    pub events: PathBuf,

    /// Look-back window in hours [default: `patterns.window_hours` from config]
    #[arg(long, short = 'w')]
    pub window_hours: Option<u32>,

    /// End of the window as RFC 3339 [default: now]
    #[arg(long)]
    pub now: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
