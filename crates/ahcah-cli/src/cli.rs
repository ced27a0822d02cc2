//! CLI argument definitions for the AHCAH export pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ahcah-pipeline",
    version,
    about = "AHCAH export pipeline - redact, standardize, and clean measure/waiver exports",
    long_about = "Process Acute Hospital Care at Home measure and waiver exports.\n\n\
                  Runs up to three stages over one data directory: redact tracker\n\
                  issue keys out of the raw exports, standardize every table to one\n\
                  canonical shape, and apply the manual correction rules."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
    /// Mask tracker issue keys in the raw exports.
    Redact(RedactArgs),

    /// Standardize redacted exports to the canonical table shape.
    Standardize(StandardizeArgs),

    /// Apply the manual correction rules to standardized tables.
    Clean(CleanArgs),

    /// Run redact, standardize, and clean in order.
    Run(RunArgs),
}

#[derive(Parser)]
pub struct RedactArgs {
    /// Path to the data directory containing the raw/ exports.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Process and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct StandardizeArgs {
    /// Path to the data directory containing the redacted/ exports.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Export schema generation the input files follow.
    #[arg(long = "profile", value_enum, default_value = "legacy")]
    pub profile: ProfileArg,

    /// Null unparseable date values instead of failing the file.
    #[arg(long = "lenient-dates")]
    pub lenient_dates: bool,

    /// Process and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Path to the data directory containing the standardized/ tables.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Process and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the data directory (raw/ inputs, manual/ rename table).
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Export schema generation the input files follow.
    #[arg(long = "profile", value_enum, default_value = "legacy")]
    pub profile: ProfileArg,

    /// Null unparseable date values instead of failing the file.
    #[arg(long = "lenient-dates")]
    pub lenient_dates: bool,

    /// Process and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// CLI schema profile choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ProfileArg {
    Legacy,
    Current,
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
