//! CLI argument definitions for the MiFIR report generator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser)]
#[command(
    name = "mifir-report",
    version,
    about = "MiFIR RTS 22 transaction report generator",
    long_about = "Map tabular trading records onto the ISO 20022 auth.016.001.01 schema.\n\n\
                  `suggest` analyzes a CSV export and proposes a column-to-field mapping;\n\
                  `generate` renders the mapped data as a submission-shaped XML report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a CSV export and propose a field mapping.
    Suggest(SuggestArgs),

    /// Generate an XML transaction report from a CSV export.
    Generate(GenerateArgs),
}

#[derive(Parser)]
pub struct SuggestArgs {
    /// Path to the CSV export.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Write the proposed mapping and constants as JSON.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Path to the CSV export.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Mapping JSON: field name to column name, "None", or "[Constant Value]".
    #[arg(long = "mapping", value_name = "PATH")]
    pub mapping: Option<PathBuf>,

    /// Constants JSON: field name to fixed value.
    #[arg(long = "constants", value_name = "PATH")]
    pub constants: Option<PathBuf>,

    /// Custom field definitions JSON.
    #[arg(long = "custom-fields", value_name = "PATH")]
    pub custom_fields: Option<PathBuf>,

    /// Output XML path (default: the CSV path with an .xml extension).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Emit only custom fields instead of the full transaction record.
    #[arg(long = "custom-only")]
    pub custom_only: bool,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
