//! MiFIR transaction report CLI.

use clap::Parser;

use mifir_cli::logging::{LogConfig, LogFormat, init_logging};

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg};
use crate::commands::{run_generate, run_suggest};

fn main() {
    let cli = Cli::parse();
    init_logging(&log_config_from_cli(&cli));
    let result = match cli.command {
        Command::Suggest(args) => run_suggest(&args),
        Command::Generate(args) => run_generate(&args),
    };
    if let Err(error) = result {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

/// Build logging configuration from CLI flags: an explicit verbosity
/// flag wins over `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !cli.verbosity.is_present(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
    }
}
