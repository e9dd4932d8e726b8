//! Value-class lint
//!
//! Checks program snapshots against the structural rules for value classes:
//! marked classes must be final, readonly, keep a private constructor, and
//! must only be created through the factory function.
//!
//! # Usage
//!
//! ```bash
//! # Check one or more snapshots
//! value-class-lint check build/program.json
//!
//! # With a configuration file and the opt-in rule enabled
//! value-class-lint --config value-lint.yaml check --enable single_marker build/*.json
//!
//! # JSON output
//! value-class-lint check --json build/program.yaml
//!
//! # List available rules
//! value-class-lint rules
//! ```

// CLI tools are expected to print to stdout/stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod check;
mod logging;
mod output;
mod rules;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use value_class_rules::LintConfig;

#[derive(Parser, Debug)]
#[command(name = "value-class-lint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// YAML configuration file
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set (e.g. "debug", "`value_class_rules=trace`")
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check program snapshots
    Check(check::CheckArgs),
    /// List available rules
    Rules(rules::RulesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let logging = logging::init(cli.log_level.as_deref());
    let config = LintConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    logging.apply_configured_level(&config.logging.level);

    match cli.command {
        Commands::Check(args) => args.run(config),
        Commands::Rules(args) => args.run(&config),
    }
}
