use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Args;
use value_class_rules::{AnalysisReport, LintConfig, Program, RuleEngine};

use crate::output;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Program snapshots to check (.json, .yaml or .yml)
    #[arg(value_name = "PROGRAM", required = true)]
    programs: Vec<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Enable a rule (can be specified multiple times)
    #[arg(long, value_name = "RULE", action = clap::ArgAction::Append)]
    enable: Vec<String>,

    /// Disable a rule (can be specified multiple times)
    #[arg(long, value_name = "RULE", action = clap::ArgAction::Append)]
    disable: Vec<String>,
}

impl CheckArgs {
    pub fn run(&self, mut config: LintConfig) -> anyhow::Result<ExitCode> {
        for rule in &self.enable {
            config.set_enabled(rule, true);
        }
        for rule in &self.disable {
            config.set_enabled(rule, false);
        }

        let engine = RuleEngine::from_config(&config)?;
        tracing::info!(
            rules = engine.rules().count(),
            programs = self.programs.len(),
            "starting check"
        );

        let mut report = AnalysisReport::default();
        for path in &self.programs {
            let program = Program::load(path)
                .with_context(|| format!("failed to load program '{}'", path.display()))?;
            report.merge(engine.analyse_program(&program));
        }

        if self.json {
            output::print_json_results(&report, self.programs.len())?;
        } else {
            output::print_results(&report, self.programs.len());
        }

        Ok(if report.is_clean() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}
