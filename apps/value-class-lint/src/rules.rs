use std::process::ExitCode;

use clap::Args;
use colored::Colorize;
use value_class_rules::LintConfig;
use value_class_rules::rules::builtin_rules;

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Output the rule list as JSON
    #[arg(long)]
    json: bool,
}

#[derive(serde::Serialize)]
struct RuleInfo {
    name: &'static str,
    identifier: &'static str,
    enabled: bool,
    description: &'static str,
}

impl RulesArgs {
    pub fn run(&self, config: &LintConfig) -> anyhow::Result<ExitCode> {
        tracing::debug!(json = self.json, "listing rules");

        let rules: Vec<RuleInfo> = builtin_rules()
            .iter()
            .map(|rule| RuleInfo {
                name: rule.name(),
                identifier: rule.identifier(),
                enabled: config.is_enabled(rule.as_ref()),
                description: rule.description(),
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rules)?);
            return Ok(ExitCode::SUCCESS);
        }

        for rule in &rules {
            let state = if rule.enabled {
                "enabled".green()
            } else {
                "disabled".dimmed()
            };
            println!(
                "{:<26} {:<26} {:<9} {}",
                rule.name.bold(),
                rule.identifier,
                state,
                rule.description
            );
        }
        Ok(ExitCode::SUCCESS)
    }
}
