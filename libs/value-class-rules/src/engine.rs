//! Rule registry and traversal driver.
//!
//! The engine visits nodes in the order the host supplies them, runs every
//! registered rule for the node's kind and appends the violations in that
//! order, so the report is reproducible for identical input.

use crate::config::LintConfig;
use crate::error::ConfigError;
use crate::host::Host;
use crate::marker::MarkerResolver;
use crate::node::{NodeKind, SourceNode};
use crate::program::Program;
use crate::rules::{DEFAULT_FACTORY_FUNCTION, Rule, RuleContext, builtin_rules};
use crate::violation::{AnalysisReport, Severity, Violation};

struct RegisteredRule {
    rule: Box<dyn Rule>,
    severity: Severity,
}

/// Runs registered rules over class-declaration and construction nodes.
pub struct RuleEngine {
    rules: Vec<RegisteredRule>,
    markers: MarkerResolver,
    factory_function: String,
}

impl Default for RuleEngine {
    /// The default configuration: built-in rules enabled by default, default
    /// marker interface and factory function.
    fn default() -> Self {
        let config = LintConfig::default();
        let mut engine = Self::new(MarkerResolver::default(), DEFAULT_FACTORY_FUNCTION);
        for rule in builtin_rules() {
            if config.is_enabled(rule.as_ref()) {
                engine = engine.with_rule(rule, Severity::Error);
            }
        }
        engine
    }
}

impl RuleEngine {
    /// Creates an engine without rules.
    #[must_use]
    pub fn new(markers: MarkerResolver, factory_function: impl Into<String>) -> Self {
        Self {
            rules: Vec::new(),
            markers,
            factory_function: factory_function.into(),
        }
    }

    /// Builds an engine with the built-in rules selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRule`] if the configuration names a rule
    /// that does not exist.
    pub fn from_config(config: &LintConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut engine = Self::new(
            MarkerResolver::new(config.marker_interface.as_str()),
            config.factory_function.as_str(),
        );
        for rule in builtin_rules() {
            if config.is_enabled(rule.as_ref()) {
                let severity = config.severity(rule.as_ref());
                engine = engine.with_rule(rule, severity);
            } else {
                tracing::debug!(rule = rule.name(), "rule disabled");
            }
        }
        Ok(engine)
    }

    #[must_use]
    pub fn with_rule(mut self, rule: Box<dyn Rule>, severity: Severity) -> Self {
        self.rules.push(RegisteredRule { rule, severity });
        self
    }

    /// Registered rules in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|registered| registered.rule.as_ref())
    }

    /// Runs every rule registered for the node's kind.
    #[must_use]
    pub fn check_node<H: Host>(&self, host: &H, node: &SourceNode) -> Vec<Violation> {
        let kind = node.node.kind();
        let scope = host.scope_at(node);
        let mut violations = Vec::new();

        for registered in self.rules.iter().filter(|r| r.rule.node_kind() == kind) {
            let ctx = RuleContext {
                scope: scope.as_ref(),
                reflection: host,
                markers: &self.markers,
                factory_function: &self.factory_function,
                severity: registered.severity,
            };
            let found = registered.rule.process(&node.node, &ctx);
            tracing::trace!(
                rule = registered.rule.name(),
                location = %node.node.span(),
                violations = found.len(),
                "rule processed"
            );
            violations.extend(found);
        }

        violations
    }

    /// Visits `nodes` in order and collects the violations of every rule.
    #[must_use]
    pub fn analyse<H: Host>(&self, host: &H, nodes: &[SourceNode]) -> AnalysisReport {
        let span = tracing::debug_span!("analyse", nodes = nodes.len(), rules = self.rules.len());
        let _guard = span.enter();

        let mut report = AnalysisReport::default();
        for node in nodes {
            report.nodes_visited += 1;
            match node.node.kind() {
                NodeKind::Class => report.classes_checked += 1,
                NodeKind::New => report.constructions_checked += 1,
            }
            report.violations.extend(self.check_node(host, node));
        }

        tracing::debug!(
            nodes = report.nodes_visited,
            violations = report.violations.len(),
            "analysis finished"
        );
        report
    }

    /// Analyses all nodes of an in-memory program.
    #[must_use]
    pub fn analyse_program(&self, program: &Program) -> AnalysisReport {
        self.analyse(program, program.nodes())
    }
}
