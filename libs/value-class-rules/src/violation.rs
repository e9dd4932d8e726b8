//! Violations reported by the rules and the per-run report.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::ClassName;
use crate::node::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// A single invariant failure attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Rule name, e.g. `must_be_final`
    pub rule: &'static str,
    /// Stable error identifier, e.g. `typedClass.final`
    pub identifier: &'static str,
    pub severity: Severity,
    pub message: String,
    pub location: Span,
    /// Class the violation is about
    pub subject: ClassName,
}

impl Violation {
    /// Format the violation for human-readable output:
    /// `{file}:{line}:{column}: {message} [{identifier}]`
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        format!("{}: {} [{}]", self.location, self.message, self.identifier)
    }
}

/// Result of analysing a set of nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub nodes_visited: usize,
    pub classes_checked: usize,
    pub constructions_checked: usize,
    /// Violations in node visitation order.
    pub violations: Vec<Violation>,
}

impl AnalysisReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count()
    }

    /// Number of violations per rule name.
    #[must_use]
    pub fn count_by_rule(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for violation in &self.violations {
            *counts.entry(violation.rule).or_insert(0) += 1;
        }
        counts
    }

    /// Appends another report, keeping this report's violations first.
    pub fn merge(&mut self, other: Self) {
        self.nodes_visited += other.nodes_visited;
        self.classes_checked += other.classes_checked;
        self.constructions_checked += other.constructions_checked;
        self.violations.extend(other.violations);
    }
}
