//! Engine configuration.
//!
//! Values are layered with `figment`, lowest priority first:
//!
//! 1. built-in defaults ([`LintConfig::default`]);
//! 2. an optional YAML file;
//! 3. environment variables prefixed with `VALUE_LINT_`, nested keys separated
//!    by `__` (e.g. `VALUE_LINT_RULES__SINGLE_MARKER__ENABLED=true`).

use std::collections::BTreeMap;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::marker::DEFAULT_MARKER_INTERFACE;
use crate::rules::{DEFAULT_FACTORY_FUNCTION, Rule, builtin_rules};
use crate::violation::Severity;

/// Prefix of environment variables overriding configuration values.
pub const ENV_PREFIX: &str = "VALUE_LINT_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Interface implemented by every marker attribute.
    pub marker_interface: String,
    /// Factory function suggested instead of direct construction.
    pub factory_function: String,
    /// Per-rule overrides keyed by rule name.
    pub rules: BTreeMap<String, RuleSettings>,
    pub logging: LoggingConfig,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            marker_interface: DEFAULT_MARKER_INTERFACE.to_owned(),
            factory_function: DEFAULT_FACTORY_FUNCTION.to_owned(),
            rules: BTreeMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    pub enabled: Option<bool>,
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
        }
    }
}

impl LintConfig {
    /// Loads configuration from defaults, the optional YAML file and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if `path` is given but missing, and
    /// [`ConfigError::Invalid`] if the merged values do not form a valid configuration.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
            tracing::debug!(path = %path.display(), "loading configuration file");
            figment = figment.merge(Yaml::file(path));
        }

        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every configured rule name refers to a known rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRule`] for the first unknown rule name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let known = builtin_rules();
        if let Some(name) = self
            .rules
            .keys()
            .find(|name| !known.iter().any(|rule| rule.name() == name.as_str()))
        {
            return Err(ConfigError::UnknownRule { name: name.clone() });
        }
        Ok(())
    }

    /// Whether `rule` should run, honoring its default when not configured.
    #[must_use]
    pub fn is_enabled(&self, rule: &dyn Rule) -> bool {
        self.rules
            .get(rule.name())
            .and_then(|settings| settings.enabled)
            .unwrap_or_else(|| rule.enabled_by_default())
    }

    #[must_use]
    pub fn severity(&self, rule: &dyn Rule) -> Severity {
        self.rules
            .get(rule.name())
            .and_then(|settings| settings.severity)
            .unwrap_or_default()
    }

    /// Forces a rule on or off, e.g. from a command-line flag.
    pub fn set_enabled(&mut self, rule_name: &str, enabled: bool) {
        self.rules.entry(rule_name.to_owned()).or_default().enabled = Some(enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{MustBeFinalRule, SingleMarkerRule};
    use std::io::Write;

    #[test]
    fn defaults_enable_core_rules_only() {
        let config = LintConfig::default();
        assert!(config.is_enabled(&MustBeFinalRule));
        assert!(!config.is_enabled(&SingleMarkerRule));
        assert_eq!(config.severity(&MustBeFinalRule), Severity::Error);
        assert_eq!(config.marker_interface, DEFAULT_MARKER_INTERFACE);
    }

    #[test]
    fn set_enabled_overrides_default() {
        let mut config = LintConfig::default();
        config.set_enabled("single_marker", true);
        config.set_enabled("must_be_final", false);
        assert!(config.is_enabled(&SingleMarkerRule));
        assert!(!config.is_enabled(&MustBeFinalRule));
    }

    #[test]
    fn unknown_rule_is_rejected() {
        let mut config = LintConfig::default();
        config.set_enabled("must_be_purple", true);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRule { name } if name == "must_be_purple"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = LintConfig::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn file_and_environment_are_layered() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            r#"
marker_interface: Acme\Attributes\ValueObject
factory_function: Acme\make
rules:
  must_be_readonly:
    severity: warning
  single_marker:
    enabled: true
"#
        )
        .unwrap();

        temp_env::with_vars(
            [
                ("VALUE_LINT_FACTORY_FUNCTION", Some("Acme\\build")),
                ("VALUE_LINT_RULES__MUST_BE_FINAL__ENABLED", Some("false")),
            ],
            || {
                let config = LintConfig::load(Some(file.path())).unwrap();
                assert_eq!(config.marker_interface, "Acme\\Attributes\\ValueObject");
                assert_eq!(config.factory_function, "Acme\\build");
                assert_eq!(
                    config.rules.get("must_be_readonly").and_then(|s| s.severity),
                    Some(Severity::Warning)
                );
                assert_eq!(
                    config.rules.get("single_marker").and_then(|s| s.enabled),
                    Some(true)
                );
                assert_eq!(
                    config.rules.get("must_be_final").and_then(|s| s.enabled),
                    Some(false)
                );
            },
        );
    }
}
