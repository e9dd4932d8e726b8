//! Error types at the edges of the rule engine.
//!
//! None of these abort an analysis run: instantiation failures are recovered by
//! the marker resolver, and configuration or snapshot errors happen before any
//! node is visited.

use std::path::PathBuf;

use crate::model::ClassName;

/// Why the host could not produce an attribute instance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstantiationError {
    #[error("attribute class '{class}' is not known")]
    ClassNotFound { class: ClassName },

    #[error("attribute class '{class}' cannot be loaded: {reason}")]
    Unloadable { class: ClassName, reason: String },

    #[error("attribute class '{class}' is not instantiable")]
    NotInstantiable { class: ClassName },

    #[error("constructing attribute '{class}' failed: {reason}")]
    ConstructorFailed { class: ClassName, reason: String },

    #[error("constructing attribute '{class}' panicked: {message}")]
    Panicked { class: ClassName, message: String },
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file '{}' does not exist", path.display())]
    FileNotFound { path: PathBuf },

    #[error("invalid configuration: {source}")]
    Invalid {
        #[source]
        source: Box<figment::Error>,
    },

    #[error("unknown rule '{name}' in configuration")]
    UnknownRule { name: String },
}

impl From<figment::Error> for ConfigError {
    fn from(source: figment::Error) -> Self {
        Self::Invalid {
            source: Box::new(source),
        }
    }
}

/// Errors raised while loading a program snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON snapshot '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML snapshot '{}': {message}", path.display())]
    Yaml { path: PathBuf, message: String },

    #[error("unsupported snapshot format for '{}' (expected .json, .yaml or .yml)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("class '{class}' is declared more than once")]
    DuplicateClass { class: ClassName },
}
