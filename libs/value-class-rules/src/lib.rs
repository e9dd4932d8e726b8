//! Structural rules for value classes.
//!
//! A *value class* wraps a primitive or a collection and is tagged with a
//! marker attribute (`#[StringBased]`, `#[IntegerBased]`, `#[FloatBased]`,
//! `#[ListBased]`, ... all implementing one marker interface). Marked classes
//! must be `final`, `readonly`, keep their constructor private, and must only
//! be created through the designated factory function.
//!
//! The crate provides:
//! - [`MarkerResolver`]: decides whether a class is marked, tolerating
//!   attribute classes that cannot be loaded
//! - [`resolve_candidates`]: the classes a construction expression may create
//! - the [`rules`] built on those two, and a [`RuleEngine`] driving them
//! - [`Program`]: an in-memory host loaded from a JSON or YAML snapshot
//!
//! Parsing, type inference and reflection stay with the host, behind the
//! traits in [`host`].
//!
//! # Example
//! ```
//! use value_class_rules::model::{AttributeRef, ClassDeclaration};
//! use value_class_rules::node::{SourceNode, Span};
//! use value_class_rules::{Program, RuleEngine, DEFAULT_MARKER_INTERFACE};
//!
//! let program = Program::new()
//!     .with_class(ClassDeclaration::interface(DEFAULT_MARKER_INTERFACE))
//!     .with_class(
//!         ClassDeclaration::new("Wwwision\\Types\\Attributes\\StringBased")
//!             .with_interface(DEFAULT_MARKER_INTERFACE),
//!     )
//!     .with_class(
//!         ClassDeclaration::new("Acme\\Email")
//!             .with_attribute(AttributeRef::new("Wwwision\\Types\\Attributes\\StringBased"))
//!             .with_final()
//!             .with_readonly(),
//!     )
//!     .with_node(SourceNode::class("Acme\\Email", Span::new("src/Email.php", 7, 1)));
//!
//! let report = RuleEngine::default().analyse_program(&program);
//! assert!(report.is_clean());
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod candidates;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod marker;
pub mod model;
pub mod node;
pub mod program;
pub mod rules;
pub mod types;
pub mod violation;

pub use candidates::{CandidateClassSet, resolve_candidates};
pub use config::LintConfig;
pub use engine::RuleEngine;
pub use error::{ConfigError, InstantiationError, ProgramError};
pub use host::{Host, ReflectionProvider, Scope};
pub use marker::{AttributeProbe, DEFAULT_MARKER_INTERFACE, MarkerMatch, MarkerResolver};
pub use program::Program;
pub use rules::{DEFAULT_FACTORY_FUNCTION, Rule, RuleContext};
pub use violation::{AnalysisReport, Severity, Violation};
