//! Rules enforced on marked value classes.
//!
//! Every rule is registered for one node kind and is a pure function of the
//! node and a read-only [`RuleContext`]. Rules never share state, so they can
//! run in any order.

mod must_be_final;
mod must_be_readonly;
mod must_not_be_constructed;
mod private_constructor;
mod single_marker;

pub use must_be_final::MustBeFinalRule;
pub use must_be_readonly::MustBeReadonlyRule;
pub use must_not_be_constructed::MustNotBeConstructedRule;
pub use private_constructor::PrivateConstructorRule;
pub use single_marker::SingleMarkerRule;

use crate::host::{ReflectionProvider, Scope};
use crate::marker::{MarkerMatch, MarkerResolver};
use crate::model::{ClassDeclaration, ClassName};
use crate::node::{ClassNode, Node, NodeKind, Span};
use crate::violation::{Severity, Violation};

/// Default factory entry point suggested by the construction guard.
pub const DEFAULT_FACTORY_FUNCTION: &str = "Wwwision\\Types\\instantiate";

/// A structural check on one kind of node.
pub trait Rule: Send + Sync {
    /// Rule name used in configuration, e.g. `must_be_final`.
    fn name(&self) -> &'static str;

    /// Stable identifier attached to every violation, e.g. `typedClass.final`.
    fn identifier(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// The node kind this rule is invoked on.
    fn node_kind(&self) -> NodeKind;

    fn enabled_by_default(&self) -> bool {
        true
    }

    /// Checks a single node. `node` is always of [`Rule::node_kind`].
    fn process(&self, node: &Node, ctx: &RuleContext<'_>) -> Vec<Violation>;
}

/// Read-only inputs shared by every rule invocation.
pub struct RuleContext<'a> {
    pub scope: &'a dyn Scope,
    pub reflection: &'a dyn ReflectionProvider,
    pub markers: &'a MarkerResolver,
    /// Fully-qualified factory function suggested instead of direct construction.
    pub factory_function: &'a str,
    /// Severity assigned to violations of the rule being run.
    pub severity: Severity,
}

impl RuleContext<'_> {
    #[must_use]
    pub fn violation(
        &self,
        rule: &dyn Rule,
        location: &Span,
        subject: ClassName,
        message: String,
    ) -> Violation {
        Violation {
            rule: rule.name(),
            identifier: rule.identifier(),
            severity: self.severity,
            message,
            location: location.clone(),
            subject,
        }
    }
}

/// A class-declaration node whose class carries a marker attribute.
pub struct MarkedClass<'a> {
    pub node: &'a ClassNode,
    pub declaration: &'a ClassDeclaration,
    pub marker: MarkerMatch,
}

/// Resolves the declaration behind a class node and its marker. Unknown
/// classes and unmarked classes yield `None`.
#[must_use]
pub fn marked_class<'a>(node: &'a Node, ctx: &RuleContext<'a>) -> Option<MarkedClass<'a>> {
    let Node::Class(class_node) = node else {
        return None;
    };
    let Some(declaration) = ctx.reflection.class(&class_node.class) else {
        tracing::debug!(class = %class_node.class, "class node without reflection; skipping");
        return None;
    };
    let marker = ctx.markers.resolve(declaration, ctx.reflection)?;
    Some(MarkedClass {
        node: class_node,
        declaration,
        marker,
    })
}

/// Every rule shipped with the engine, in registration order.
#[must_use]
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(MustBeFinalRule),
        Box::new(MustBeReadonlyRule),
        Box::new(PrivateConstructorRule),
        Box::new(MustNotBeConstructedRule),
        Box::new(SingleMarkerRule),
    ]
}
