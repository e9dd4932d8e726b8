use crate::candidates::resolve_candidates;
use crate::node::{Node, NodeKind};
use crate::violation::Violation;

use super::{Rule, RuleContext};

/// Marked classes must be created through the factory, never with a direct
/// construction expression.
///
/// Every class the expression may construct is considered; the first marked
/// candidate produces the single violation for the expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct MustNotBeConstructedRule;

impl Rule for MustNotBeConstructedRule {
    fn name(&self) -> &'static str {
        "must_not_be_constructed"
    }

    fn identifier(&self) -> &'static str {
        "typedClass.construction"
    }

    fn description(&self) -> &'static str {
        "Classes marked with a type attribute must not be constructed directly"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::New
    }

    fn process(&self, node: &Node, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let Node::New(expr) = node else {
            return vec![];
        };

        for class in &resolve_candidates(expr, ctx.scope, ctx.reflection) {
            let Some(declaration) = ctx.reflection.class(class) else {
                tracing::debug!(%class, "construction candidate is not a known class; skipping");
                continue;
            };
            let Some(marker) = ctx.markers.resolve(declaration, ctx.reflection) else {
                continue;
            };
            let class = &declaration.name;

            return vec![ctx.violation(
                self,
                &expr.span,
                class.clone(),
                format!(
                    "Instantiation of class {class} is forbidden because it is marked with #[{}]. \
                     Use `{}({class}::class, $value)` instead.",
                    marker.short_name(),
                    ctx.factory_function
                ),
            )];
        }

        vec![]
    }
}
