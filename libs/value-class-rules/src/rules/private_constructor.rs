use crate::model::Visibility;
use crate::node::{Node, NodeKind};
use crate::violation::Violation;

use super::{Rule, RuleContext, marked_class};

/// Marked classes must not expose their constructor, so that values are only
/// created through the factory. An implicit constructor is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrivateConstructorRule;

impl Rule for PrivateConstructorRule {
    fn name(&self) -> &'static str {
        "private_constructor"
    }

    fn identifier(&self) -> &'static str {
        "typedClass.constructor"
    }

    fn description(&self) -> &'static str {
        "Classes marked with a type attribute must declare their constructor private"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Class
    }

    fn process(&self, node: &Node, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let Some(marked) = marked_class(node, ctx) else {
            return vec![];
        };
        let Some(constructor) = marked.declaration.constructor else {
            return vec![];
        };
        if constructor.visibility == Visibility::Private {
            return vec![];
        }

        let class = &marked.declaration.name;
        vec![ctx.violation(
            self,
            &marked.node.span,
            class.clone(),
            format!(
                "Class {class} is marked with #[{}] and must have a private constructor, \
                 but it has a {} constructor. Change the constructor visibility to private.",
                marked.marker.short_name(),
                constructor.visibility
            ),
        )]
    }
}
