use crate::node::{Node, NodeKind};
use crate::violation::Violation;

use super::{Rule, RuleContext, marked_class};

/// Marked classes must be `final` so that no subclass can widen the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct MustBeFinalRule;

impl Rule for MustBeFinalRule {
    fn name(&self) -> &'static str {
        "must_be_final"
    }

    fn identifier(&self) -> &'static str {
        "typedClass.final"
    }

    fn description(&self) -> &'static str {
        "Classes marked with a type attribute must be declared final"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Class
    }

    fn process(&self, node: &Node, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let Some(marked) = marked_class(node, ctx) else {
            return vec![];
        };
        if marked.declaration.is_final() {
            return vec![];
        }

        let class = &marked.declaration.name;
        vec![ctx.violation(
            self,
            &marked.node.span,
            class.clone(),
            format!(
                "Class {class} is marked with #[{}] and must be declared as final. \
                 Add the final modifier to the class declaration.",
                marked.marker.short_name()
            ),
        )]
    }
}
