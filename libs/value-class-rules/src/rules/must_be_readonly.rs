use crate::node::{Node, NodeKind};
use crate::violation::Violation;

use super::{Rule, RuleContext, marked_class};

/// Marked classes must be `readonly`: no property may be reassigned once the
/// value is constructed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MustBeReadonlyRule;

impl Rule for MustBeReadonlyRule {
    fn name(&self) -> &'static str {
        "must_be_readonly"
    }

    fn identifier(&self) -> &'static str {
        "typedClass.readonly"
    }

    fn description(&self) -> &'static str {
        "Classes marked with a type attribute must be declared readonly"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Class
    }

    fn process(&self, node: &Node, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let Some(marked) = marked_class(node, ctx) else {
            return vec![];
        };
        if marked.declaration.is_readonly() {
            return vec![];
        }

        let class = &marked.declaration.name;
        vec![ctx.violation(
            self,
            &marked.node.span,
            class.clone(),
            format!(
                "Class {class} is marked with #[{}] and must be declared as readonly. \
                 Add the readonly modifier to the class declaration.",
                marked.marker.short_name()
            ),
        )]
    }
}
