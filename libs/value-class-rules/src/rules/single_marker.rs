use crate::node::{Node, NodeKind};
use crate::violation::Violation;

use super::{Rule, RuleContext};

/// Flags classes carrying more than one marker attribute. Only the first one
/// in source order decides how the class is treated, so the others are dead
/// weight at best. Disabled unless enabled in configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleMarkerRule;

impl Rule for SingleMarkerRule {
    fn name(&self) -> &'static str {
        "single_marker"
    }

    fn identifier(&self) -> &'static str {
        "typedClass.multipleMarkers"
    }

    fn description(&self) -> &'static str {
        "Classes must carry at most one type attribute"
    }

    fn node_kind(&self) -> NodeKind {
        NodeKind::Class
    }

    fn enabled_by_default(&self) -> bool {
        false
    }

    fn process(&self, node: &Node, ctx: &RuleContext<'_>) -> Vec<Violation> {
        let Node::Class(class_node) = node else {
            return vec![];
        };
        let Some(declaration) = ctx.reflection.class(&class_node.class) else {
            return vec![];
        };

        let markers = ctx.markers.resolve_all(declaration, ctx.reflection);
        let [first, _, ..] = markers.as_slice() else {
            return vec![];
        };

        let listed = markers
            .iter()
            .map(|m| format!("#[{}]", m.short_name()))
            .collect::<Vec<_>>()
            .join(", ");
        let class = &declaration.name;
        vec![ctx.violation(
            self,
            &class_node.span,
            class.clone(),
            format!(
                "Class {class} is marked with multiple type attributes ({listed}). \
                 Only the first one (#[{}]) is taken into account.",
                first.short_name()
            ),
        )]
    }
}
