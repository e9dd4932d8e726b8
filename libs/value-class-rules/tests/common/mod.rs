//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use value_class_rules::model::{AttributeRef, ClassDeclaration, Visibility};
use value_class_rules::node::{ClassSpec, LexicalContext, SourceNode, Span};
use value_class_rules::{AnalysisReport, DEFAULT_MARKER_INTERFACE, Program, RuleEngine};

pub const STRING_BASED: &str = "Wwwision\\Types\\Attributes\\StringBased";
pub const INTEGER_BASED: &str = "Wwwision\\Types\\Attributes\\IntegerBased";
pub const FLOAT_BASED: &str = "Wwwision\\Types\\Attributes\\FloatBased";
pub const LIST_BASED: &str = "Wwwision\\Types\\Attributes\\ListBased";
/// Marker attribute whose class depends on an optional package that is not installed.
pub const GEO_BASED: &str = "Acme\\Geo\\Attributes\\CoordinateBased";
pub const DEPRECATED: &str = "Acme\\Attributes\\Deprecated";

/// Symbol table with the marker taxonomy and a few unrelated attributes.
pub fn taxonomy() -> Program {
    let mut program =
        Program::new().with_class(ClassDeclaration::interface(DEFAULT_MARKER_INTERFACE));
    for marker in [STRING_BASED, INTEGER_BASED, FLOAT_BASED, LIST_BASED] {
        program = program.with_class(
            ClassDeclaration::new(marker)
                .with_final()
                .with_interface(DEFAULT_MARKER_INTERFACE),
        );
    }
    program
        .with_class(
            ClassDeclaration::new(GEO_BASED)
                .with_interface(DEFAULT_MARKER_INTERFACE)
                .with_interface("Geo\\Contracts\\Projection")
                .unloadable(),
        )
        .with_class(ClassDeclaration::new(DEPRECATED))
}

pub fn marked(name: &str, attribute: &str) -> ClassDeclaration {
    ClassDeclaration::new(name).with_attribute(AttributeRef::new(attribute))
}

/// A marked class that satisfies every invariant.
pub fn compliant(name: &str, attribute: &str) -> ClassDeclaration {
    marked(name, attribute)
        .with_final()
        .with_readonly()
        .with_constructor(Visibility::Private)
}

pub fn class_node(name: &str) -> SourceNode {
    let file = format!("src/{}.php", name.rsplit('\\').next().unwrap_or(name));
    SourceNode::class(name, Span::new(file, 5, 1))
}

pub fn new_node(spec: ClassSpec, context: LexicalContext) -> SourceNode {
    SourceNode::new_expr(spec, Span::new("src/App.php", 42, 9), context)
}

pub fn analyse(program: &Program) -> AnalysisReport {
    RuleEngine::default().analyse_program(program)
}
