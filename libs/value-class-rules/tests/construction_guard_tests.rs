#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Direct construction of marked classes.

mod common;

use common::{FLOAT_BASED, GEO_BASED, STRING_BASED, analyse, compliant, new_node, taxonomy};
use value_class_rules::model::ClassDeclaration;
use value_class_rules::node::{ClassSpec, Expr, LexicalContext, NameRef};
use value_class_rules::types::{ScalarKind, Type};
use value_class_rules::{LintConfig, Program, RuleEngine};

fn fixture() -> Program {
    taxonomy()
        .with_class(compliant("Acme\\Email", STRING_BASED))
        .with_class(compliant("Acme\\Ratio", FLOAT_BASED))
        .with_class(compliant("Acme\\Location", GEO_BASED))
        .with_class(ClassDeclaration::new("Acme\\Mailer"))
}

fn acme() -> LexicalContext {
    LexicalContext::in_namespace("Acme")
}

#[test]
fn literal_construction_of_marked_class_is_reported_once() {
    let program = fixture().with_node(new_node(ClassSpec::Name(NameRef::new("Email")), acme()));

    let report = analyse(&program);

    assert_eq!(report.constructions_checked, 1);
    assert_eq!(report.violations.len(), 1);
    let violation = &report.violations[0];
    assert_eq!(violation.identifier, "typedClass.construction");
    assert_eq!(violation.subject.as_str(), "Acme\\Email");
    assert_eq!(
        violation.message,
        "Instantiation of class Acme\\Email is forbidden because it is marked with #[StringBased]. \
         Use `Wwwision\\Types\\instantiate(Acme\\Email::class, $value)` instead."
    );
    assert_eq!(violation.format_human_readable().split(':').next(), Some("src/App.php"));
}

#[test]
fn unmarked_and_unknown_classes_may_be_constructed() {
    let program = fixture()
        .with_node(new_node(ClassSpec::Name(NameRef::new("Mailer")), acme()))
        .with_node(new_node(ClassSpec::Name(NameRef::new("\\DateTimeImmutable")), acme()));

    let report = analyse(&program);

    assert_eq!(report.constructions_checked, 2);
    assert!(report.is_clean());
}

#[test]
fn imported_alias_is_resolved_before_checking() {
    let context =
        LexicalContext::in_namespace("App\\Controller").with_import("Mail", "Acme\\Email");
    let program = fixture().with_node(new_node(ClassSpec::Name(NameRef::new("Mail")), context));

    let report = analyse(&program);

    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].subject.as_str(), "Acme\\Email");
}

#[test]
fn variable_holding_a_constant_class_string_is_reported() {
    let program = fixture()
        .with_node(new_node(ClassSpec::Expr(Expr::variable(1, "cls")), acme()))
        .with_expression_type(1, Type::constant_string("Acme\\Ratio"));

    let report = analyse(&program);

    assert_eq!(report.violations.len(), 1);
    assert!(report.violations[0].message.contains("#[FloatBased]"));
}

#[test]
fn variable_of_unknown_type_is_not_reported() {
    let program = fixture()
        .with_node(new_node(ClassSpec::Expr(Expr::variable(1, "cls")), acme()))
        .with_node(new_node(ClassSpec::Expr(Expr::variable(2, "name")), acme()))
        .with_node(new_node(ClassSpec::Expr(Expr::variable(3, "other")), acme()))
        .with_expression_type(2, Type::scalar(ScalarKind::String))
        .with_expression_type(3, Type::constant_string("not a class"));

    let report = analyse(&program);

    assert_eq!(report.constructions_checked, 3);
    assert!(report.is_clean(), "unexpected violations: {:?}", report.violations);
}

#[test]
fn union_with_one_marked_member_is_reported_once() {
    let program = fixture()
        .with_node(new_node(ClassSpec::Expr(Expr::variable(7, "service")), acme()))
        .with_expression_type(
            7,
            Type::union([Type::object("Acme\\Email"), Type::object("Acme\\Mailer")]),
        );

    let report = analyse(&program);

    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].subject.as_str(), "Acme\\Email");
}

#[test]
fn union_of_two_marked_classes_names_the_first() {
    let program = fixture()
        .with_node(new_node(ClassSpec::Expr(Expr::variable(7, "value")), acme()))
        .with_expression_type(
            7,
            Type::union([Type::object("Acme\\Ratio"), Type::object("Acme\\Email")]),
        );

    let report = analyse(&program);

    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].subject.as_str(), "Acme\\Ratio");
}

#[test]
fn unloadable_marker_still_guards_construction() {
    let program = fixture().with_node(new_node(ClassSpec::Name(NameRef::new("Location")), acme()));

    let report = analyse(&program);

    assert_eq!(report.violations.len(), 1);
    assert!(report.violations[0].message.contains("#[CoordinateBased]"));
}

#[test]
fn configured_factory_function_is_suggested() {
    let config = LintConfig {
        factory_function: "Acme\\Types\\make".to_owned(),
        ..LintConfig::default()
    };
    let program = fixture().with_node(new_node(ClassSpec::Name(NameRef::new("Email")), acme()));

    let report = RuleEngine::from_config(&config)
        .unwrap()
        .analyse_program(&program);

    assert_eq!(report.violations.len(), 1);
    assert!(
        report.violations[0]
            .message
            .ends_with("Use `Acme\\Types\\make(Acme\\Email::class, $value)` instead.")
    );
}

#[test]
fn class_names_are_matched_regardless_of_case() {
    let context = LexicalContext::in_namespace("App").with_import("MAIL", "acme\\email");
    let program = fixture()
        .with_node(new_node(ClassSpec::Name(NameRef::new("email")), acme()))
        .with_node(new_node(ClassSpec::Name(NameRef::new("\\ACME\\RATIO")), acme()))
        .with_node(new_node(ClassSpec::Name(NameRef::new("mail")), context))
        .with_node(new_node(ClassSpec::Expr(Expr::variable(4, "cls")), acme()))
        .with_expression_type(4, Type::constant_string("acme\\location"));

    let report = analyse(&program);

    let subjects: Vec<_> = report.violations.iter().map(|v| v.subject.as_str()).collect();
    assert_eq!(
        subjects,
        vec!["Acme\\Email", "Acme\\Ratio", "Acme\\Email", "Acme\\Location"]
    );
    assert!(
        report.violations[0]
            .message
            .starts_with("Instantiation of class Acme\\Email is forbidden")
    );
}
