//! Syntax nodes the rules are registered for.
//!
//! The engine never parses source. The host hands over class-declaration and
//! construction-expression nodes, each with the lexical context it appeared in.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ClassName, NAMESPACE_SEPARATOR};

/// Source position of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Span {
    pub file: String,
    /// 1-indexed, 0 when unknown
    pub line: u32,
    /// 1-indexed, 0 when unknown
    pub column: u32,
}

impl Span {
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (0, _) => f.write_str(&self.file),
            (line, 0) => write!(f, "{}:{line}", self.file),
            (line, column) => write!(f, "{}:{line}:{column}", self.file),
        }
    }
}

/// Keywords that refer to a class relative to the enclosing declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeClass {
    SelfClass,
    Static,
    Parent,
}

/// A class name as written in source: fully qualified (`\Acme\Email`),
/// qualified or unqualified (`Types\Email`, `Email`), or relative (`self`,
/// `static`, `parent`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameRef(String);

impl NameRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_fully_qualified(&self) -> bool {
        self.0.starts_with(NAMESPACE_SEPARATOR)
    }

    #[must_use]
    pub fn relative(&self) -> Option<RelativeClass> {
        match self.0.to_ascii_lowercase().as_str() {
            "self" => Some(RelativeClass::SelfClass),
            "static" => Some(RelativeClass::Static),
            "parent" => Some(RelativeClass::Parent),
            _ => None,
        }
    }

    /// First namespace segment and the remainder, e.g. `("Types", Some("Email"))`.
    #[must_use]
    pub fn split_first_segment(&self) -> (&str, Option<&str>) {
        match self.0.split_once(NAMESPACE_SEPARATOR) {
            Some((first, rest)) => (first, Some(rest)),
            None => (self.0.as_str(), None),
        }
    }
}

impl fmt::Display for NameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host-assigned identity of an expression, used to key type-inference answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExprId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExprKind {
    /// `$name`
    Variable { name: String },
    /// `Foo::class`, `self::class`
    ClassConstant { class: NameRef },
    /// `'Acme\Email'`
    StringLiteral { value: String },
    /// Any other dynamically computed expression (calls, property fetches, ...).
    Other {
        #[serde(default)]
        description: String,
    },
}

/// An expression whose static type is answered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expr {
    pub id: ExprId,
    #[serde(flatten)]
    pub kind: ExprKind,
}

impl Expr {
    #[must_use]
    pub fn variable(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: ExprId(id),
            kind: ExprKind::Variable { name: name.into() },
        }
    }

    #[must_use]
    pub fn class_constant(id: u32, class: impl Into<String>) -> Self {
        Self {
            id: ExprId(id),
            kind: ExprKind::ClassConstant {
                class: NameRef::new(class),
            },
        }
    }

    #[must_use]
    pub fn string_literal(id: u32, value: impl Into<String>) -> Self {
        Self {
            id: ExprId(id),
            kind: ExprKind::StringLiteral {
                value: value.into(),
            },
        }
    }

    #[must_use]
    pub fn other(id: u32, description: impl Into<String>) -> Self {
        Self {
            id: ExprId(id),
            kind: ExprKind::Other {
                description: description.into(),
            },
        }
    }
}

/// The class designator of a construction expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassSpec {
    /// `new Foo()`, `new \Acme\Foo()`, `new self()`
    Name(NameRef),
    /// `new $class()`, `new ($factory->name())()`
    Expr(Expr),
}

/// A class-declaration node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassNode {
    pub class: ClassName,
    #[serde(default)]
    pub span: Span,
}

/// An object-construction node: "allocate an instance of `class`".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpr {
    pub class: ClassSpec,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Class,
    New,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => f.write_str("class"),
            Self::New => f.write_str("new"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Class(ClassNode),
    New(NewExpr),
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Class(_) => NodeKind::Class,
            Self::New(_) => NodeKind::New,
        }
    }

    #[must_use]
    pub fn span(&self) -> &Span {
        match self {
            Self::Class(node) => &node.span,
            Self::New(node) => &node.span,
        }
    }
}

/// Name-resolution context at the point where a node appears.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalContext {
    pub namespace: Option<String>,
    /// Import alias -> imported class.
    pub imports: BTreeMap<String, ClassName>,
    /// Enclosing class declaration, if any.
    pub class: Option<ClassName>,
}

impl LexicalContext {
    #[must_use]
    pub fn in_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_import(mut self, alias: impl Into<String>, class: impl Into<ClassName>) -> Self {
        self.imports.insert(alias.into(), class.into());
        self
    }

    #[must_use]
    pub fn inside_class(mut self, class: impl Into<ClassName>) -> Self {
        self.class = Some(class.into());
        self
    }
}

/// A node together with the lexical context it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceNode {
    pub node: Node,
    #[serde(default)]
    pub context: LexicalContext,
}

impl SourceNode {
    #[must_use]
    pub fn class(class: impl Into<ClassName>, span: Span) -> Self {
        let class = class.into();
        Self {
            context: LexicalContext {
                namespace: class.namespace().map(str::to_owned),
                class: Some(class.clone()),
                ..LexicalContext::default()
            },
            node: Node::Class(ClassNode { class, span }),
        }
    }

    #[must_use]
    pub fn new_expr(class: ClassSpec, span: Span, context: LexicalContext) -> Self {
        Self {
            node: Node::New(NewExpr { class, span }),
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_names_are_case_insensitive() {
        assert_eq!(NameRef::new("SELF").relative(), Some(RelativeClass::SelfClass));
        assert_eq!(NameRef::new("static").relative(), Some(RelativeClass::Static));
        assert_eq!(NameRef::new("Parent").relative(), Some(RelativeClass::Parent));
        assert_eq!(NameRef::new("Selfish").relative(), None);
    }

    #[test]
    fn split_first_segment() {
        assert_eq!(
            NameRef::new("Types\\Email").split_first_segment(),
            ("Types", Some("Email"))
        );
        assert_eq!(NameRef::new("Email").split_first_segment(), ("Email", None));
    }

    #[test]
    fn span_display_omits_unknown_parts() {
        assert_eq!(Span::new("a.php", 3, 7).to_string(), "a.php:3:7");
        assert_eq!(Span::new("a.php", 3, 0).to_string(), "a.php:3");
        assert_eq!(Span::new("a.php", 0, 0).to_string(), "a.php");
    }

    #[test]
    fn new_expr_node_deserializes() {
        let node: SourceNode = serde_json::from_value(serde_json::json!({
            "node": {
                "kind": "new",
                "class": { "expr": { "id": 4, "kind": "variable", "name": "cls" } },
                "span": { "file": "src/a.php", "line": 12, "column": 9 }
            },
            "context": { "namespace": "Acme", "imports": { "Email": "Acme\\Types\\Email" } }
        }))
        .unwrap();

        assert_eq!(node.node.kind(), NodeKind::New);
        assert_eq!(node.node.span().line, 12);
        let Node::New(expr) = &node.node else {
            panic!("expected a construction node");
        };
        assert_eq!(expr.class, ClassSpec::Expr(Expr::variable(4, "cls")));
        assert_eq!(
            node.context.imports.get("Email"),
            Some(&ClassName::new("Acme\\Types\\Email"))
        );
    }
}
