//! Class declarations as seen through the host's reflection subsystem.
//!
//! These types are read-only snapshots: the rule engine never builds them from
//! source, it only receives them from a [`ReflectionProvider`](crate::host::ReflectionProvider).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Separator between namespace segments of a fully-qualified class name.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Fully-qualified class name, stored without a leading namespace separator.
///
/// Class names are case-insensitive: equality, hashing and ordering ignore
/// ASCII case, while the spelling given at construction is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ClassName(String);

impl ClassName {
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(
            name.as_ref()
                .trim_start_matches(NAMESPACE_SEPARATOR)
                .to_owned(),
        )
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last namespace segment, e.g. `StringBased` for `Acme\Attributes\StringBased`.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.0
            .rsplit(NAMESPACE_SEPARATOR)
            .next()
            .unwrap_or(self.0.as_str())
    }

    /// Namespace part of the name, `None` for classes in the global namespace.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.0
            .rfind(NAMESPACE_SEPARATOR)
            .map(|idx| &self.0[..idx])
    }
}

impl PartialEq for ClassName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for ClassName {}

impl Hash for ClassName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl PartialOrd for ClassName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClassName {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.0.bytes().map(|b| b.to_ascii_lowercase());
        let rhs = other.0.bytes().map(|b| b.to_ascii_lowercase());
        lhs.cmp(rhs)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ClassName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for ClassName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<ClassName> for String {
    fn from(value: ClassName) -> Self {
        value.0
    }
}

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class-level modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    #[serde(rename = "final")]
    pub is_final: bool,
    /// Immutable class: no property may be reassigned after construction.
    #[serde(rename = "readonly")]
    pub is_readonly: bool,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
}

/// Explicitly declared constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Constructor {
    #[serde(default)]
    pub visibility: Visibility,
}

/// An attribute instance attached to a declaration, as written in source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRef {
    pub class: ClassName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<serde_json::Value>,
}

impl AttributeRef {
    #[must_use]
    pub fn new(class: impl Into<ClassName>) -> Self {
        Self {
            class: class.into(),
            arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_argument(mut self, argument: serde_json::Value) -> Self {
        self.arguments.push(argument);
        self
    }
}

/// Reflection view of a single class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDeclaration {
    pub name: ClassName,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Attributes in source order.
    #[serde(default)]
    pub attributes: Vec<AttributeRef>,
    #[serde(default)]
    pub constructor: Option<Constructor>,
    /// Error raised by the constructor when the host instantiates the class,
    /// e.g. an attribute rejecting its arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construction_error: Option<String>,
    #[serde(default)]
    pub parent: Option<ClassName>,
    #[serde(default)]
    pub interfaces: Vec<ClassName>,
    /// `false` when the class depends on code that is unavailable to the
    /// analysis (missing optional dependency). Such classes are still known to
    /// the symbol table but cannot be instantiated.
    #[serde(default = "default_loadable")]
    pub loadable: bool,
}

fn default_loadable() -> bool {
    true
}

impl ClassDeclaration {
    #[must_use]
    pub fn new(name: impl Into<ClassName>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            modifiers: Modifiers::default(),
            attributes: Vec::new(),
            constructor: None,
            construction_error: None,
            parent: None,
            interfaces: Vec::new(),
            loadable: true,
        }
    }

    #[must_use]
    pub fn interface(name: impl Into<ClassName>) -> Self {
        Self {
            kind: ClassKind::Interface,
            ..Self::new(name)
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeRef) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn with_final(mut self) -> Self {
        self.modifiers.is_final = true;
        self
    }

    #[must_use]
    pub fn with_readonly(mut self) -> Self {
        self.modifiers.is_readonly = true;
        self
    }

    #[must_use]
    pub fn with_abstract(mut self) -> Self {
        self.modifiers.is_abstract = true;
        self
    }

    /// Declares a constructor with the given visibility.
    #[must_use]
    pub fn with_constructor(mut self, visibility: Visibility) -> Self {
        self.constructor = Some(Constructor { visibility });
        self
    }

    /// Makes instantiation through the host fail inside the constructor.
    #[must_use]
    pub fn with_failing_constructor(mut self, reason: impl Into<String>) -> Self {
        self.construction_error = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<ClassName>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    #[must_use]
    pub fn with_interface(mut self, interface: impl Into<ClassName>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Marks the class as known but not loadable.
    #[must_use]
    pub fn unloadable(mut self) -> Self {
        self.loadable = false;
        self
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        self.modifiers.is_final
    }

    #[must_use]
    pub fn is_readonly(&self) -> bool {
        self.modifiers.is_readonly
    }

    #[must_use]
    pub fn is_instantiable(&self) -> bool {
        self.kind == ClassKind::Class && !self.modifiers.is_abstract
    }

    /// Direct supertypes: the parent class first, then interfaces in declaration order.
    pub fn supertypes(&self) -> impl Iterator<Item = &ClassName> {
        self.parent.iter().chain(self.interfaces.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_name_strips_leading_separator() {
        let name = ClassName::new("\\Acme\\Types\\Email");
        assert_eq!(name.as_str(), "Acme\\Types\\Email");
        assert_eq!(name.short_name(), "Email");
        assert_eq!(name.namespace(), Some("Acme\\Types"));
    }

    #[test]
    fn class_name_in_global_namespace() {
        let name = ClassName::new("Email");
        assert_eq!(name.short_name(), "Email");
        assert_eq!(name.namespace(), None);
    }

    #[test]
    fn class_names_compare_case_insensitively() {
        use std::collections::HashSet;

        let declared = ClassName::new("Acme\\Email");
        let written = ClassName::new("\\acme\\EMAIL");
        assert_eq!(declared, written);
        assert_eq!(declared.cmp(&written), Ordering::Equal);
        assert!(HashSet::from([declared.clone()]).contains(&written));
        assert_eq!(written.to_string(), "acme\\EMAIL");
        assert_ne!(declared, ClassName::new("Acme\\Emails"));
        assert!(ClassName::new("acme\\a") < ClassName::new("Acme\\B"));
    }

    #[test]
    fn declaration_deserializes_with_defaults() {
        let decl: ClassDeclaration = serde_json::from_value(serde_json::json!({
            "name": "\\Acme\\Email",
            "modifiers": { "final": true },
            "constructor": { "visibility": "protected" },
            "attributes": [{ "class": "Acme\\Attributes\\StringBased" }]
        }))
        .unwrap();

        assert_eq!(decl.name, ClassName::new("Acme\\Email"));
        assert!(decl.is_final());
        assert!(!decl.is_readonly());
        assert!(decl.loadable);
        assert_eq!(decl.kind, ClassKind::Class);
        assert_eq!(
            decl.constructor.map(|c| c.visibility),
            Some(Visibility::Protected)
        );
        assert_eq!(decl.attributes[0].class.short_name(), "StringBased");
    }

    #[test]
    fn supertypes_list_parent_before_interfaces() {
        let decl = ClassDeclaration::new("A")
            .with_interface("I")
            .with_parent("P")
            .with_interface("J");
        let supertypes: Vec<_> = decl.supertypes().map(ClassName::as_str).collect();
        assert_eq!(supertypes, vec!["P", "I", "J"]);
    }
}
