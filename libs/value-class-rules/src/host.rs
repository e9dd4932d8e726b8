//! Query surface the engine needs from the host analysis runtime.
//!
//! The host owns parsing, the symbol table and type inference. Rules only see
//! these traits, so any tree visitor can drive them.

use crate::error::InstantiationError;
use crate::model::{AttributeRef, ClassDeclaration, ClassName};
use crate::node::{Expr, NameRef, SourceNode};
use crate::types::Type;

/// Name resolution and type inference at one point of the program.
pub trait Scope {
    /// Resolves a class name as written in source to a fully-qualified name.
    fn resolve_name(&self, name: &NameRef) -> ClassName;

    /// Static type of `expr`; [`Type::Mixed`] when nothing is known.
    fn type_of(&self, expr: &Expr) -> Type;
}

/// Class reflection backed by the host's symbol table.
pub trait ReflectionProvider {
    fn class(&self, name: &ClassName) -> Option<&ClassDeclaration>;

    fn has_class(&self, name: &ClassName) -> bool {
        self.class(name).is_some()
    }

    /// Whether `class` extends or implements `ancestor`, directly or
    /// transitively, judged from declarations alone. A class is not a
    /// subclass of itself.
    fn is_subclass_of(&self, class: &ClassName, ancestor: &ClassName) -> bool;

    /// Creates an instance of the attribute to inspect its runtime type.
    ///
    /// Implementations report every failure through the returned error and
    /// must not panic. The marker resolver survives a panic, but the process
    /// panic hook still runs and prints the message to stderr before the
    /// failure is recovered.
    ///
    /// # Errors
    ///
    /// Returns an [`InstantiationError`] when the attribute class is unknown,
    /// cannot be loaded, or its construction fails
    /// ([`InstantiationError::ConstructorFailed`]).
    fn instantiate_attribute(
        &self,
        attribute: &AttributeRef,
    ) -> Result<AttributeInstance, InstantiationError>;
}

/// A host driving the engine: reflection plus a scope for every node.
pub trait Host: ReflectionProvider {
    fn scope_at<'a>(&'a self, node: &'a SourceNode) -> Box<dyn Scope + 'a>;
}

/// Runtime view of an instantiated attribute: its class and every type it is
/// an instance of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInstance {
    class: ClassName,
    runtime_types: Vec<ClassName>,
}

impl AttributeInstance {
    #[must_use]
    pub fn new(class: ClassName, runtime_types: Vec<ClassName>) -> Self {
        Self {
            class,
            runtime_types,
        }
    }

    #[must_use]
    pub fn class(&self) -> &ClassName {
        &self.class
    }

    #[must_use]
    pub fn is_instance_of(&self, ty: &ClassName) -> bool {
        self.class == *ty || self.runtime_types.contains(ty)
    }
}
