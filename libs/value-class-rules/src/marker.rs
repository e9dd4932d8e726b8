//! Marker attribute resolution.
//!
//! A class is *marked* when one of its attributes is a marker: an attribute
//! whose runtime instance implements the marker interface. Attribute classes
//! may depend on code that is unavailable to the analysis, so every attribute
//! is probed in two steps:
//!
//! 1. instantiate it and test the instance against the marker interface;
//! 2. if instantiation fails for any reason, fall back to the declared
//!    supertypes in the symbol table.
//!
//! The first matching attribute in source order wins.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;

use crate::error::InstantiationError;
use crate::host::ReflectionProvider;
use crate::model::{AttributeRef, ClassDeclaration, ClassName};

/// Interface shared by all marker attributes unless configured otherwise.
pub const DEFAULT_MARKER_INTERFACE: &str = "Wwwision\\Types\\Attributes\\TypeBased";

/// The attribute that made a class subject to the value-class invariants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MarkerMatch {
    pub attribute: ClassName,
}

impl MarkerMatch {
    /// Attribute name as shown in messages, e.g. `StringBased`.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.attribute.short_name()
    }
}

/// Outcome of probing a single attribute entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeProbe {
    /// The attribute is a marker.
    Matched(ClassName),
    /// The attribute was instantiated and is not a marker.
    NotMatched,
    /// The attribute could not be instantiated and its declaration does not
    /// show it to be a marker.
    Unresolvable,
}

/// Decides whether a class carries a marker attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerResolver {
    marker_interface: ClassName,
}

impl Default for MarkerResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_INTERFACE)
    }
}

impl MarkerResolver {
    #[must_use]
    pub fn new(marker_interface: impl Into<ClassName>) -> Self {
        Self {
            marker_interface: marker_interface.into(),
        }
    }

    #[must_use]
    pub fn marker_interface(&self) -> &ClassName {
        &self.marker_interface
    }

    /// First marker attribute of `class` in source order, if any.
    ///
    /// Attributes after the first match are not probed.
    #[must_use]
    pub fn resolve(
        &self,
        class: &ClassDeclaration,
        reflection: &dyn ReflectionProvider,
    ) -> Option<MarkerMatch> {
        class
            .attributes
            .iter()
            .find_map(|attribute| self.matched(attribute, reflection))
    }

    /// Every marker attribute of `class`, in source order.
    #[must_use]
    pub fn resolve_all(
        &self,
        class: &ClassDeclaration,
        reflection: &dyn ReflectionProvider,
    ) -> Vec<MarkerMatch> {
        class
            .attributes
            .iter()
            .filter_map(|attribute| self.matched(attribute, reflection))
            .collect()
    }

    #[must_use]
    pub fn is_marked(&self, class: &ClassDeclaration, reflection: &dyn ReflectionProvider) -> bool {
        self.resolve(class, reflection).is_some()
    }

    /// Probes a single attribute entry: instantiate and check first, static
    /// subtype check when instantiation fails.
    #[must_use]
    pub fn probe(
        &self,
        attribute: &AttributeRef,
        reflection: &dyn ReflectionProvider,
    ) -> AttributeProbe {
        match self.try_instantiate_and_check(attribute, reflection) {
            Ok(true) => AttributeProbe::Matched(attribute.class.clone()),
            Ok(false) => AttributeProbe::NotMatched,
            Err(err) => {
                tracing::debug!(
                    attribute = %attribute.class,
                    error = %err,
                    "attribute instantiation failed; checking declared supertypes"
                );
                if self.static_subtype_check(attribute, reflection) {
                    AttributeProbe::Matched(attribute.class.clone())
                } else {
                    AttributeProbe::Unresolvable
                }
            }
        }
    }

    fn matched(
        &self,
        attribute: &AttributeRef,
        reflection: &dyn ReflectionProvider,
    ) -> Option<MarkerMatch> {
        match self.probe(attribute, reflection) {
            // Report the attribute with its declared spelling.
            AttributeProbe::Matched(attribute) => Some(MarkerMatch {
                attribute: reflection
                    .class(&attribute)
                    .map_or(attribute, |decl| decl.name.clone()),
            }),
            AttributeProbe::NotMatched | AttributeProbe::Unresolvable => None,
        }
    }

    /// Instantiates the attribute in a sandbox. A panic inside the host is
    /// contained and reported as [`InstantiationError::Panicked`].
    fn try_instantiate_and_check(
        &self,
        attribute: &AttributeRef,
        reflection: &dyn ReflectionProvider,
    ) -> Result<bool, InstantiationError> {
        let instance = panic::catch_unwind(AssertUnwindSafe(|| {
            reflection.instantiate_attribute(attribute)
        }))
        .map_err(|payload| InstantiationError::Panicked {
            class: attribute.class.clone(),
            message: panic_message(payload.as_ref()),
        })??;

        Ok(instance.is_instance_of(&self.marker_interface))
    }

    fn static_subtype_check(
        &self,
        attribute: &AttributeRef,
        reflection: &dyn ReflectionProvider,
    ) -> bool {
        reflection.is_subclass_of(&attribute.class, &self.marker_interface)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
