//! Construction-site class resolution.
//!
//! Works out which classes an object-construction expression may instantiate.
//! A literal class name resolves to exactly one class. Any other designator is
//! typed by the host, and every class the type can stand for becomes a
//! candidate: constant strings naming known classes, then object types. Union
//! types yield all their members, so a guard built on top never misses a
//! restricted class.

use serde::Serialize;

use crate::host::{ReflectionProvider, Scope};
use crate::model::ClassName;
use crate::node::{ClassSpec, NewExpr};
use crate::types::Type;

/// Candidate classes in discovery order. May contain duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CandidateClassSet(Vec<ClassName>);

impl CandidateClassSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClassName> {
        self.0.iter()
    }
}

impl From<Vec<ClassName>> for CandidateClassSet {
    fn from(names: Vec<ClassName>) -> Self {
        Self(names)
    }
}

impl IntoIterator for CandidateClassSet {
    type Item = ClassName;
    type IntoIter = std::vec::IntoIter<ClassName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CandidateClassSet {
    type Item = &'a ClassName;
    type IntoIter = std::slice::Iter<'a, ClassName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Candidate classes for a construction expression.
#[must_use]
pub fn resolve_candidates(
    expr: &NewExpr,
    scope: &dyn Scope,
    reflection: &dyn ReflectionProvider,
) -> CandidateClassSet {
    match &expr.class {
        ClassSpec::Name(name) => CandidateClassSet(vec![scope.resolve_name(name)]),
        ClassSpec::Expr(designator) => {
            let ty = scope.type_of(designator);
            let candidates = candidates_from_type(&ty, reflection);
            tracing::trace!(
                expr = designator.id.0,
                ty = %ty,
                candidates = candidates.len(),
                "resolved dynamic class designator"
            );
            candidates
        }
    }
}

/// Candidate classes carried by an inferred designator type.
#[must_use]
pub fn candidates_from_type(ty: &Type, reflection: &dyn ReflectionProvider) -> CandidateClassSet {
    let mut names = Vec::new();

    for value in ty.constant_strings() {
        let class = ClassName::new(value);
        if reflection.has_class(&class) {
            names.push(class);
        } else {
            tracing::debug!(value, "constant string does not name a known class");
        }
    }

    names.extend(ty.object_class_names().into_iter().cloned());

    CandidateClassSet(names)
}
