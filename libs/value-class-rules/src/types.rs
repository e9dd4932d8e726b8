//! Static types returned by the host's type-inference oracle.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::ClassName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Int,
    Float,
    Bool,
    String,
    Null,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

/// Inferred type of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Type {
    /// Nothing is known about the value.
    #[default]
    Mixed,
    /// A scalar whose value is not known at compile time.
    Scalar { scalar: ScalarKind },
    /// A string whose value is known at compile time.
    ConstantString { value: String },
    /// An instance of the named class.
    Object { class: ClassName },
    /// One of several types.
    Union { types: Vec<Type> },
}

impl Type {
    #[must_use]
    pub fn constant_string(value: impl Into<String>) -> Self {
        Self::ConstantString {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn object(class: impl Into<ClassName>) -> Self {
        Self::Object {
            class: class.into(),
        }
    }

    #[must_use]
    pub fn scalar(scalar: ScalarKind) -> Self {
        Self::Scalar { scalar }
    }

    /// Builds a union, flattening nested unions. A single member collapses to itself.
    #[must_use]
    pub fn union(types: impl IntoIterator<Item = Type>) -> Self {
        let mut members = Vec::new();
        for ty in types {
            match ty {
                Self::Union { types } => members.extend(types),
                other => members.push(other),
            }
        }
        if members.len() == 1
            && let Some(single) = members.pop()
        {
            return single;
        }
        Self::Union { types: members }
    }

    /// Compile-time constant string values carried by this type, in member order.
    #[must_use]
    pub fn constant_strings(&self) -> Vec<&str> {
        let mut values = Vec::new();
        self.walk(&mut |ty| {
            if let Self::ConstantString { value } = ty {
                values.push(value.as_str());
            }
        });
        values
    }

    /// Class names of the object types carried by this type, in member order.
    #[must_use]
    pub fn object_class_names(&self) -> Vec<&ClassName> {
        let mut names = Vec::new();
        self.walk(&mut |ty| {
            if let Self::Object { class } = ty {
                names.push(class);
            }
        });
        names
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        match self {
            Self::Union { types } => {
                for member in types {
                    member.walk(visit);
                }
            }
            other => visit(other),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mixed => f.write_str("mixed"),
            Self::Scalar { scalar } => write!(f, "{scalar}"),
            Self::ConstantString { value } => write!(f, "'{value}'"),
            Self::Object { class } => write!(f, "{class}"),
            Self::Union { types } => {
                for (idx, member) in types.iter().enumerate() {
                    if idx > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
        }
    }
}
