//! In-memory host built from a program snapshot.
//!
//! A snapshot is the serialized output of a front end: every class the symbol
//! table knows, the nodes to check, and the inferred types of dynamic class
//! designators. It can be read from JSON or YAML.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InstantiationError, ProgramError};
use crate::host::{AttributeInstance, Host, ReflectionProvider, Scope};
use crate::model::{AttributeRef, ClassDeclaration, ClassName};
use crate::node::{Expr, ExprId, ExprKind, LexicalContext, NameRef, RelativeClass, SourceNode};
use crate::types::Type;

/// Serialized form of a [`Program`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramSnapshot {
    pub classes: Vec<ClassDeclaration>,
    pub nodes: Vec<SourceNode>,
    pub expression_types: BTreeMap<ExprId, Type>,
}

/// A fully loaded program: symbol table, nodes and inferred expression types.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "ProgramSnapshot")]
pub struct Program {
    classes: Vec<ClassDeclaration>,
    index: HashMap<ClassName, usize>,
    nodes: Vec<SourceNode>,
    expression_types: BTreeMap<ExprId, Type>,
}

impl TryFrom<ProgramSnapshot> for Program {
    type Error = ProgramError;

    fn try_from(snapshot: ProgramSnapshot) -> Result<Self, Self::Error> {
        let mut index = HashMap::with_capacity(snapshot.classes.len());
        for (position, class) in snapshot.classes.iter().enumerate() {
            if index.insert(class.name.clone(), position).is_some() {
                return Err(ProgramError::DuplicateClass {
                    class: class.name.clone(),
                });
            }
        }
        Ok(Self {
            classes: snapshot.classes,
            index,
            nodes: snapshot.nodes,
            expression_types: snapshot.expression_types,
        })
    }
}

impl Program {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot, choosing the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramError`] if the file cannot be read, has an unsupported
    /// extension, or is not a valid snapshot.
    pub fn load(path: &Path) -> Result<Self, ProgramError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());

        let parse: fn(&str, &Path) -> Result<Self, ProgramError> = match extension.as_deref() {
            Some("json") => Self::from_json_str,
            Some("yaml" | "yml") => Self::from_yaml_str,
            _ => {
                return Err(ProgramError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };

        let content = fs::read_to_string(path).map_err(|source| ProgramError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let program = parse(&content, path)?;
        tracing::debug!(
            path = %path.display(),
            classes = program.classes.len(),
            nodes = program.nodes.len(),
            "loaded program snapshot"
        );
        Ok(program)
    }

    /// # Errors
    ///
    /// Returns [`ProgramError::Json`] if `content` is not a valid snapshot.
    pub fn from_json_str(content: &str, path: &Path) -> Result<Self, ProgramError> {
        serde_json::from_str(content).map_err(|source| ProgramError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// # Errors
    ///
    /// Returns [`ProgramError::Yaml`] if `content` is not a valid snapshot.
    pub fn from_yaml_str(content: &str, path: &Path) -> Result<Self, ProgramError> {
        serde_saphyr::from_str(content).map_err(|e| ProgramError::Yaml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Adds a class, replacing an earlier declaration with the same name.
    #[must_use]
    pub fn with_class(mut self, class: ClassDeclaration) -> Self {
        if let Some(&position) = self.index.get(&class.name) {
            self.classes[position] = class;
        } else {
            self.index.insert(class.name.clone(), self.classes.len());
            self.classes.push(class);
        }
        self
    }

    #[must_use]
    pub fn with_node(mut self, node: SourceNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Records the inferred type of an expression.
    #[must_use]
    pub fn with_expression_type(mut self, id: u32, ty: Type) -> Self {
        self.expression_types.insert(ExprId(id), ty);
        self
    }

    #[must_use]
    pub fn classes(&self) -> &[ClassDeclaration] {
        &self.classes
    }

    #[must_use]
    pub fn nodes(&self) -> &[SourceNode] {
        &self.nodes
    }

    /// Transitive supertypes of `class` in breadth-first order, excluding itself.
    /// Names that are referenced but not declared are included; their own
    /// supertypes are unknown.
    #[must_use]
    pub fn ancestors(&self, class: &ClassName) -> Vec<ClassName> {
        let mut seen: HashSet<&ClassName> = HashSet::from([class]);
        let mut queue: VecDeque<&ClassName> = VecDeque::from([class]);
        let mut ancestors = Vec::new();

        while let Some(current) = queue.pop_front() {
            let Some(decl) = self.class(current) else {
                continue;
            };
            for supertype in decl.supertypes() {
                if seen.insert(supertype) {
                    ancestors.push(supertype.clone());
                    queue.push_back(supertype);
                }
            }
        }

        ancestors
    }
}

impl ReflectionProvider for Program {
    fn class(&self, name: &ClassName) -> Option<&ClassDeclaration> {
        self.index.get(name).map(|&position| &self.classes[position])
    }

    fn is_subclass_of(&self, class: &ClassName, ancestor: &ClassName) -> bool {
        self.ancestors(class).contains(ancestor)
    }

    fn instantiate_attribute(
        &self,
        attribute: &AttributeRef,
    ) -> Result<AttributeInstance, InstantiationError> {
        let class = &attribute.class;
        let decl = self
            .class(class)
            .ok_or_else(|| InstantiationError::ClassNotFound {
                class: class.clone(),
            })?;

        if !decl.loadable {
            return Err(InstantiationError::Unloadable {
                class: class.clone(),
                reason: "depends on code that is not available to the analysis".to_owned(),
            });
        }

        // Loading a class loads its whole hierarchy.
        let ancestors = self.ancestors(class);
        if let Some(broken) = ancestors
            .iter()
            .find(|name| self.class(name).is_some_and(|d| !d.loadable))
        {
            return Err(InstantiationError::Unloadable {
                class: class.clone(),
                reason: format!("supertype '{broken}' cannot be loaded"),
            });
        }

        if !decl.is_instantiable() {
            return Err(InstantiationError::NotInstantiable {
                class: class.clone(),
            });
        }

        if let Some(reason) = &decl.construction_error {
            return Err(InstantiationError::ConstructorFailed {
                class: class.clone(),
                reason: reason.clone(),
            });
        }

        Ok(AttributeInstance::new(class.clone(), ancestors))
    }
}

impl Host for Program {
    fn scope_at<'a>(&'a self, node: &'a SourceNode) -> Box<dyn Scope + 'a> {
        Box::new(ProgramScope {
            program: self,
            context: &node.context,
        })
    }
}

/// Scope of one node within a [`Program`].
#[derive(Debug, Clone, Copy)]
pub struct ProgramScope<'a> {
    program: &'a Program,
    context: &'a LexicalContext,
}

impl<'a> ProgramScope<'a> {
    #[must_use]
    pub fn new(program: &'a Program, context: &'a LexicalContext) -> Self {
        Self { program, context }
    }

    fn resolve_relative(&self, name: &NameRef, relative: RelativeClass) -> ClassName {
        let enclosing = self.context.class.as_ref();
        let resolved = match relative {
            RelativeClass::SelfClass | RelativeClass::Static => enclosing.cloned(),
            RelativeClass::Parent => enclosing
                .and_then(|class| self.program.class(class))
                .and_then(|decl| decl.parent.clone()),
        };
        resolved.unwrap_or_else(|| ClassName::new(name.as_str()))
    }
}

impl Scope for ProgramScope<'_> {
    fn resolve_name(&self, name: &NameRef) -> ClassName {
        if let Some(relative) = name.relative() {
            return self.resolve_relative(name, relative);
        }
        if name.is_fully_qualified() {
            return ClassName::new(name.as_str());
        }

        let (first, rest) = name.split_first_segment();
        let imported = self
            .context
            .imports
            .iter()
            .find_map(|(alias, class)| alias.eq_ignore_ascii_case(first).then_some(class));
        if let Some(imported) = imported {
            return match rest {
                Some(rest) => ClassName::new(format!("{imported}\\{rest}")),
                None => imported.clone(),
            };
        }

        match self.context.namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => {
                ClassName::new(format!("{namespace}\\{name}"))
            }
            _ => ClassName::new(name.as_str()),
        }
    }

    fn type_of(&self, expr: &Expr) -> Type {
        if let Some(ty) = self.program.expression_types.get(&expr.id) {
            return ty.clone();
        }
        match &expr.kind {
            ExprKind::StringLiteral { value } => Type::constant_string(value.clone()),
            ExprKind::ClassConstant { class } => {
                Type::constant_string(self.resolve_name(class).as_str())
            }
            ExprKind::Variable { .. } | ExprKind::Other { .. } => Type::Mixed,
        }
    }
}
