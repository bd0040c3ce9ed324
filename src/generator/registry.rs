//! Type-node arena and breadth-first graph discovery.
//!
//! Every discovered type is interned here exactly once, keyed by qualified
//! name. Cross-references between nodes are stored as qualified-name keys,
//! never owned pointers, so cyclic graphs need no special handling beyond a
//! membership check: a name already in the registry is never parsed again.

use std::collections::HashMap;

use tracing::warn;

use super::parse;
use crate::config::GeneratorConfig;
use crate::model::UniverseIndex;

/// One discovered source type.
///
/// Mutated exactly twice after registration — once when its structure
/// (generic parameters and supertypes) is parsed, once when its properties
/// are — and both happen before any rendering starts.
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub qualified_name: String,
    pub simple_name: String,
    pub package: String,
    /// Whether an output file is produced for this type. False for types
    /// in the ignore set, types that failed to load, and types first seen
    /// as property references.
    pub emittable: bool,
    pub is_enum: bool,
    pub enum_constants: Vec<String>,
    pub generic_params: Vec<GenericParam>,
    pub supertypes: Vec<TypeRef>,
    pub properties: Vec<PropertyRef>,
    structurally_parsed: bool,
}

impl TypeNode {
    fn new(qualified_name: &str, emittable: bool, config: &GeneratorConfig) -> Self {
        let simple_name = qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(qualified_name)
            .to_string();
        let package = match qualified_name.rfind('.') {
            Some(idx) => qualified_name[..idx].to_string(),
            None => String::new(),
        };
        Self {
            qualified_name: qualified_name.to_string(),
            simple_name,
            package,
            emittable: emittable && !config.ignore_classes.contains(qualified_name),
            is_enum: false,
            enum_constants: Vec::new(),
            generic_params: Vec::new(),
            supertypes: Vec::new(),
            properties: Vec::new(),
            structurally_parsed: false,
        }
    }
}

/// A generic parameter with its resolved bounds.
#[derive(Debug, Clone)]
pub struct GenericParam {
    pub name: String,
    pub bounds: Vec<Classifier>,
}

/// A type usage in a signature position.
#[derive(Debug, Clone)]
pub struct TypeRef {
    pub nullable: bool,
    pub classifier: Classifier,
    pub arguments: Vec<TypeRef>,
}

/// The identity portion of a type usage.
#[derive(Debug, Clone)]
pub enum Classifier {
    /// A registered type, by qualified name. `wrapped` is set for
    /// meta-reflective type-of-type forms and is what renders when present.
    Concrete {
        qualified_name: String,
        wrapped: Option<Box<Classifier>>,
    },
    /// A generic parameter of the enclosing declaration.
    Parameter { name: String },
    /// No resolvable identity; renders as the `any` fallback.
    Unknown,
}

/// A property with its resolved type.
#[derive(Debug, Clone)]
pub struct PropertyRef {
    pub name: String,
    pub ty: TypeRef,
}

/// Run-scoped arena of discovered types.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    nodes: HashMap<String, TypeNode>,
}

impl TypeRegistry {
    pub fn get(&self, qualified_name: &str) -> Option<&TypeNode> {
        self.nodes.get(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Emittable nodes in qualified-name order, for deterministic emission.
    pub fn emittable_nodes_sorted(&self) -> Vec<&TypeNode> {
        let mut nodes: Vec<&TypeNode> = self.nodes.values().filter(|n| n.emittable).collect();
        nodes.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
        nodes
    }

    /// Register `qualified_name` if unseen. Returns true when a node was
    /// created; an existing node is left untouched, whatever its flags.
    pub(crate) fn ensure(
        &mut self,
        qualified_name: &str,
        emittable: bool,
        config: &GeneratorConfig,
    ) -> bool {
        if self.nodes.contains_key(qualified_name) {
            return false;
        }
        self.nodes.insert(
            qualified_name.to_string(),
            TypeNode::new(qualified_name, emittable, config),
        );
        true
    }

    fn is_structurally_parsed(&self, qualified_name: &str) -> bool {
        self.nodes
            .get(qualified_name)
            .is_some_and(|node| node.structurally_parsed)
    }

    fn apply_structure(&mut self, qualified_name: &str, structure: parse::ParsedStructure) {
        if let Some(node) = self.nodes.get_mut(qualified_name) {
            node.is_enum = structure.is_enum;
            node.enum_constants = structure.enum_constants;
            node.generic_params = structure.generic_params;
            node.supertypes = structure.supertypes;
            node.structurally_parsed = true;
        }
    }

    fn mark_unloadable(&mut self, qualified_name: &str) {
        if let Some(node) = self.nodes.get_mut(qualified_name) {
            node.emittable = false;
            node.structurally_parsed = true;
        }
    }

    fn set_properties(&mut self, qualified_name: &str, properties: Vec<PropertyRef>) {
        if let Some(node) = self.nodes.get_mut(qualified_name) {
            node.properties = properties;
        }
    }
}

/// Breadth-first discovery in two ordered phases: structure (generic
/// parameter bounds and supertypes) to a fixed point, then properties over
/// the settled registry.
///
/// The deferral is what makes mutually-referencing property types safe: by
/// the time properties are parsed, every structurally reachable type is
/// already a registry member, so a reference resolves to an existing node
/// instead of triggering re-entrant parsing.
pub fn discover(
    universe: &UniverseIndex<'_>,
    roots: &[String],
    config: &GeneratorConfig,
) -> TypeRegistry {
    let mut registry = TypeRegistry::default();
    let mut batch: Vec<String> = Vec::new();

    for root in roots {
        if root.is_empty() {
            warn!("skipping a requested type with no stable qualified name");
            continue;
        }
        if registry.ensure(root, true, config) {
            batch.push(root.clone());
        }
    }

    // Phase one: structure, to a fixed point.
    while !batch.is_empty() {
        let mut next: Vec<String> = Vec::new();
        for qualified_name in batch {
            if registry.is_structurally_parsed(&qualified_name) {
                continue;
            }
            match universe.get(&qualified_name) {
                Some(handle) => {
                    let structure = parse::parse_structure(handle, &mut registry, config, &mut next);
                    registry.apply_structure(&qualified_name, structure);
                }
                None => {
                    warn!(
                        type_name = %qualified_name,
                        "type has no handle in the exported universe; skipping"
                    );
                    registry.mark_unloadable(&qualified_name);
                }
            }
        }
        batch = next;
    }

    // Phase two: properties, over a sorted snapshot. Types first seen here
    // are registered reference-only and never structurally parsed.
    let mut names: Vec<String> = registry.nodes.keys().cloned().collect();
    names.sort();
    for qualified_name in &names {
        let Some(handle) = universe.get(qualified_name) else {
            continue;
        };
        let properties = parse::parse_properties(handle, &mut registry, config);
        registry.set_properties(qualified_name, properties);
    }

    registry
}
