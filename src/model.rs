//! Source type-model structs for serde deserialization.
//!
//! The type universe is the hand-off from the external class enumerator:
//! every type it materialized, flattened to plain data. The generator never
//! loads classes itself — it only walks this document.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

/// The full set of type handles exported by the enumerator, in export order.
#[derive(Debug, Deserialize)]
pub struct TypeUniverse {
    #[serde(default)]
    pub types: Vec<TypeHandle>,
}

impl TypeUniverse {
    /// Parse a type universe from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// One materialized source type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeHandle {
    pub qualified_name: String,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDecl>,
    #[serde(default)]
    pub supertypes: Vec<SourceType>,
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub is_enum: bool,
    #[serde(default)]
    pub enum_constants: Vec<String>,
}

impl TypeHandle {
    /// Simple name: the segment after the last `.` of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }

    /// Declaring package, empty for an unpackaged type.
    pub fn package(&self) -> &str {
        match self.qualified_name.rfind('.') {
            Some(idx) => &self.qualified_name[..idx],
            None => "",
        }
    }
}

/// A generic parameter declaration with its upper bounds.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeParameterDecl {
    pub name: String,
    #[serde(default)]
    pub bounds: Vec<SourceType>,
}

/// A member property declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDecl {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(rename = "type")]
    pub ty: SourceType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
    Protected,
    Private,
}

/// One type usage in a signature position.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceType {
    #[serde(default)]
    pub nullable: bool,
    pub classifier: SourceClassifier,
    #[serde(default)]
    pub arguments: Vec<SourceType>,
}

/// The identity portion of a type usage.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SourceClassifier {
    /// A named class or interface.
    #[serde(rename_all = "camelCase")]
    Class { qualified_name: String },
    /// A generic parameter of the enclosing declaration.
    TypeParameter { name: String },
    /// A meta-reflective type-of-type form; the classifier is itself a type.
    TypeOf { classifier: Box<SourceClassifier> },
    /// A star projection with no resolvable identity.
    Star,
}

/// Borrowed qualified-name index over a universe, shared by graph discovery
/// and override matching.
#[derive(Debug, Clone)]
pub struct UniverseIndex<'a> {
    by_name: HashMap<&'a str, &'a TypeHandle>,
}

impl<'a> UniverseIndex<'a> {
    /// Index handles by qualified name. On duplicates the first export wins.
    pub fn new(universe: &'a TypeUniverse) -> Self {
        let mut by_name = HashMap::with_capacity(universe.types.len());
        for handle in &universe.types {
            by_name
                .entry(handle.qualified_name.as_str())
                .or_insert(handle);
        }
        Self { by_name }
    }

    pub fn get(&self, qualified_name: &str) -> Option<&'a TypeHandle> {
        self.by_name.get(qualified_name).copied()
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.by_name.contains_key(qualified_name)
    }

    /// Reflexive, transitive assignability test over declared supertypes.
    /// Handles outside the universe contribute no supertype edges.
    pub fn is_assignable_to(&self, qualified_name: &str, base: &str) -> bool {
        if qualified_name == base {
            return true;
        }
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack = vec![qualified_name];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if current == base {
                return true;
            }
            let Some(handle) = self.get(current) else {
                continue;
            };
            for supertype in &handle.supertypes {
                if let SourceClassifier::Class { qualified_name } = &supertype.classifier {
                    stack.push(qualified_name.as_str());
                }
            }
        }
        false
    }
}
