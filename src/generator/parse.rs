//! Structural parsing of one type handle into registry form.
//!
//! All three extraction passes resolve nested type usages through the same
//! `resolve_classifier` routine, so registration and filtering behave
//! identically in every signature position.

use tracing::debug;

use super::registry::{Classifier, GenericParam, PropertyRef, TypeRef, TypeRegistry};
use crate::config::GeneratorConfig;
use crate::model::{SourceClassifier, SourceType, TypeHandle, Visibility};

pub(crate) struct ParsedStructure {
    pub is_enum: bool,
    pub enum_constants: Vec<String>,
    pub generic_params: Vec<GenericParam>,
    pub supertypes: Vec<TypeRef>,
}

/// Parse generic parameters (with bounds) and supertypes. Unseen types are
/// registered as emittable and pushed onto `discovered` for the next batch.
pub(crate) fn parse_structure(
    handle: &TypeHandle,
    registry: &mut TypeRegistry,
    config: &GeneratorConfig,
    discovered: &mut Vec<String>,
) -> ParsedStructure {
    let generic_params = handle
        .type_parameters
        .iter()
        .map(|param| GenericParam {
            name: param.name.clone(),
            bounds: param
                .bounds
                .iter()
                .filter_map(|bound| {
                    resolve_classifier(&bound.classifier, registry, config, Some(&mut *discovered))
                })
                .collect(),
        })
        .collect();

    let supertypes = handle
        .supertypes
        .iter()
        .filter_map(|supertype| parse_type(supertype, registry, config, Some(&mut *discovered)))
        .collect();

    ParsedStructure {
        is_enum: handle.is_enum,
        enum_constants: handle.enum_constants.clone(),
        generic_params,
        supertypes,
    }
}

/// Parse the public, non-ignored properties of a handle. A property whose
/// classifier has no structural identity is omitted entirely rather than
/// rendered as `any`: it carries no shape worth declaring.
pub(crate) fn parse_properties(
    handle: &TypeHandle,
    registry: &mut TypeRegistry,
    config: &GeneratorConfig,
) -> Vec<PropertyRef> {
    let ignored = config.ignored_fields_by_class.get(&handle.qualified_name);

    handle
        .properties
        .iter()
        .filter(|property| property.visibility == Visibility::Public)
        .filter(|property| !ignored.is_some_and(|fields| fields.contains(&property.name)))
        .filter_map(|property| {
            let Some(ty) = parse_type(&property.ty, registry, config, None) else {
                debug!(
                    type_name = %handle.qualified_name,
                    property = %property.name,
                    "property type has no structural identity; dropped"
                );
                return None;
            };
            Some(PropertyRef {
                name: property.name.clone(),
                ty,
            })
        })
        .collect()
}

fn parse_type(
    source: &SourceType,
    registry: &mut TypeRegistry,
    config: &GeneratorConfig,
    mut discovered: Option<&mut Vec<String>>,
) -> Option<TypeRef> {
    let classifier =
        resolve_classifier(&source.classifier, registry, config, discovered.as_deref_mut())?;
    let arguments = source
        .arguments
        .iter()
        .filter_map(|argument| parse_type(argument, registry, config, discovered.as_deref_mut()))
        .collect();
    Some(TypeRef {
        nullable: source.nullable,
        classifier,
        arguments,
    })
}

/// Shared classifier resolution.
///
/// Returns `None` for usages not worth modeling — the universal top types,
/// the externally-serializable markers, star projections — and callers drop
/// the usage. Unseen concrete types are registered: emittable and queued
/// during the structural phase (`discovered` is `Some`), reference-only
/// during the property phase.
pub(crate) fn resolve_classifier(
    source: &SourceClassifier,
    registry: &mut TypeRegistry,
    config: &GeneratorConfig,
    mut discovered: Option<&mut Vec<String>>,
) -> Option<Classifier> {
    match source {
        SourceClassifier::Class { qualified_name } => {
            if qualified_name.is_empty() {
                debug!("class reference with no qualified name; renders as `any`");
                return Some(Classifier::Unknown);
            }
            if is_unmodeled(qualified_name) {
                return None;
            }
            let emittable = discovered.is_some();
            if registry.ensure(qualified_name, emittable, config) {
                if let Some(queue) = discovered.as_deref_mut() {
                    queue.push(qualified_name.clone());
                }
            }
            Some(Classifier::Concrete {
                qualified_name: qualified_name.clone(),
                wrapped: None,
            })
        }
        SourceClassifier::TypeParameter { name } => Some(Classifier::Parameter {
            name: name.clone(),
        }),
        SourceClassifier::TypeOf { classifier } => {
            let inner = resolve_classifier(classifier, registry, config, discovered)?;
            Some(Classifier::Concrete {
                qualified_name: String::new(),
                wrapped: Some(Box::new(inner)),
            })
        }
        SourceClassifier::Star => None,
    }
}

/// The universal top types and serializable markers are never modeled. The
/// marker check matches the simple name, as the source type system reports
/// one marker interface per serialization library.
fn is_unmodeled(qualified_name: &str) -> bool {
    let simple = qualified_name
        .rsplit('.')
        .next()
        .unwrap_or(qualified_name);
    simple == "Any" || simple == "Serializable" || qualified_name == "java.lang.Object"
}
