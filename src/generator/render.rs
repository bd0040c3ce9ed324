//! Rendering of one type node into TypeScript source text.
//!
//! The registry is frozen before rendering starts, so every node renders
//! independently: imports are collected into a per-file sorted set while the
//! declaration text is built, then the pieces are assembled in a fixed
//! order — header, imports, declaration.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::debug;

use super::overrides::{OverrideTable, TsRendering};
use super::registry::{Classifier, GenericParam, TypeNode, TypeRef, TypeRegistry};
use super::utils::{
    escape_single_quoted, kebab_file_stem, package_path, quote_if_needed, relative_specifier,
};
use crate::config::{EnumStyle, GeneratorConfig};
use crate::model::UniverseIndex;

/// Fixed header for every generated file.
const FILE_HEADER: &str = "/* tslint:disable */\n/* eslint-disable */\n\n";

/// One generated file, path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Read-only context shared by the render phase; safe to fan out across
/// threads once discovery has finished.
pub(crate) struct RenderContext<'a> {
    pub registry: &'a TypeRegistry,
    pub overrides: &'a OverrideTable,
    pub universe: &'a UniverseIndex<'a>,
    pub config: &'a GeneratorConfig,
}

pub(crate) fn render(node: &TypeNode, ctx: &RenderContext<'_>) -> OutputFile {
    let dir = package_path(&node.package);
    let file_name = format!("{}.ts", kebab_file_stem(&node.simple_name));
    let path = if dir.is_empty() {
        PathBuf::from(file_name)
    } else {
        PathBuf::from(&dir).join(file_name)
    };
    let contents = if node.is_enum {
        render_enum(node, ctx)
    } else {
        render_interface(node, ctx, &dir)
    };
    OutputFile { path, contents }
}

/// Enumerations become a union of quoted constant names; no imports, no
/// body. The const-object style instead mirrors the constants into a frozen
/// object plus a derived key-of alias.
fn render_enum(node: &TypeNode, ctx: &RenderContext<'_>) -> String {
    let mut out = String::from(FILE_HEADER);
    match ctx.config.enum_style {
        EnumStyle::Union => {
            if node.enum_constants.is_empty() {
                out.push_str(&format!("export type {} = never;\n", node.simple_name));
            } else {
                let alternatives = node
                    .enum_constants
                    .iter()
                    .map(|constant| format!("'{}'", escape_single_quoted(constant)))
                    .collect::<Vec<_>>()
                    .join(" | ");
                out.push_str(&format!(
                    "export type {} = {};\n",
                    node.simple_name, alternatives
                ));
            }
        }
        EnumStyle::ConstObject => {
            out.push_str(&format!("export const {} = {{\n", node.simple_name));
            for constant in &node.enum_constants {
                out.push_str(&format!(
                    "  {}: '{}',\n",
                    quote_if_needed(constant),
                    escape_single_quoted(constant)
                ));
            }
            out.push_str("} as const;\n\n");
            out.push_str(&format!(
                "export type {} = (typeof {})[keyof typeof {}];\n",
                node.simple_name, node.simple_name, node.simple_name
            ));
        }
    }
    out
}

fn render_interface(node: &TypeNode, ctx: &RenderContext<'_>, dir: &str) -> String {
    let mut imports: BTreeSet<String> = BTreeSet::new();

    let params = render_param_clause(&node.generic_params, node, ctx, &mut imports, dir);
    let extends: Vec<String> = node
        .supertypes
        .iter()
        .map(|supertype| render_type_ref(supertype, true, node, ctx, &mut imports, dir))
        .collect();
    let properties: Vec<String> = node
        .properties
        .iter()
        .map(|property| {
            format!(
                "  {}{}: {};\n",
                quote_if_needed(&property.name),
                if property.ty.nullable { "?" } else { "" },
                render_type_ref(&property.ty, true, node, ctx, &mut imports, dir)
            )
        })
        .collect();

    let mut out = String::from(FILE_HEADER);
    for import in &imports {
        out.push_str(import);
        out.push('\n');
    }
    if !imports.is_empty() {
        out.push('\n');
    }

    out.push_str("export interface ");
    out.push_str(&node.simple_name);
    out.push_str(&params);
    if !extends.is_empty() {
        out.push_str(" extends ");
        out.push_str(&extends.join(", "));
    }
    out.push_str(" {\n");
    for line in &properties {
        out.push_str(line);
    }
    out.push_str("}\n");
    out
}

/// `<T, U extends A & B>` — bounds render without override lookup but still
/// contribute imports when they name an emittable type.
fn render_param_clause(
    params: &[GenericParam],
    node: &TypeNode,
    ctx: &RenderContext<'_>,
    imports: &mut BTreeSet<String>,
    dir: &str,
) -> String {
    if params.is_empty() {
        return String::new();
    }
    let rendered = params
        .iter()
        .map(|param| {
            let bounds: Vec<String> = param
                .bounds
                .iter()
                .map(|bound| match resolve_rendering(bound, false, node, ctx, imports, dir) {
                    RenderedClassifier::Named { text, .. } => text,
                    RenderedClassifier::MapShape => "{ [key: string]: any }".to_string(),
                })
                .collect();
            if bounds.is_empty() {
                param.name.clone()
            } else {
                format!("{} extends {}", param.name, bounds.join(" & "))
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("<{rendered}>")
}

enum RenderedClassifier {
    /// A name that may take a generic-argument suffix.
    Named { text: String, generics: bool },
    /// The generic-map index-signature shape.
    MapShape,
}

fn any_fallback() -> RenderedClassifier {
    RenderedClassifier::Named {
        text: "any".to_string(),
        generics: false,
    }
}

fn resolve_rendering(
    classifier: &Classifier,
    check_overrides: bool,
    node: &TypeNode,
    ctx: &RenderContext<'_>,
    imports: &mut BTreeSet<String>,
    dir: &str,
) -> RenderedClassifier {
    match classifier {
        Classifier::Parameter { name } => RenderedClassifier::Named {
            text: name.clone(),
            generics: true,
        },
        Classifier::Unknown => any_fallback(),
        Classifier::Concrete {
            wrapped: Some(inner),
            ..
        } => resolve_rendering(inner, check_overrides, node, ctx, imports, dir),
        Classifier::Concrete {
            qualified_name,
            wrapped: None,
        } => {
            if check_overrides {
                if let Some(rendering) = ctx.overrides.resolve(qualified_name, ctx.universe) {
                    return match rendering {
                        TsRendering::Literal {
                            name,
                            import,
                            ignore_generics,
                        }
                        | TsRendering::Array {
                            name,
                            import,
                            ignore_generics,
                        } => {
                            if let Some(import) = import {
                                imports.insert(import.clone());
                            }
                            RenderedClassifier::Named {
                                text: name.clone(),
                                generics: !ignore_generics,
                            }
                        }
                        TsRendering::GenericMap => RenderedClassifier::MapShape,
                    };
                }
            }
            let Some(target) = ctx.registry.get(qualified_name) else {
                debug!(
                    type_name = %qualified_name,
                    "reference to an unregistered type; falling back to `any`"
                );
                return any_fallback();
            };
            if check_overrides && !target.emittable {
                // No file exists for it, so it must never appear by name.
                debug!(
                    type_name = %qualified_name,
                    "reference to a type without a generated file; falling back to `any`"
                );
                return any_fallback();
            }
            if target.emittable && target.qualified_name != node.qualified_name {
                imports.insert(import_line(target, dir));
            }
            RenderedClassifier::Named {
                text: target.simple_name.clone(),
                generics: true,
            }
        }
    }
}

fn import_line(target: &TypeNode, from_dir: &str) -> String {
    let specifier = relative_specifier(
        from_dir,
        &package_path(&target.package),
        &kebab_file_stem(&target.simple_name),
    );
    format!("import {{ {} }} from '{}';", target.simple_name, specifier)
}

/// Render one type usage. Generic arguments always run through override
/// resolution; the map shape consumes only the value argument, and
/// nullability appends after the complete expression.
fn render_type_ref(
    ty: &TypeRef,
    check_overrides: bool,
    node: &TypeNode,
    ctx: &RenderContext<'_>,
    imports: &mut BTreeSet<String>,
    dir: &str,
) -> String {
    let rendered = resolve_rendering(&ty.classifier, check_overrides, node, ctx, imports, dir);
    let mut text = match rendered {
        RenderedClassifier::MapShape => {
            let value = ty
                .arguments
                .get(1)
                .map(|argument| render_type_ref(argument, true, node, ctx, imports, dir))
                .unwrap_or_else(|| "any".to_string());
            format!("{{ [key: string]: {value} }}")
        }
        RenderedClassifier::Named { text, generics } => {
            if generics && !ty.arguments.is_empty() {
                let arguments = ty
                    .arguments
                    .iter()
                    .map(|argument| render_type_ref(argument, true, node, ctx, imports, dir))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{text}<{arguments}>")
            } else {
                text
            }
        }
    };
    if ty.nullable {
        text.push_str(" | null");
    }
    text
}
