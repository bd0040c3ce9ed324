//! Generator configuration.
//!
//! The JSON surface mirrors the original build-tool extension: camelCase
//! keys, package-prefix root filters, user override rules, and a handful of
//! rendering options. Flags passed on the command line override the file.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use clap::ValueEnum;
use serde::Deserialize;

use crate::generator::overrides::OverrideRule;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Root of the generated tree. Required by the time generation runs.
    pub output_path: Option<PathBuf>,
    /// Package prefixes selecting root types; empty accepts everything.
    pub class_packages: Vec<String>,
    /// Package prefixes removed from the root set.
    pub exclude_class_packages: Vec<String>,
    /// User override rules, consulted before the built-ins.
    pub custom_types: Vec<OverrideRule>,
    /// How date/time types render.
    pub map_date: DateMapping,
    /// Clear the output directory before writing.
    pub delete_before: bool,
    /// Qualified names that never get a file of their own.
    pub ignore_classes: BTreeSet<String>,
    /// Per-type property names excluded from emission.
    pub ignored_fields_by_class: HashMap<String, BTreeSet<String>>,
    /// Shape of emitted enumeration declarations.
    pub enum_style: EnumStyle,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_path: None,
            class_packages: Vec::new(),
            exclude_class_packages: Vec::new(),
            custom_types: Vec::new(),
            map_date: DateMapping::default(),
            delete_before: true,
            ignore_classes: BTreeSet::new(),
            ignored_fields_by_class: HashMap::new(),
            enum_style: EnumStyle::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The five recognized date/time renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum DateMapping {
    /// `Date`
    AsDate,
    /// `string`
    #[default]
    AsString,
    /// `number`
    AsNumber,
    /// `moment.Moment`, importing moment
    AsMoment,
    /// `DateTime`, importing luxon
    AsLuxon,
}

/// Shape of emitted enumeration declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnumStyle {
    /// `export type Color = 'RED' | 'GREEN';`
    #[default]
    Union,
    /// A const object of the constants plus a derived key-of type.
    ConstObject,
}
