//! End-to-end generation scenarios against a real output directory.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tempfile::TempDir;
use walkdir::WalkDir;

use tsgen::config::{DateMapping, GeneratorConfig};
use tsgen::model::TypeUniverse;
use tsgen::{GenerateError, generate};

fn config_for(dir: &Path) -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.output_path = Some(dir.to_path_buf());
    config
}

/// Relative path -> file bytes for a whole output tree.
fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut tree = BTreeMap::new();
    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap()
            .to_string_lossy()
            .replace('\\', "/");
        tree.insert(relative, fs::read(entry.path()).unwrap());
    }
    tree
}

fn person_universe() -> TypeUniverse {
    TypeUniverse::from_json(
        r#"{
            "types": [
                {
                    "qualifiedName": "demo.Person",
                    "properties": [
                        {
                            "name": "name",
                            "type": { "classifier": { "kind": "class", "qualifiedName": "kotlin.String" } }
                        },
                        {
                            "name": "tags",
                            "type": {
                                "classifier": { "kind": "class", "qualifiedName": "kotlin.collections.List" },
                                "arguments": [
                                    { "classifier": { "kind": "class", "qualifiedName": "kotlin.String" } }
                                ]
                            }
                        }
                    ]
                },
                {
                    "qualifiedName": "kotlin.collections.List",
                    "supertypes": [
                        { "classifier": { "kind": "class", "qualifiedName": "kotlin.collections.Collection" } }
                    ]
                }
            ]
        }"#,
    )
    .expect("valid model JSON")
}

#[test]
fn test_person_scenario_with_no_cross_references() {
    let dir = TempDir::new().unwrap();
    let universe = person_universe();
    let config = config_for(dir.path());

    let summary = generate(&universe, &["demo.Person".to_string()], &config).unwrap();
    assert_eq!(summary.files_written, 1);
    assert_eq!(summary.barrels_written, 1);

    let person = fs::read_to_string(dir.path().join("demo/person.ts")).unwrap();
    assert_eq!(
        person,
        "/* tslint:disable */\n/* eslint-disable */\n\n\
         export interface Person {\n  name: string;\n  tags: Array<string>;\n}\n"
    );
    // No cross-references, so no import block at all.
    assert!(!person.contains("import"));

    let index = fs::read_to_string(dir.path().join("demo/index.ts")).unwrap();
    assert_eq!(index, "export * from './person'\n");
}

#[test]
fn test_mutually_referencing_types_emit_and_import_each_other() {
    let dir = TempDir::new().unwrap();
    let universe = TypeUniverse::from_json(
        r#"{
            "types": [
                {
                    "qualifiedName": "demo.A",
                    "properties": [
                        { "name": "b", "type": { "classifier": { "kind": "class", "qualifiedName": "demo.B" } } }
                    ]
                },
                {
                    "qualifiedName": "demo.B",
                    "properties": [
                        { "name": "a", "type": { "classifier": { "kind": "class", "qualifiedName": "demo.A" } } }
                    ]
                }
            ]
        }"#,
    )
    .unwrap();
    let config = config_for(dir.path());

    let summary = generate(
        &universe,
        &["demo.A".to_string(), "demo.B".to_string()],
        &config,
    )
    .unwrap();
    assert_eq!(summary.files_written, 2);

    let a = fs::read_to_string(dir.path().join("demo/a.ts")).unwrap();
    let b = fs::read_to_string(dir.path().join("demo/b.ts")).unwrap();
    assert!(a.contains("import { B } from './b';"));
    assert!(!a.contains("import { A }"));
    assert!(b.contains("import { A } from './a';"));
    assert!(!b.contains("import { B }"));

    let index = fs::read_to_string(dir.path().join("demo/index.ts")).unwrap();
    assert_eq!(index, "export * from './a'\nexport * from './b'\n");
}

#[test]
fn test_rerun_with_delete_before_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let universe = person_universe();
    let config = config_for(dir.path());
    let roots = vec!["demo.Person".to_string()];

    generate(&universe, &roots, &config).unwrap();
    let first = snapshot(dir.path());
    assert!(!first.is_empty());

    generate(&universe, &roots, &config).unwrap();
    let second = snapshot(dir.path());

    assert_eq!(first, second);
}

#[test]
fn test_delete_before_removes_stale_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("stale.ts"), "old").unwrap();

    let universe = person_universe();
    let config = config_for(dir.path());
    generate(&universe, &["demo.Person".to_string()], &config).unwrap();

    assert!(!dir.path().join("stale.ts").exists());
    assert!(dir.path().join("demo/person.ts").exists());
}

#[test]
fn test_enum_emits_union_type() {
    let dir = TempDir::new().unwrap();
    let universe = TypeUniverse::from_json(
        r#"{
            "types": [
                {
                    "qualifiedName": "demo.Color",
                    "isEnum": true,
                    "enumConstants": ["RED", "GREEN", "BLUE"]
                }
            ]
        }"#,
    )
    .unwrap();
    let config = config_for(dir.path());

    generate(&universe, &["demo.Color".to_string()], &config).unwrap();

    let color = fs::read_to_string(dir.path().join("demo/color.ts")).unwrap();
    assert_eq!(
        color,
        "/* tslint:disable */\n/* eslint-disable */\n\n\
         export type Color = 'RED' | 'GREEN' | 'BLUE';\n"
    );
}

#[test]
fn test_map_property_has_no_key_import() {
    let dir = TempDir::new().unwrap();
    let universe = TypeUniverse::from_json(
        r#"{
            "types": [
                {
                    "qualifiedName": "demo.Catalog",
                    "properties": [
                        {
                            "name": "byKey",
                            "type": {
                                "classifier": { "kind": "class", "qualifiedName": "kotlin.collections.Map" },
                                "arguments": [
                                    { "classifier": { "kind": "class", "qualifiedName": "demo.Key" } },
                                    { "classifier": { "kind": "class", "qualifiedName": "demo.Entry" } }
                                ]
                            }
                        }
                    ]
                },
                { "qualifiedName": "demo.Key" },
                { "qualifiedName": "demo.Entry" }
            ]
        }"#,
    )
    .unwrap();
    let config = config_for(dir.path());
    let roots = vec![
        "demo.Catalog".to_string(),
        "demo.Key".to_string(),
        "demo.Entry".to_string(),
    ];

    generate(&universe, &roots, &config).unwrap();

    let catalog = fs::read_to_string(dir.path().join("demo/catalog.ts")).unwrap();
    assert!(catalog.contains("byKey: { [key: string]: Entry };"));
    assert!(catalog.contains("import { Entry } from './entry';"));
    // The key side of a map rendering contributes nothing, not even imports.
    assert!(!catalog.contains("import { Key }"));
    assert!(!catalog.contains("'./key'"));
}

#[test]
fn test_ignored_type_is_not_written_and_renders_fallback() {
    let dir = TempDir::new().unwrap();
    let universe = TypeUniverse::from_json(
        r#"{
            "types": [
                {
                    "qualifiedName": "demo.Report",
                    "properties": [
                        { "name": "secret", "type": { "classifier": { "kind": "class", "qualifiedName": "demo.Secret" } } }
                    ]
                },
                { "qualifiedName": "demo.Secret" }
            ]
        }"#,
    )
    .unwrap();
    let mut config = config_for(dir.path());
    config.ignore_classes.insert("demo.Secret".to_string());
    let roots = vec!["demo.Report".to_string(), "demo.Secret".to_string()];

    generate(&universe, &roots, &config).unwrap();

    assert!(!dir.path().join("demo/secret.ts").exists());
    let report = fs::read_to_string(dir.path().join("demo/report.ts")).unwrap();
    assert!(report.contains("secret: any;"));
    assert!(!report.contains("Secret"));

    let index = fs::read_to_string(dir.path().join("demo/index.ts")).unwrap();
    assert_eq!(index, "export * from './report'\n");
}

#[test]
fn test_date_mode_flag_changes_rendering() {
    let dir = TempDir::new().unwrap();
    let universe = TypeUniverse::from_json(
        r#"{
            "types": [
                {
                    "qualifiedName": "demo.Event",
                    "properties": [
                        { "name": "at", "type": { "classifier": { "kind": "class", "qualifiedName": "java.time.ZonedDateTime" } } }
                    ]
                }
            ]
        }"#,
    )
    .unwrap();
    let mut config = config_for(dir.path());
    config.map_date = DateMapping::AsMoment;

    generate(&universe, &["demo.Event".to_string()], &config).unwrap();

    let event = fs::read_to_string(dir.path().join("demo/event.ts")).unwrap();
    assert!(event.contains("import moment from 'moment';"));
    assert!(event.contains("at: moment.Moment;"));
}

#[test]
fn test_missing_output_path_is_an_error() {
    let universe = person_universe();
    let config = GeneratorConfig::default();

    let result = generate(&universe, &["demo.Person".to_string()], &config);
    assert!(matches!(result, Err(GenerateError::MissingOutputPath)));
}

#[test]
fn test_cross_package_tree_and_barrels() {
    let dir = TempDir::new().unwrap();
    let universe = TypeUniverse::from_json(
        r#"{
            "types": [
                {
                    "qualifiedName": "com.acme.model.Person",
                    "properties": [
                        { "name": "address", "type": { "classifier": { "kind": "class", "qualifiedName": "com.acme.shared.Address" } } }
                    ],
                    "supertypes": [
                        { "classifier": { "kind": "class", "qualifiedName": "com.acme.shared.Entity" } }
                    ]
                },
                { "qualifiedName": "com.acme.shared.Entity" },
                { "qualifiedName": "com.acme.shared.Address" }
            ]
        }"#,
    )
    .unwrap();
    let config = config_for(dir.path());
    let roots = vec![
        "com.acme.model.Person".to_string(),
        "com.acme.shared.Address".to_string(),
    ];

    generate(&universe, &roots, &config).unwrap();

    let person = fs::read_to_string(dir.path().join("com/acme/model/person.ts")).unwrap();
    assert!(person.contains("import { Address } from '../shared/address';"));
    assert!(person.contains("import { Entity } from '../shared/entity';"));
    assert!(person.contains("export interface Person extends Entity {"));

    let shared_index = fs::read_to_string(dir.path().join("com/acme/shared/index.ts")).unwrap();
    assert_eq!(
        shared_index,
        "export * from './address'\nexport * from './entity'\n"
    );
}
