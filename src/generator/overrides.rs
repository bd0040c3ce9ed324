//! Override rules: user-configured and built-in substitutions from source
//! types to TypeScript renderings.
//!
//! The merged table is an ordered list of matcher/rendering pairs. Exact
//! matchers are consulted before subclass matchers; within each kind the
//! first registered rule wins. Built-ins are appended only where no user
//! rule already claims the same matcher, so user rules silently shadow them.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::debug;

use crate::config::DateMapping;
use crate::model::UniverseIndex;

/// How a rule matches a source type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "match", rename_all = "camelCase")]
pub enum TypeMatcher {
    /// Equality on the qualified name.
    #[serde(rename_all = "camelCase")]
    Exact { qualified_name: String },
    /// Any type assignable to the named base.
    #[serde(rename_all = "camelCase")]
    Subclass { qualified_name: String },
}

impl TypeMatcher {
    pub fn qualified_name(&self) -> &str {
        match self {
            Self::Exact { qualified_name } | Self::Subclass { qualified_name } => qualified_name,
        }
    }
}

/// The target-side rendering of a matched type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TsRendering {
    /// A literal target type name, with an optional import statement.
    #[serde(rename_all = "camelCase")]
    Literal {
        name: String,
        #[serde(default)]
        import: Option<String>,
        #[serde(default)]
        ignore_generics: bool,
    },
    /// A named generic container, e.g. a sequence type.
    #[serde(rename_all = "camelCase")]
    Array {
        name: String,
        #[serde(default)]
        import: Option<String>,
        #[serde(default)]
        ignore_generics: bool,
    },
    /// An index-signature shape over the second type argument; the matched
    /// usage's own generic arguments become irrelevant.
    GenericMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OverrideRule {
    pub source: TypeMatcher,
    pub target: TsRendering,
}

/// The merged, ordered rule set for one run.
#[derive(Debug)]
pub struct OverrideTable {
    rules: Vec<OverrideRule>,
}

impl OverrideTable {
    /// Build the table from user rules plus the seeded built-ins.
    ///
    /// User rules are string-keyed and resolved against the requested root
    /// set; a rule naming a type outside it is inapplicable and dropped.
    pub fn new(user_rules: &[OverrideRule], map_date: DateMapping, roots: &[String]) -> Self {
        let known: HashSet<&str> = roots.iter().map(String::as_str).collect();
        let mut rules: Vec<OverrideRule> = user_rules
            .iter()
            .filter(|rule| {
                if known.contains(rule.source.qualified_name()) {
                    true
                } else {
                    debug!(
                        type_name = %rule.source.qualified_name(),
                        "override rule targets a type outside the requested set; dropped"
                    );
                    false
                }
            })
            .cloned()
            .collect();
        seed_builtins(&mut rules, map_date);
        Self { rules }
    }

    /// Resolve a rendering: exact rules first, then subclass rules in
    /// declaration order, first match wins.
    pub fn resolve(
        &self,
        qualified_name: &str,
        universe: &UniverseIndex<'_>,
    ) -> Option<&TsRendering> {
        self.rules
            .iter()
            .find(|rule| {
                matches!(&rule.source, TypeMatcher::Exact { qualified_name: base }
                    if base == qualified_name)
            })
            .or_else(|| {
                self.rules.iter().find(|rule| {
                    matches!(&rule.source, TypeMatcher::Subclass { qualified_name: base }
                        if universe.is_assignable_to(qualified_name, base))
                })
            })
            .map(|rule| &rule.target)
    }
}

fn literal(name: &str) -> TsRendering {
    TsRendering::Literal {
        name: name.to_string(),
        import: None,
        ignore_generics: false,
    }
}

fn exact(qualified_name: &str) -> TypeMatcher {
    TypeMatcher::Exact {
        qualified_name: qualified_name.to_string(),
    }
}

fn subclass(qualified_name: &str) -> TypeMatcher {
    TypeMatcher::Subclass {
        qualified_name: qualified_name.to_string(),
    }
}

fn insert_if_absent(rules: &mut Vec<OverrideRule>, source: TypeMatcher, target: TsRendering) {
    if !rules.iter().any(|rule| rule.source == source) {
        rules.push(OverrideRule { source, target });
    }
}

/// Seed the well-known rules for primitives, identifiers, collections,
/// map-like types, and the configured date rendering.
fn seed_builtins(rules: &mut Vec<OverrideRule>, map_date: DateMapping) {
    insert_if_absent(rules, exact("kotlin.String"), literal("string"));
    insert_if_absent(rules, exact("kotlin.Byte"), literal("number"));
    insert_if_absent(rules, exact("kotlin.Short"), literal("number"));
    insert_if_absent(rules, exact("kotlin.Int"), literal("number"));
    insert_if_absent(rules, exact("kotlin.Long"), literal("number"));
    insert_if_absent(rules, exact("kotlin.Float"), literal("number"));
    insert_if_absent(rules, exact("kotlin.Double"), literal("number"));
    insert_if_absent(rules, exact("java.math.BigDecimal"), literal("number"));
    insert_if_absent(rules, exact("java.math.BigInteger"), literal("number"));
    insert_if_absent(rules, exact("kotlin.Boolean"), literal("boolean"));
    insert_if_absent(
        rules,
        subclass("kotlin.collections.Collection"),
        TsRendering::Array {
            name: "Array".to_string(),
            import: None,
            ignore_generics: false,
        },
    );
    insert_if_absent(rules, exact("java.util.UUID"), literal("string"));
    insert_if_absent(
        rules,
        subclass("kotlin.collections.Map"),
        TsRendering::GenericMap,
    );

    let date = date_rendering(map_date);
    for qualified_name in [
        "java.time.LocalDate",
        "java.time.LocalDateTime",
        "java.time.ZonedDateTime",
        "java.util.Date",
    ] {
        insert_if_absent(rules, exact(qualified_name), date.clone());
    }
}

/// The literal rendering for the configured date mode.
fn date_rendering(map_date: DateMapping) -> TsRendering {
    match map_date {
        DateMapping::AsDate => literal("Date"),
        DateMapping::AsString => literal("string"),
        DateMapping::AsNumber => literal("number"),
        DateMapping::AsMoment => TsRendering::Literal {
            name: "moment.Moment".to_string(),
            import: Some("import moment from 'moment';".to_string()),
            ignore_generics: false,
        },
        DateMapping::AsLuxon => TsRendering::Literal {
            name: "DateTime".to_string(),
            import: Some("import { DateTime } from 'luxon';".to_string()),
            ignore_generics: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SourceClassifier, SourceType, TypeHandle, TypeUniverse};

    fn universe_with_subtype() -> TypeUniverse {
        TypeUniverse {
            types: vec![
                TypeHandle {
                    qualified_name: "demo.Child".to_string(),
                    type_parameters: Vec::new(),
                    supertypes: vec![SourceType {
                        nullable: false,
                        classifier: SourceClassifier::Class {
                            qualified_name: "demo.Base".to_string(),
                        },
                        arguments: Vec::new(),
                    }],
                    properties: Vec::new(),
                    is_enum: false,
                    enum_constants: Vec::new(),
                },
                TypeHandle {
                    qualified_name: "demo.Base".to_string(),
                    type_parameters: Vec::new(),
                    supertypes: Vec::new(),
                    properties: Vec::new(),
                    is_enum: false,
                    enum_constants: Vec::new(),
                },
            ],
        }
    }

    fn rendered_name(rendering: &TsRendering) -> &str {
        match rendering {
            TsRendering::Literal { name, .. } | TsRendering::Array { name, .. } => name,
            TsRendering::GenericMap => "{}",
        }
    }

    #[test]
    fn test_exact_wins_over_subclass_regardless_of_order() {
        let universe = universe_with_subtype();
        let index = UniverseIndex::new(&universe);
        let roots = vec!["demo.Child".to_string(), "demo.Base".to_string()];

        // Subclass rule registered first, exact rule second.
        let user = vec![
            OverrideRule {
                source: subclass("demo.Base"),
                target: literal("FromSubclass"),
            },
            OverrideRule {
                source: exact("demo.Child"),
                target: literal("FromExact"),
            },
        ];
        let table = OverrideTable::new(&user, DateMapping::AsString, &roots);

        let rendering = table.resolve("demo.Child", &index).expect("rule matches");
        assert_eq!(rendered_name(rendering), "FromExact");
    }

    #[test]
    fn test_first_registered_subclass_rule_wins() {
        let universe = universe_with_subtype();
        let index = UniverseIndex::new(&universe);
        let roots = vec!["demo.Child".to_string(), "demo.Base".to_string()];

        let user = vec![
            OverrideRule {
                source: subclass("demo.Base"),
                target: literal("First"),
            },
            OverrideRule {
                source: subclass("demo.Child"),
                target: literal("Second"),
            },
        ];
        let table = OverrideTable::new(&user, DateMapping::AsString, &roots);

        let rendering = table.resolve("demo.Child", &index).expect("rule matches");
        assert_eq!(rendered_name(rendering), "First");
    }

    #[test]
    fn test_user_rule_shadows_builtin() {
        let universe = TypeUniverse {
            types: vec![TypeHandle {
                qualified_name: "kotlin.String".to_string(),
                type_parameters: Vec::new(),
                supertypes: Vec::new(),
                properties: Vec::new(),
                is_enum: false,
                enum_constants: Vec::new(),
            }],
        };
        let index = UniverseIndex::new(&universe);
        let roots = vec!["kotlin.String".to_string()];

        let user = vec![OverrideRule {
            source: exact("kotlin.String"),
            target: literal("MyString"),
        }];
        let table = OverrideTable::new(&user, DateMapping::AsString, &roots);

        let rendering = table.resolve("kotlin.String", &index).expect("rule matches");
        assert_eq!(rendered_name(rendering), "MyString");
    }

    #[test]
    fn test_unresolvable_user_rule_is_dropped() {
        let universe = universe_with_subtype();
        let index = UniverseIndex::new(&universe);
        let roots = vec!["demo.Child".to_string()];

        let user = vec![OverrideRule {
            source: exact("elsewhere.Unknown"),
            target: literal("Never"),
        }];
        let table = OverrideTable::new(&user, DateMapping::AsString, &roots);

        assert!(table.resolve("elsewhere.Unknown", &index).is_none());
    }

    #[test]
    fn test_builtin_collection_and_map_rules() {
        let universe = TypeUniverse {
            types: vec![TypeHandle {
                qualified_name: "kotlin.collections.List".to_string(),
                type_parameters: Vec::new(),
                supertypes: vec![SourceType {
                    nullable: false,
                    classifier: SourceClassifier::Class {
                        qualified_name: "kotlin.collections.Collection".to_string(),
                    },
                    arguments: Vec::new(),
                }],
                properties: Vec::new(),
                is_enum: false,
                enum_constants: Vec::new(),
            }],
        };
        let index = UniverseIndex::new(&universe);
        let table = OverrideTable::new(&[], DateMapping::AsString, &[]);

        assert!(matches!(
            table.resolve("kotlin.collections.List", &index),
            Some(TsRendering::Array { name, .. }) if name == "Array"
        ));
        // Reflexive subclass match needs no universe handle.
        assert!(matches!(
            table.resolve("kotlin.collections.Map", &index),
            Some(TsRendering::GenericMap)
        ));
        assert!(table.resolve("demo.Unrelated", &index).is_none());
    }

    #[test]
    fn test_date_rendering_modes() {
        let universe = TypeUniverse { types: Vec::new() };
        let index = UniverseIndex::new(&universe);

        let expectations = [
            (DateMapping::AsDate, "Date", false),
            (DateMapping::AsString, "string", false),
            (DateMapping::AsNumber, "number", false),
            (DateMapping::AsMoment, "moment.Moment", true),
            (DateMapping::AsLuxon, "DateTime", true),
        ];
        for (mode, expected, has_import) in expectations {
            let table = OverrideTable::new(&[], mode, &[]);
            let rendering = table
                .resolve("java.time.LocalDateTime", &index)
                .expect("date rule seeded");
            match rendering {
                TsRendering::Literal { name, import, .. } => {
                    assert_eq!(name, expected);
                    assert_eq!(import.is_some(), has_import);
                }
                other => panic!("unexpected date rendering: {other:?}"),
            }
        }
    }
}
