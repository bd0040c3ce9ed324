//! Generation pipeline: discovery, override resolution, rendering, writing.
//!
//! ## Module Structure
//!
//! - `registry`: type-node arena and breadth-first graph discovery
//! - `parse`: structural extraction of one handle (params, supertypes, properties)
//! - `overrides`: user and built-in type substitutions with fixed precedence
//! - `render`: one node to TypeScript source text
//! - `writer`: file tree and per-directory index files
//! - `utils`: naming and relative-path helpers

pub mod overrides;
mod parse;
pub mod registry;
pub mod render;
pub mod utils;
mod writer;

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::error::GenerateError;
use crate::model::{TypeUniverse, UniverseIndex};
use overrides::OverrideTable;
use registry::discover;
use render::{OutputFile, RenderContext, render};

/// What a run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSummary {
    pub files_written: usize,
    pub barrels_written: usize,
    pub types_discovered: usize,
}

/// Run the full pipeline for `roots` against `universe`.
///
/// Discovery runs single-threaded to a fixed point in two phases; rendering
/// and writing then fan out over the frozen registry. The run either
/// completes or aborts on the first write failure.
pub fn generate(
    universe: &TypeUniverse,
    roots: &[String],
    config: &GeneratorConfig,
) -> Result<GenerationSummary, GenerateError> {
    let output_dir: PathBuf = config
        .output_path
        .clone()
        .ok_or(GenerateError::MissingOutputPath)?;

    let index = UniverseIndex::new(universe);
    let overrides = OverrideTable::new(&config.custom_types, config.map_date, roots);

    let registry = discover(&index, roots, config);
    debug!(
        types = registry.len(),
        roots = roots.len(),
        "type graph discovered"
    );

    let ctx = RenderContext {
        registry: &registry,
        overrides: &overrides,
        universe: &index,
        config,
    };
    let nodes = registry.emittable_nodes_sorted();
    let files: Vec<OutputFile> = nodes.par_iter().map(|node| render(node, &ctx)).collect();

    let barrels_written = writer::write_output(&files, &output_dir, config.delete_before)?;

    info!(
        output_dir = %output_dir.display(),
        files = files.len(),
        barrels = barrels_written,
        "TypeScript interfaces generated"
    );

    Ok(GenerationSummary {
        files_written: files.len(),
        barrels_written,
        types_discovered: registry.len(),
    })
}
