use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tsgen::config::{DateMapping, GeneratorConfig};
use tsgen::model::TypeUniverse;

/// Generate TypeScript interfaces from an exported object-model type graph.
#[derive(Debug, Parser)]
#[command(name = "tsgen", version, about)]
struct Cli {
    /// Path to the exported type-model JSON.
    #[arg(long)]
    model: PathBuf,

    /// Path to the generator configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory; overrides `outputPath` from the configuration.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Date rendering mode; overrides `mapDate` from the configuration.
    #[arg(long, value_enum)]
    map_date: Option<DateMapping>,

    /// Keep existing files in the output directory instead of clearing it.
    #[arg(long)]
    keep_output: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let model_json = fs::read_to_string(&cli.model)
        .with_context(|| format!("failed to read model file {}", cli.model.display()))?;
    let universe = TypeUniverse::from_json(&model_json)
        .with_context(|| format!("failed to parse model file {}", cli.model.display()))?;

    let mut config = match &cli.config {
        Some(path) => {
            let config_json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            GeneratorConfig::from_json(&config_json)
                .with_context(|| format!("failed to parse config file {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };
    if let Some(output) = cli.output {
        config.output_path = Some(output);
    }
    if let Some(map_date) = cli.map_date {
        config.map_date = map_date;
    }
    if cli.keep_output {
        config.delete_before = false;
    }

    let roots = select_roots(&universe, &config);
    let summary = tsgen::generate(&universe, &roots, &config)?;

    println!(
        "Generated {} files and {} index files from {} discovered types.",
        summary.files_written, summary.barrels_written, summary.types_discovered
    );
    Ok(())
}

/// Root selection stands in for the class enumerator: the universe filtered
/// by package prefix, in export order.
fn select_roots(universe: &TypeUniverse, config: &GeneratorConfig) -> Vec<String> {
    universe
        .types
        .iter()
        .filter(|handle| {
            let package = handle.package();
            let included = config.class_packages.is_empty()
                || config
                    .class_packages
                    .iter()
                    .any(|prefix| package_matches(package, prefix));
            included
                && !config
                    .exclude_class_packages
                    .iter()
                    .any(|prefix| package_matches(package, prefix))
        })
        .map(|handle| handle.qualified_name.clone())
        .collect()
}

/// A prefix accepts its own package and every subpackage.
fn package_matches(package: &str, prefix: &str) -> bool {
    package
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}
