//! Output-tree writing: per-type files, then per-directory barrels.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use super::render::OutputFile;
use crate::error::GenerateError;

/// Write every generated file under `output_dir`, then one `index.ts`
/// barrel per directory. Returns the number of barrels written.
///
/// The barrel pass runs strictly after every file write has completed and
/// groups over the complete output set, so a barrel is always complete on
/// the first pass.
pub(crate) fn write_output(
    files: &[OutputFile],
    output_dir: &Path,
    delete_before: bool,
) -> Result<usize, GenerateError> {
    if delete_before {
        clear_dir(output_dir)?;
    }
    fs::create_dir_all(output_dir).map_err(|source| GenerateError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    files.par_iter().try_for_each(|file| {
        let path = output_dir.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| GenerateError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        debug!(path = %path.display(), "writing generated file");
        fs::write(&path, &file.contents).map_err(|source| GenerateError::WriteFile {
            path: path.clone(),
            source,
        })
    })?;

    let mut by_dir: BTreeMap<PathBuf, BTreeSet<String>> = BTreeMap::new();
    for file in files {
        let dir = file.path.parent().map(Path::to_path_buf).unwrap_or_default();
        let Some(stem) = file.path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        by_dir.entry(dir).or_default().insert(stem.to_string());
    }

    let directories: Vec<(PathBuf, BTreeSet<String>)> = by_dir.into_iter().collect();
    directories.par_iter().try_for_each(|(dir, stems)| {
        let contents = stems
            .iter()
            .map(|stem| format!("export * from './{stem}'"))
            .collect::<Vec<_>>()
            .join("\n")
            + "\n";
        let path = output_dir.join(dir).join("index.ts");
        debug!(path = %path.display(), "writing index file");
        fs::write(&path, contents).map_err(|source| GenerateError::WriteFile {
            path: path.clone(),
            source,
        })
    })?;

    Ok(directories.len())
}

/// Remove the contents of `dir`, leaving the directory itself in place. A
/// missing directory is fine.
fn clear_dir(dir: &Path) -> Result<(), GenerateError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(GenerateError::Cleanup {
                path: dir.to_path_buf(),
                source,
            });
        }
    };
    for entry in entries {
        let entry = entry.map_err(|source| GenerateError::Cleanup {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        let removed = if is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|source| GenerateError::Cleanup { path, source })?;
    }
    Ok(())
}
