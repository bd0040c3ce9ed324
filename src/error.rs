//! Error types for the generation pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal generation failures.
///
/// Everything recoverable — unresolvable classifiers, types the enumerator
/// failed to materialize, inapplicable override rules — is logged and
/// recovered locally during the run; only output-write failures abort it.
/// Partial output is not rolled back.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no output path configured; set `outputPath` or pass --output")]
    MissingOutputPath,

    #[error("failed to clear output directory {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
