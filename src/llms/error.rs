//! Artifact writer error types.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while placing the artifact.
///
/// `CreateDir`, `WriteStaging` and `Move` abort the build. `Copy` is only
/// recorded on the staged artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to create output directory `{0}`")]
    CreateDir(PathBuf, #[source] std::io::Error),

    #[error("failed to write staging file `{0}`")]
    WriteStaging(PathBuf, #[source] std::io::Error),

    #[error("failed to copy `{from}` to `{to}`")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move `{from}` to `{to}`")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
