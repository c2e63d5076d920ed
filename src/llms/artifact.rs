//! Dual-path artifact writer.
//!
//! The output tree may be cleared or rebuilt between generating the artifact
//! and the end of the build. The artifact is therefore written twice:
//!
//! ```text
//! ArtifactWriter ──stage(blob)──► StagedArtifact ──finalize()──► FinalizedArtifact
//!   NotStarted                      Staged                         Finalized
//!                                     │                              │
//!         write <source>/llms-full.txt┤                              │
//!   copy  → <output>/llms-full.txt   ─┘      move <source>/… → <output>/…
//! ```
//!
//! The copy made while staging may be wiped by the rest of the build; the
//! move made while finalizing wins and removes the staging file from the
//! source tree. If the build stops in between, the staging file stays behind
//! and is overwritten by the next run.

use super::error::ArtifactError;
use crate::{log, site::SiteModel};
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

/// Fixed staging and destination paths for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLocation {
    /// Inside the source tree.
    pub staging: PathBuf,
    /// Inside the output tree.
    pub destination: PathBuf,
}

impl ArtifactLocation {
    pub fn new(source_root: &Path, output_root: &Path, filename: &str) -> Self {
        Self {
            staging: source_root.join(filename),
            destination: output_root.join(filename),
        }
    }

    pub fn for_site(site: &impl SiteModel, filename: &str) -> Self {
        Self::new(site.source_root(), site.output_root(), filename)
    }
}

/// Lifecycle position of the artifact within one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    NotStarted,
    Staged,
    Finalized,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotStarted => "not started",
            Self::Staged => "staged",
            Self::Finalized => "finalized",
        })
    }
}

// ============================================================================
// NotStarted
// ============================================================================

/// Writer that has not touched the filesystem yet.
#[derive(Debug)]
pub struct ArtifactWriter {
    location: ArtifactLocation,
}

impl ArtifactWriter {
    pub fn new(location: ArtifactLocation) -> Self {
        Self { location }
    }

    pub const fn state(&self) -> WriterState {
        WriterState::NotStarted
    }

    /// Write `blob` to the staging path and copy it into the output tree.
    ///
    /// Failing to create the output directory or to write the staging file
    /// is fatal. A failed copy is logged and recorded, nothing more.
    pub fn stage(self, blob: &str) -> Result<StagedArtifact, ArtifactError> {
        let ArtifactLocation {
            staging,
            destination,
        } = &self.location;

        ensure_parent(destination)?;

        fs::write(staging, blob).map_err(|err| ArtifactError::WriteStaging(staging.clone(), err))?;

        let copy_error = match fs::copy(staging, destination) {
            Ok(_) => None,
            Err(source) => {
                let err = ArtifactError::Copy {
                    from: staging.clone(),
                    to: destination.clone(),
                    source,
                };
                log!("error"; "{err}: {}", err_source(&err));
                Some(err)
            }
        };

        Ok(StagedArtifact {
            location: self.location,
            copy_error,
        })
    }
}

// ============================================================================
// Staged
// ============================================================================

/// Artifact present in the source tree, and in the output tree unless the
/// copy failed.
#[derive(Debug)]
pub struct StagedArtifact {
    location: ArtifactLocation,
    copy_error: Option<ArtifactError>,
}

impl StagedArtifact {
    pub fn location(&self) -> &ArtifactLocation {
        &self.location
    }

    pub const fn state(&self) -> WriterState {
        WriterState::Staged
    }

    /// Why the output tree did not receive its copy while staging.
    pub fn copy_error(&self) -> Option<&ArtifactError> {
        self.copy_error.as_ref()
    }

    /// Move the staged file into the output tree.
    pub fn finalize(self) -> Result<FinalizedArtifact, ArtifactError> {
        finalize(self.location)
    }
}

// ============================================================================
// Finalized
// ============================================================================

/// What finalizing did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FinalizeOutcome {
    /// Staging file moved over the destination.
    Moved,
    /// No staging file; destination left untouched.
    MissingStaging,
}

/// Result of the finalize phase.
#[derive(Debug)]
pub struct FinalizedArtifact {
    location: ArtifactLocation,
    outcome: FinalizeOutcome,
}

impl FinalizedArtifact {
    pub fn location(&self) -> &ArtifactLocation {
        &self.location
    }

    /// `Staged` when there was nothing to move.
    pub const fn state(&self) -> WriterState {
        match self.outcome {
            FinalizeOutcome::Moved => WriterState::Finalized,
            FinalizeOutcome::MissingStaging => WriterState::Staged,
        }
    }
}

/// Move the staging file at `location` into the output tree.
///
/// Usable on its own when staging happened in an earlier process. A missing
/// staging file is a warning, not an error. The destination's parent is
/// recreated if the output tree was removed after staging.
pub fn finalize(location: ArtifactLocation) -> Result<FinalizedArtifact, ArtifactError> {
    if !location.staging.is_file() {
        log!("warn"; "cannot find staging file: {}", location.staging.display());
        return Ok(FinalizedArtifact {
            location,
            outcome: FinalizeOutcome::MissingStaging,
        });
    }

    ensure_parent(&location.destination)?;
    move_file(&location.staging, &location.destination).map_err(|source| ArtifactError::Move {
        from: location.staging.clone(),
        to: location.destination.clone(),
        source,
    })?;

    Ok(FinalizedArtifact {
        location,
        outcome: FinalizeOutcome::Moved,
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

fn ensure_parent(path: &Path) -> Result<(), ArtifactError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|err| ArtifactError::CreateDir(parent.to_path_buf(), err)),
        _ => Ok(()),
    }
}

/// Rename, falling back to copy + remove across filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        result => result,
    }
}

fn err_source(err: &ArtifactError) -> String {
    std::error::Error::source(err)
        .map(ToString::to_string)
        .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================
