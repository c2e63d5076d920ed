//! Build orchestration.
//!
//! Drives the two artifact phases around the site's own build.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── clean_output()          (--clean / [build].clean)
//!     │
//!     ├── stage_artifact()
//!     │       │
//!     │       ├── Site::load()  → pages + collections
//!     │       ├── llms::generate() → Aggregation → blob
//!     │       └── ArtifactWriter::stage(blob)
//!     │           (write into source tree, copy into output tree)
//!     │
//!     ├── exec!([build].command)  (may rebuild or prune the output tree)
//!     │
//!     └── StagedArtifact::finalize()
//!             (move staged file over the output copy)
//! ```

use crate::{
    config::SiteConfig,
    exec,
    llms::{self, ArtifactLocation, ArtifactWriter, FinalizedArtifact, StagedArtifact, WriterState},
    log,
    site::Site,
};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Run both phases with the site build command in between.
///
/// If `config.build.clean` is true, clears the output directory first.
pub fn build_site(config: &SiteConfig) -> Result<FinalizedArtifact> {
    if config.build.clean {
        clean_output(&config.build.output, &config.build.source)?;
    }

    let staged = stage_artifact(config)?;

    if config.should_run_command() {
        run_site_command(config)?;
    }

    let finalized = staged.finalize()?;
    log_finalized(&finalized);

    Ok(finalized)
}

/// Generate the artifact, stage it in the source tree and copy it to the output tree.
pub fn stage_artifact(config: &SiteConfig) -> Result<StagedArtifact> {
    let site = Site::load(config)?;
    log!("site"; "loaded {} units from {}", site.unit_count(), config.build.source.display());

    let aggregation = llms::generate(config, &site)?;
    if aggregation.is_empty() {
        log!("warn"; "no content matched, artifact has only the preamble");
    } else {
        log!("llms"; "{} sections", aggregation.sections().len());
    }

    let writer = ArtifactWriter::new(llms::location(config, &site));
    let from = writer.state();
    let staged = writer.stage(&aggregation.render())?;
    log_staged(from, &staged);

    Ok(staged)
}

/// Move a previously staged artifact into the output tree.
pub fn finalize_artifact(config: &SiteConfig) -> Result<FinalizedArtifact> {
    let location = ArtifactLocation::new(
        &config.build.source,
        &config.build.output,
        &config.llms.filename,
    );
    let finalized = llms::finalize(location)?;
    log_finalized(&finalized);

    Ok(finalized)
}

/// Render the artifact without touching the filesystem.
pub fn render(config: &SiteConfig) -> Result<String> {
    let site = Site::load(config)?;
    Ok(llms::generate(config, &site)?.render())
}

/// Remove the output tree.
///
/// Refuses when the source tree lives inside it.
fn clean_output(output: &Path, source: &Path) -> Result<()> {
    if source.starts_with(output) {
        bail!(
            "Refusing to clean {}: it contains the source tree",
            output.display()
        );
    }
    if output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
        log!("build"; "cleaned {}", output.display());
    }
    Ok(())
}

fn run_site_command(config: &SiteConfig) -> Result<()> {
    let command = &config.build.command;
    log!("build"; "running `{}`", command.join(" "));
    exec!(config.get_root(); command;)
        .with_context(|| format!("[build.command] `{}` failed", command.join(" ")))?;
    Ok(())
}

fn log_staged(from: WriterState, staged: &StagedArtifact) {
    let location = staged.location();
    log!("llms"; "{from} -> {}: {}", staged.state(), location.staging.display());

    if let Some(err) = staged.copy_error() {
        log!(
            "warn";
            "{} not updated ({err}), artifact only in staging until finalize",
            location.destination.display()
        );
    }
}

fn log_finalized(finalized: &FinalizedArtifact) {
    let destination = &finalized.location().destination;
    match finalized.state() {
        WriterState::Finalized => {
            log!("build"; "{}: {}", WriterState::Finalized, destination.display());
        }
        state => {
            log!("warn"; "still {state}, {} may be stale or missing", destination.display());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const PREAMBLE: &str = "# Dalfox Full Documentation\n\n> This file contains the combined content of all Dalfox documentation pages for LLM context\n\n";

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Example site: one page, one excluded page, one doc, one post.
    fn example_site() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("docs");
        write(&source, "intro.md", "---\ntitle: Intro\n---\nHello\n");
        write(&source, "bad.html", "---\ntitle: Bad\n---\n<b>bad</b>\n");
        write(&source, "_docs/ref.md", "---\ntitle: Ref\n---\nSee API\n");
        write(&source, "_posts/2024-01-01-skip.md", "---\ntitle: Skip\n---\nskipped\n");

        let mut config = SiteConfig::from_str(
            r#"
            [base]
            title = "Dalfox"

            [site]
            collections = ["docs"]
        "#,
        )
        .unwrap();
        config.build.output = source.join("_site");
        config.build.source = source;
        (dir, config)
    }

    fn artifact(config: &SiteConfig) -> PathBuf {
        config.build.output.join("llms-full.txt")
    }

    fn staging(config: &SiteConfig) -> PathBuf {
        config.build.source.join("llms-full.txt")
    }

    #[test]
    fn test_render_example_site() {
        let (_dir, config) = example_site();

        let blob = render(&config).unwrap();

        let expected = format!(
            "{PREAMBLE}\n## Intro\n\nHello\n\n---\n\n\n## Ref (docs)\n\nSee API\n\n---\n\n"
        );
        assert_eq!(blob, expected);
    }

    #[test]
    fn test_build_site_places_artifact() {
        let (_dir, config) = example_site();

        let finalized = build_site(&config).unwrap();

        assert_eq!(finalized.state(), WriterState::Finalized);
        assert!(!staging(&config).exists());
        let written = fs::read_to_string(artifact(&config)).unwrap();
        assert_eq!(written, render(&config).unwrap());
    }

    #[test]
    fn test_stage_then_finalize() {
        let (_dir, config) = example_site();

        let staged = stage_artifact(&config).unwrap();
        assert!(staged.copy_error().is_none());
        assert!(staging(&config).exists());
        assert!(artifact(&config).exists());

        // Site build wipes the output tree in between
        fs::remove_dir_all(&config.build.output).unwrap();

        let finalized = finalize_artifact(&config).unwrap();
        assert_eq!(finalized.state(), WriterState::Finalized);
        assert!(!staging(&config).exists());
        assert!(fs::read_to_string(artifact(&config)).unwrap().contains("## Ref (docs)"));
    }

    #[test]
    fn test_stage_with_blocked_output_copy() {
        let (_dir, config) = example_site();
        // A directory where the artifact should be copied
        fs::create_dir_all(artifact(&config)).unwrap();

        let staged = stage_artifact(&config).unwrap();

        assert_eq!(staged.state(), WriterState::Staged);
        assert!(staged.copy_error().is_some());
        assert!(staging(&config).is_file());
    }

    #[test]
    fn test_finalize_without_stage() {
        let (_dir, config) = example_site();

        let finalized = finalize_artifact(&config).unwrap();

        assert_eq!(finalized.state(), WriterState::Staged);
        assert!(!artifact(&config).exists());
    }

    #[test]
    fn test_staged_file_is_not_a_page() {
        let (_dir, config) = example_site();

        stage_artifact(&config).unwrap();
        // Second run sees the leftover staging file in the source tree
        let blob = render(&config).unwrap();

        assert_eq!(blob.matches("\n## ").count(), 2);
    }

    #[test]
    fn test_build_site_clean() {
        let (_dir, mut config) = example_site();
        write(&config.build.output, "stale.html", "old");
        config.build.clean = true;

        build_site(&config).unwrap();

        assert!(!config.build.output.join("stale.html").exists());
        assert!(artifact(&config).exists());
    }

    #[test]
    fn test_clean_refuses_source_inside_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().to_path_buf();
        let source = output.join("docs");

        let err = clean_output(&output, &source).unwrap_err();

        assert!(format!("{err}").contains("contains the source tree"));
        assert!(output.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_build_site_survives_output_wipe_by_command() {
        let (_dir, mut config) = example_site();
        let output = config.build.output.to_str().unwrap().to_owned();
        config.build.command = vec!["rm".into(), "-rf".into(), output];

        build_site(&config).unwrap();

        assert!(!staging(&config).exists());
        assert!(fs::read_to_string(artifact(&config)).unwrap().starts_with(PREAMBLE));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_site_command_failure_keeps_staging() {
        let (_dir, mut config) = example_site();
        config.build.command = vec!["false".into()];

        let err = build_site(&config).unwrap_err();

        assert!(format!("{err:#}").contains("[build.command]"));
        assert!(staging(&config).exists());
    }
}
