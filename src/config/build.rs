//! `[build]` section configuration.
//!
//! Contains the site trees and the surrounding site build command.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in llms.toml - build lifecycle configuration.
///
/// # Example
/// ```toml
/// [build]
/// source = "docs"                             # Site source tree
/// output = "docs/_site"                       # Site output tree
/// command = ["bundle", "exec", "jekyll", "build"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Site source tree. The artifact is staged here.
    #[serde(default = "defaults::build::source")]
    #[educe(Default = defaults::build::source())]
    pub source: PathBuf,

    /// Site output tree. The artifact ends up here.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Clear output directory before each build.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,

    /// Site build command, run between staging and finalizing.
    ///
    /// It may rebuild or prune the output tree; the staged artifact survives that.
    #[serde(default = "defaults::build::command")]
    #[educe(Default = defaults::build::command())]
    pub command: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================
