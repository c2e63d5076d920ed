//! Site configuration management for `llms.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                           |
//! |-------------|---------------------------------------------------|
//! | `[base]`    | Site title used by the preamble (required)        |
//! | `[build]`   | Source/output trees, clean, site build command    |
//! | `[site]`    | Collections and ignored entries of the source     |
//! | `[llms]`    | Artifact name, preamble, content filter           |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Dalfox"
//!
//! [build]
//! source = "docs"
//! output = "docs/_site"
//! command = ["bundle", "exec", "jekyll", "build"]
//!
//! [site]
//! collections = ["page", "advanced"]
//!
//! [llms]
//! skip_collections = ["posts"]
//! ```

mod base;
mod build;
pub mod defaults;
mod error;
mod llms;
mod site;

pub use llms::LlmsConfig;
pub use site::SiteSection;

use base::BaseConfig;
use build::BuildConfig;
use error::ConfigError;

use crate::cli::{Cli, Commands};
use anyhow::{Context, Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing llms.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information (required)
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Source tree layout
    #[serde(default)]
    pub site: SiteSection,

    /// Artifact settings
    #[serde(default)]
    pub llms: LlmsConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let root = cli
            .root
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.get_root().to_owned());

        self.update_path_with_root(&root, cli);

        if let Commands::Build { clean, .. } = &cli.command {
            self.build.clean |= *clean;
        }
    }

    /// Whether the site build command should run between the two phases.
    ///
    /// `--command=false` disables a configured command; without one it is a no-op.
    pub fn should_run_command(&self) -> bool {
        let requested = match self.cli.map(|cli| &cli.command) {
            Some(Commands::Build { run_command, .. }) => run_command.unwrap_or(true),
            _ => true,
        };
        requested && !self.build.command.is_empty()
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path, cli: &Cli) {
        // Apply CLI overrides first
        Self::update_option(&mut self.build.source, cli.source.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());

        // Normalize root to absolute path
        let root = Self::normalize_path(&Self::expand_tilde(root));
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(&cli.config));
        self.build.source = Self::normalize_path(&root.join(Self::expand_tilde(&self.build.source)));
        self.build.output = Self::normalize_path(&root.join(Self::expand_tilde(&self.build.output)));
    }

    /// Expand a leading `~` to the home directory.
    fn expand_tilde(path: &Path) -> PathBuf {
        match path.to_str() {
            Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
            None => path.to_path_buf(),
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if !self.config_path.exists() {
            bail!("Config file not found");
        }

        if self.base.title.trim().is_empty() {
            bail!(ConfigError::Validation("[base.title] must not be empty".into()));
        }

        Self::check_filename(&self.llms.filename)?;

        let source = &self.build.source;
        if !source.exists() {
            bail!(ConfigError::Validation(format!(
                "[build.source] not found: {}",
                source.display()
            )));
        }
        if !source.is_dir() {
            bail!(ConfigError::Validation(
                "[build.source] is not a directory".into()
            ));
        }

        if self.build.output == *source {
            bail!(ConfigError::Validation(
                "[build.output] must differ from [build.source]".into()
            ));
        }

        if !self.build.command.is_empty() {
            Self::check_command_installed("[build.command]", &self.build.command)?;
        }

        Ok(())
    }

    /// The artifact name must be a bare file name.
    fn check_filename(filename: &str) -> Result<()> {
        let path = Path::new(filename);
        let is_bare = path.file_name().is_some_and(|name| name == path.as_os_str());
        if filename.is_empty() || !is_bare {
            bail!(ConfigError::Validation(format!(
                "[llms.filename] must be a plain file name, got `{filename}`"
            )));
        }
        Ok(())
    }

    /// Check if a command is installed and available
    fn check_command_installed(field: &str, command: &[String]) -> Result<()> {
        let cmd = &command[0];
        which::which(cmd)
            .with_context(|| format!("{field}: `{cmd}` not found. Please install it first."))?;

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn leak_cli(args: &[&str]) -> &'static Cli {
        use clap::Parser;
        Box::leak(Box::new(Cli::parse_from(args)))
    }

    fn write_config(dir: &Path, content: &str) {
        fs::write(dir.join("llms.toml"), content).unwrap();
    }

    #[test]
    fn test_from_str() {
        let config = SiteConfig::from_str(
            r#"
            [base]
            title = "Dalfox"

            [site]
            collections = ["page"]
        "#,
        )
        .unwrap();

        assert_eq!(config.base.title, "Dalfox");
        assert_eq!(config.site.collections, vec!["page"]);
        assert_eq!(config.llms.filename, "llms-full.txt");
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = SiteConfig::from_str(
            r#"
            [base
            title = "Dalfox"
        "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_path_missing() {
        let err = SiteConfig::from_path(Path::new("/nonexistent/llms.toml")).unwrap_err();
        assert!(format!("{err}").contains("IO error"));
    }

    #[test]
    fn test_get_root_default() {
        let config = SiteConfig::default();
        assert_eq!(config.get_root(), Path::new("./"));
    }

    #[test]
    fn test_set_root() {
        let mut config = SiteConfig::default();
        config.set_root(Path::new("/custom/path"));
        assert_eq!(config.get_root(), Path::new("/custom/path"));
    }

    #[test]
    fn test_unknown_top_level_field_rejection() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
            [base]
            title = "Test"

            [serve]
            port = 4000
        "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_update_with_cli_resolves_paths() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir(root.join("docs")).unwrap();

        let cli = leak_cli(&[
            "llms-full",
            "-r",
            root.to_str().unwrap(),
            "-s",
            "docs",
            "-o",
            "docs/_site",
            "stage",
        ]);
        let mut config = SiteConfig::default();
        config.update_with_cli(cli);

        assert_eq!(config.get_root(), root.as_path());
        assert_eq!(config.build.source, root.join("docs"));
        assert_eq!(config.build.output, root.join("docs/_site"));
        assert_eq!(config.config_path, root.join("llms.toml"));
    }

    #[test]
    fn test_update_with_cli_clean_flag() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();

        let mut config = SiteConfig::default();
        config.update_with_cli(leak_cli(&["llms-full", "-r", root, "build", "--clean"]));
        assert!(config.build.clean);

        let mut config = SiteConfig::default();
        config.update_with_cli(leak_cli(&["llms-full", "-r", root, "stage"]));
        assert!(!config.build.clean);
    }

    #[test]
    fn test_should_run_command() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();

        let mut config = SiteConfig::default();
        config.update_with_cli(leak_cli(&["llms-full", "-r", root, "build"]));
        assert!(!config.should_run_command(), "no command configured");

        config.build.command = vec!["jekyll".into(), "build".into()];
        assert!(config.should_run_command());

        let mut config = SiteConfig::default();
        config.build.command = vec!["jekyll".into()];
        config.update_with_cli(leak_cli(&["llms-full", "-r", root, "build", "--command=false"]));
        assert!(!config.should_run_command());
    }

    #[test]
    fn test_validate_ok() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "[base]\ntitle = \"Test\"\n");
        let root = dir.path().to_str().unwrap();

        let mut config = SiteConfig::from_path(&dir.path().join("llms.toml")).unwrap();
        config.update_with_cli(leak_cli(&["llms-full", "-r", root, "stage"]));

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_source() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "[base]\ntitle = \"Test\"\n[build]\nsource = \"missing\"\n");
        let root = dir.path().to_str().unwrap();

        let mut config = SiteConfig::from_path(&dir.path().join("llms.toml")).unwrap();
        config.update_with_cli(leak_cli(&["llms-full", "-r", root, "stage"]));

        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("[build.source] not found"));
    }

    #[test]
    fn test_validate_same_source_and_output() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "[base]\ntitle = \"Test\"\n[build]\noutput = \".\"\n");
        let root = dir.path().to_str().unwrap();

        let mut config = SiteConfig::from_path(&dir.path().join("llms.toml")).unwrap();
        config.update_with_cli(leak_cli(&["llms-full", "-r", root, "stage"]));

        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("must differ"));
    }

    #[test]
    fn test_validate_blank_title() {
        for title in ["", "   "] {
            let dir = TempDir::new().unwrap();
            write_config(dir.path(), &format!("[base]\ntitle = \"{title}\"\n"));
            let root = dir.path().to_str().unwrap();

            let mut config = SiteConfig::from_path(&dir.path().join("llms.toml")).unwrap();
            config.update_with_cli(leak_cli(&["llms-full", "-r", root, "stage"]));

            let err = config.validate().unwrap_err();
            assert!(format!("{err}").contains("[base.title]"), "title `{title}`");
        }
    }

    #[test]
    fn test_from_str_missing_base() {
        let err = SiteConfig::from_str("[llms]\nfilename = \"llms-full.txt\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("base"));
    }

    #[test]
    fn test_check_filename() {
        assert!(SiteConfig::check_filename("llms-full.txt").is_ok());
        assert!(SiteConfig::check_filename("").is_err());
        assert!(SiteConfig::check_filename("nested/llms.txt").is_err());
        assert!(SiteConfig::check_filename("..").is_err());
    }

    #[test]
    fn test_check_command_not_installed() {
        let command = vec!["definitely-not-a-real-command-4242".to_string()];
        assert!(SiteConfig::check_command_installed("[build.command]", &command).is_err());
    }
}
