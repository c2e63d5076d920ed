//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Combine a static site into one llms-full.txt and place it in the build output
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Site source directory path (relative to project root)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Site output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file name (default: llms.toml)
    #[arg(short = 'C', long, default_value = "llms.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Stage the artifact, run the site build command, then finalize
    Build {
        /// Clean output directory completely before building
        #[arg(long)]
        clean: bool,

        /// Run the configured site build command between the two phases
        #[arg(long = "command", action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        run_command: Option<bool>,
    },

    /// Generate the artifact into the source tree and copy it to the output tree
    Stage,

    /// Move the staged artifact into the output tree
    Finalize,

    /// Print the generated artifact to stdout without writing anything
    Print,
}

#[allow(unused)]
impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
    pub const fn is_print(&self) -> bool {
        matches!(self.command, Commands::Print)
    }
}
