//! llms-full - Combine a static site into one LLM context file.

mod build;
mod cli;
mod config;
mod llms;
mod logger;
mod site;
mod utils;

use anyhow::{Result, bail};
use build::{build_site, finalize_artifact, render, stage_artifact};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use std::{
    io::{Write, stdout},
    path::Path,
};

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Build { .. } => build_site(config).map(|_| ()),
        Commands::Stage => stage_artifact(config).map(|_| ()),
        Commands::Finalize => finalize_artifact(config).map(|_| ()),
        Commands::Print => {
            let blob = render(config)?;
            let mut out = stdout().lock();
            out.write_all(blob.as_bytes())?;
            out.flush()?;
            Ok(())
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    if !config_path.exists() {
        bail!("Config file not found: {}", config_path.display());
    }

    let mut config = SiteConfig::from_path(&config_path)?;
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}
