//! Artifact generation: filter, aggregate, write.
//!
//! # Pipeline
//!
//! ```text
//! SiteModel ──► ContentFilter::accepts() ──► aggregate() ──► Aggregation::render()
//!                                                                   │
//!                         ArtifactWriter::stage() ◄─────────────────┘
//!                                   │
//!                         StagedArtifact::finalize()
//! ```

mod aggregate;
mod artifact;
mod error;
mod filter;

pub use aggregate::{Aggregation, Preamble, aggregate};
pub use artifact::{
    ArtifactLocation, ArtifactWriter, FinalizedArtifact, StagedArtifact, WriterState, finalize,
};
pub use filter::ContentFilter;

use crate::{config::SiteConfig, site::SiteModel};
use anyhow::Result;

/// Aggregate `site` using the filter and preamble from `config`.
pub fn generate(config: &SiteConfig, site: &impl SiteModel) -> Result<Aggregation> {
    let filter = ContentFilter::from_config(&config.llms)?;
    Ok(aggregate(site, &filter, preamble(config)))
}

/// Artifact paths for `site` under the configured file name.
pub fn location(config: &SiteConfig, site: &impl SiteModel) -> ArtifactLocation {
    ArtifactLocation::for_site(site, &config.llms.filename)
}

fn preamble(config: &SiteConfig) -> Preamble {
    let site_title = &config.base.title;
    Preamble {
        title: config.llms.preamble_title(site_title),
        description: config.llms.preamble_description(site_title),
    }
}
