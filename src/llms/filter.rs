//! Inclusion predicate for content units.
//!
//! One value decides for pages and collection documents alike. A unit is
//! excluded when any of these hold:
//!
//! | Rule              | Example                                   |
//! |-------------------|-------------------------------------------|
//! | excluded suffix   | `feed.xml`, `assets/main.scss`            |
//! | reserved name     | `index`, `llms-full.txt`                  |
//! | empty content     | `None`, `Some("")` (not trimmed)          |
//! | skipped collection| any doc of `posts`                        |

use crate::{config::LlmsConfig, site::ContentUnit};
use anyhow::{Context, Result};
use regex::Regex;

/// Declarative content filter.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    /// `\.(?:xml|json|...)$`, `None` when no extension is excluded.
    excluded_suffix: Option<Regex>,
    reserved_names: Vec<String>,
    skip_collections: Vec<String>,
}

impl ContentFilter {
    pub fn new(
        exclude_extensions: &[String],
        reserved_names: Vec<String>,
        skip_collections: Vec<String>,
    ) -> Result<Self> {
        let excluded_suffix = if exclude_extensions.is_empty() {
            None
        } else {
            let alternatives = exclude_extensions
                .iter()
                .map(|ext| regex::escape(ext.trim_start_matches('.')))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = format!(r"\.(?:{alternatives})$");
            Some(Regex::new(&pattern).with_context(|| format!("Invalid suffix pattern `{pattern}`"))?)
        };

        Ok(Self {
            excluded_suffix,
            reserved_names,
            skip_collections,
        })
    }

    /// Build the filter from `[llms]`. The artifact name is always reserved.
    pub fn from_config(config: &LlmsConfig) -> Result<Self> {
        let mut reserved = config.reserved_names.clone();
        if !reserved.contains(&config.filename) {
            reserved.push(config.filename.clone());
        }
        Self::new(
            &config.exclude_extensions,
            reserved,
            config.skip_collections.clone(),
        )
    }

    /// Whether `unit` belongs in the artifact.
    pub fn accepts(&self, unit: &ContentUnit) -> bool {
        if unit
            .collection
            .as_deref()
            .is_some_and(|name| !self.accepts_collection(name))
        {
            return false;
        }
        !self.has_excluded_suffix(&unit.path)
            && !self.is_reserved(&unit.name)
            && unit.content.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Whether documents of collection `name` may be included at all.
    pub fn accepts_collection(&self, name: &str) -> bool {
        !self.skip_collections.iter().any(|skipped| skipped == name)
    }

    #[inline]
    fn has_excluded_suffix(&self, path: &str) -> bool {
        self.excluded_suffix
            .as_ref()
            .is_some_and(|re| re.is_match(path))
    }

    #[inline]
    fn is_reserved(&self, name: &str) -> bool {
        self.reserved_names.iter().any(|reserved| reserved == name)
    }
}

// ============================================================================
// Tests
// ============================================================================
