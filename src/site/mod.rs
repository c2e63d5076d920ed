//! Site model: pages and collections of a static site source tree.
//!
//! # Architecture
//!
//! ```text
//! Site::load(config)
//!     │
//!     ├── loader::load_pages()        → Vec<ContentUnit>   (file-name order)
//!     └── loader::load_collection()   → Collection         (posts, then [site].collections)
//!                 │
//!                 └── frontmatter::split()  → (title, published, body)
//! ```
//!
//! Consumers only see the [`SiteModel`] trait, so tests and other providers
//! can hand in sites built in memory.

pub mod frontmatter;
mod loader;

use crate::config::SiteConfig;
use anyhow::Result;
use std::path::{Path, PathBuf};

// ============================================================================
// Content Units
// ============================================================================

/// One inclusion candidate: a page or a collection document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUnit {
    /// Path relative to the source root, `/`-separated.
    pub path: String,
    /// File name of `path`, extension included.
    pub name: String,
    /// `title` from front matter.
    pub title: Option<String>,
    /// Text after the front matter block.
    pub content: Option<String>,
    /// Owning collection, `None` for pages.
    pub collection: Option<String>,
}

impl ContentUnit {
    /// Create a page unit.
    pub fn page(path: impl Into<String>, title: Option<&str>, content: Option<&str>) -> Self {
        let path = path.into();
        Self {
            name: file_name(&path).to_owned(),
            path,
            title: title.map(str::to_owned),
            content: content.map(str::to_owned),
            collection: None,
        }
    }

    /// Create a document unit belonging to `collection`.
    pub fn doc(
        collection: &str,
        path: impl Into<String>,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Self {
        Self {
            collection: Some(collection.to_owned()),
            ..Self::page(path, title, content)
        }
    }
}

/// Last `/`-separated component of a path.
fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Named, ordered group of documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
    pub docs: Vec<ContentUnit>,
}

// ============================================================================
// Provider Interface
// ============================================================================

/// Read-only view of a site, in provider order.
pub trait SiteModel {
    /// Pages in provider order.
    fn pages(&self) -> &[ContentUnit];
    /// Collections in provider order, each with ordered docs.
    fn collections(&self) -> &[Collection];
    /// Absolute source tree root.
    fn source_root(&self) -> &Path;
    /// Absolute output tree root.
    fn output_root(&self) -> &Path;
}

/// A site loaded from disk (or built in memory).
#[derive(Debug, Clone, Default)]
pub struct Site {
    pub source: PathBuf,
    pub output: PathBuf,
    pub pages: Vec<ContentUnit>,
    pub collections: Vec<Collection>,
}

impl Site {
    /// Load pages and collections from `[build].source`.
    pub fn load(config: &SiteConfig) -> Result<Self> {
        let source = config.build.source.clone();
        let output = config.build.output.clone();

        let pages = loader::load_pages(&source, &output, &config.site)?;
        let collections = config
            .site
            .collection_names()
            .into_iter()
            .map(|name| loader::load_collection(&source, name, &config.site))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source,
            output,
            pages,
            collections,
        })
    }

    /// Total number of units across pages and collections.
    pub fn unit_count(&self) -> usize {
        self.pages.len() + self.collections.iter().map(|c| c.docs.len()).sum::<usize>()
    }
}

impl SiteModel for Site {
    fn pages(&self) -> &[ContentUnit] {
        &self.pages
    }

    fn collections(&self) -> &[Collection] {
        &self.collections
    }

    fn source_root(&self) -> &Path {
        &self.source
    }

    fn output_root(&self) -> &Path {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_unit() {
        let unit = ContentUnit::page("docs/usage.md", Some("Usage Guide"), Some("body"));

        assert_eq!(unit.name, "usage.md");
        assert_eq!(unit.title.as_deref(), Some("Usage Guide"));
        assert_eq!(unit.content.as_deref(), Some("body"));
        assert_eq!(unit.collection, None);
    }

    #[test]
    fn test_doc_unit() {
        let unit = ContentUnit::doc("guides", "_guides/setup.md", Some("Setup"), None);

        assert_eq!(unit.name, "setup.md");
        assert_eq!(unit.collection.as_deref(), Some("guides"));
        assert_eq!(unit.content, None);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("a/b/c.md"), "c.md");
        assert_eq!(file_name("c.md"), "c.md");
        assert_eq!(file_name("index"), "index");
    }

    #[test]
    fn test_unit_count() {
        let site = Site {
            pages: vec![ContentUnit::page("a.md", None, None)],
            collections: vec![Collection {
                name: "docs".into(),
                docs: vec![
                    ContentUnit::doc("docs", "_docs/b.md", None, None),
                    ContentUnit::doc("docs", "_docs/c.md", None, None),
                ],
            }],
            ..Site::default()
        };

        assert_eq!(site.unit_count(), 3);
    }
}
