//! `[site]` section configuration.
//!
//! Describes how the source tree is read: which collections exist and which
//! entries are ignored.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in llms.toml.
///
/// # Example
/// ```toml
/// [site]
/// collections = ["docs", "guides"]   # loaded from `_docs/`, `_guides/`
/// exclude = ["node_modules", "vendor"]
/// toml_front_matter = false          # also accept `+++` blocks
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Collections besides `posts`, in load order.
    #[serde(default = "defaults::site::collections")]
    #[educe(Default = defaults::site::collections())]
    pub collections: Vec<String>,

    /// Entry names skipped while walking the source tree.
    #[serde(default = "defaults::site::exclude")]
    #[educe(Default = defaults::site::exclude())]
    pub exclude: Vec<String>,

    /// Treat files opening with `+++` TOML front matter as content.
    /// Jekyll itself only knows YAML and serves these as static files.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub toml_front_matter: bool,
}

impl SiteSection {
    /// All collection names in load order: `posts` first, then configured ones.
    pub fn collection_names(&self) -> Vec<&str> {
        let mut names = vec![defaults::site::POSTS];
        for name in &self.collections {
            if !names.contains(&name.as_str()) {
                names.push(name.as_str());
            }
        }
        names
    }
}
