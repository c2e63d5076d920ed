//! `[llms]` section configuration.
//!
//! Controls the artifact name, its preamble, and the content filter.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[llms]` section in llms.toml.
///
/// # Example
/// ```toml
/// [llms]
/// filename = "llms-full.txt"
/// skip_collections = ["posts", "drafts"]
/// exclude_extensions = ["xml", "json", "html"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct LlmsConfig {
    /// Artifact file name, used for both the staging and destination copy.
    #[serde(default = "defaults::llms::filename")]
    #[educe(Default = defaults::llms::filename())]
    pub filename: String,

    /// Preamble title. Defaults to `{base.title} Full Documentation`.
    #[serde(default = "defaults::llms::title")]
    #[educe(Default = defaults::llms::title())]
    pub title: Option<String>,

    /// Preamble description line.
    #[serde(default = "defaults::llms::description")]
    #[educe(Default = defaults::llms::description())]
    pub description: Option<String>,

    /// Collections never included.
    #[serde(default = "defaults::llms::skip_collections")]
    #[educe(Default = defaults::llms::skip_collections())]
    pub skip_collections: Vec<String>,

    /// Path extensions (without the dot) never included.
    #[serde(default = "defaults::llms::exclude_extensions")]
    #[educe(Default = defaults::llms::exclude_extensions())]
    pub exclude_extensions: Vec<String>,

    /// File names never included (site index, generated artifacts).
    #[serde(default = "defaults::llms::reserved_names")]
    #[educe(Default = defaults::llms::reserved_names())]
    pub reserved_names: Vec<String>,
}

impl LlmsConfig {
    /// Preamble title line, falling back to the site title.
    pub fn preamble_title(&self, site_title: &str) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("{site_title} Full Documentation"))
    }

    /// Preamble description line, falling back to the site title.
    pub fn preamble_description(&self, site_title: &str) -> String {
        self.description.clone().unwrap_or_else(|| {
            format!(
                "This file contains the combined content of all {site_title} documentation pages for LLM context"
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_llms_config_defaults() {
        let config = LlmsConfig::default();

        assert_eq!(config.filename, "llms-full.txt");
        assert_eq!(config.skip_collections, vec!["posts"]);
        assert_eq!(config.exclude_extensions.len(), 9);
        assert!(config.reserved_names.contains(&"index".to_string()));
        assert!(config.reserved_names.contains(&"llms.txt".to_string()));
    }

    #[test]
    fn test_preamble_fallbacks() {
        let config = LlmsConfig::default();

        assert_eq!(config.preamble_title("Dalfox"), "Dalfox Full Documentation");
        assert_eq!(
            config.preamble_description("Dalfox"),
            "This file contains the combined content of all Dalfox documentation pages for LLM context"
        );
    }

    #[test]
    fn test_preamble_overrides() {
        let config: SiteConfig = toml::from_str(
            r#"
            [base]
            title = "Dalfox"

            [llms]
            title = "Dalfox for LLMs"
            description = "Everything in one file"
        "#,
        )
        .unwrap();

        assert_eq!(config.llms.preamble_title("ignored"), "Dalfox for LLMs");
        assert_eq!(
            config.llms.preamble_description("ignored"),
            "Everything in one file"
        );
    }

    #[test]
    fn test_llms_filter_lists() {
        let config: SiteConfig = toml::from_str(
            r#"
            [base]
            title = "Test"

            [llms]
            filename = "context.txt"
            skip_collections = []
            exclude_extensions = ["xml"]
            reserved_names = ["404.md"]
        "#,
        )
        .unwrap();

        assert_eq!(config.llms.filename, "context.txt");
        assert!(config.llms.skip_collections.is_empty());
        assert_eq!(config.llms.exclude_extensions, vec!["xml"]);
        assert_eq!(config.llms.reserved_names, vec!["404.md"]);
    }

    #[test]
    fn test_unknown_field_rejection() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
            [base]
            title = "Test"

            [llms]
            enable = true
        "#,
        );
        assert!(result.is_err());
    }
}
