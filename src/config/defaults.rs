//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn source() -> PathBuf {
        ".".into()
    }

    pub fn output() -> PathBuf {
        "_site".into()
    }

    pub fn command() -> Vec<String> {
        Vec::new()
    }
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    /// Jekyll's implicit collection, always loaded first.
    pub const POSTS: &str = "posts";

    pub fn collections() -> Vec<String> {
        Vec::new()
    }

    pub fn exclude() -> Vec<String> {
        ["node_modules", "vendor", "Gemfile", "Gemfile.lock"]
            .into_iter()
            .map(Into::into)
            .collect()
    }
}

// ============================================================================
// [llms] Section Defaults
// ============================================================================

pub mod llms {
    pub fn filename() -> String {
        "llms-full.txt".into()
    }

    pub fn title() -> Option<String> {
        None
    }

    pub fn description() -> Option<String> {
        None
    }

    pub fn skip_collections() -> Vec<String> {
        vec![super::site::POSTS.into()]
    }

    pub fn exclude_extensions() -> Vec<String> {
        ["xml", "json", "html", "txt", "js", "css", "scss", "yaml", "yml"]
            .into_iter()
            .map(Into::into)
            .collect()
    }

    pub fn reserved_names() -> Vec<String> {
        ["index", "index.html", "llms.txt", "llms-full.txt"]
            .into_iter()
            .map(Into::into)
            .collect()
    }
}
