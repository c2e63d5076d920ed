//! Front matter detection and parsing.
//!
//! A file is site content only when it opens with a front matter block:
//!
//! ```text
//! ---                      +++
//! title: Usage Guide       title = "Usage Guide"
//! ---                      +++
//! body...                  body...
//! ```
//!
//! YAML blocks may also close with `...`. TOML blocks are not part of Jekyll
//! and are only recognised when `[site].toml_front_matter` is on. Only the
//! keys the aggregation needs are read; everything else is ignored.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

/// Delimiter types for front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML front matter delimited by `---`.
    Yaml,
    /// TOML front matter delimited by `+++`.
    Toml,
}

impl Format {
    fn from_opening(line: &str, toml: bool) -> Option<Self> {
        match line {
            "---" => Some(Self::Yaml),
            "+++" if toml => Some(Self::Toml),
            _ => None,
        }
    }

    fn is_closing(self, line: &str) -> bool {
        match self {
            Self::Yaml => line == "---" || line == "...",
            Self::Toml => line == "+++",
        }
    }
}

/// Front matter keys relevant to aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FrontMatter {
    /// Page title; numbers and booleans are stringified.
    #[serde(default, deserialize_with = "scalar_string")]
    pub title: Option<String>,

    /// `published: false` drops the file from the site.
    #[serde(default = "published")]
    pub published: bool,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            published: true,
        }
    }
}

const fn published() -> bool {
    true
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(s) => s,
        Scalar::Integer(i) => i.to_string(),
        // Debug keeps the fractional part: 1.0 stays "1.0"
        Scalar::Float(f) => format!("{f:?}"),
        Scalar::Bool(b) => b.to_string(),
    }))
}

/// Format opened by `line`, the first line of a file including its newline.
fn opening(line: &str, toml: bool) -> Option<Format> {
    let line = line.strip_prefix('\u{feff}').unwrap_or(line);
    if !line.ends_with('\n') {
        return None;
    }
    Format::from_opening(line.trim_end(), toml)
}

/// Whether `head`, the first line of a file, opens a front matter block.
///
/// Lets callers skip reading static files in full.
pub fn opens_block(head: &[u8], toml: bool) -> bool {
    std::str::from_utf8(head).is_ok_and(|line| opening(line, toml).is_some())
}

/// Split content into format, raw front matter and body.
///
/// Returns `None` when the content does not open with a complete block.
pub fn split(content: &str, toml: bool) -> Option<(Format, &str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    let format = opening(first, toml)?;

    let start = first.len();
    let mut offset = start;
    for line in lines {
        if format.is_closing(line.trim_end()) {
            let raw = &content[start..offset];
            let body = &content[offset + line.len()..];
            return Some((format, raw, body));
        }
        offset += line.len();
    }

    None
}

/// Parse the front matter block of `content`.
///
/// `None` means the file has no front matter and is not site content. The
/// inner `Result` fails when the block exists but is malformed; the body is
/// still returned so the caller can decide.
pub fn parse(content: &str, toml: bool) -> Option<(Result<FrontMatter>, &str)> {
    let (format, raw, body) = split(content, toml)?;
    Some((deserialize(format, raw), body))
}

fn deserialize(format: Format, raw: &str) -> Result<FrontMatter> {
    let is_blank = raw
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'));
    if is_blank {
        return Ok(FrontMatter::default());
    }

    match format {
        Format::Yaml => serde_yaml::from_str(raw).context("invalid YAML front matter"),
        Format::Toml => toml::from_str(raw).context("invalid TOML front matter"),
    }
}
