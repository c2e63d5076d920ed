//! Aggregation of filtered units into the artifact text.
//!
//! # Format
//!
//! ```text
//! # Dalfox Full Documentation
//!
//! > This file contains the combined content of all Dalfox documentation pages for LLM context
//!
//!
//! ## Intro
//!
//! Hello
//!
//! ---
//!
//!
//! ## Ref (docs)
//!
//! See API
//!
//! ---
//!
//! ```
//!
//! Sections are collected into a list first and concatenated once in
//! [`Aggregation::render`]. Order is pages, then collections, then docs
//! within each collection, exactly as the provider yields them.

use super::filter::ContentFilter;
use crate::site::{ContentUnit, SiteModel};
use std::path::Path;

/// The two fixed lines at the top of the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    pub title: String,
    pub description: String,
}

/// Heading and body rendered for one included unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

impl Section {
    /// Derive the section of an included unit.
    pub fn from_unit(unit: &ContentUnit) -> Self {
        Self {
            heading: heading(unit),
            body: strip(unit.content.as_deref().unwrap_or_default()).to_owned(),
        }
    }

    fn render_into(&self, out: &mut String) {
        out.push_str("\n## ");
        out.push_str(&self.heading);
        out.push_str("\n\n");
        out.push_str(&self.body);
        out.push_str("\n\n---\n\n");
    }
}

/// Preamble plus ordered sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    preamble: Preamble,
    sections: Vec<Section>,
}

impl Aggregation {
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Concatenate preamble and sections into the artifact text.
    pub fn render(&self) -> String {
        let capacity = self
            .sections
            .iter()
            .map(|s| s.heading.len() + s.body.len() + 16)
            .sum::<usize>();
        let mut out = String::with_capacity(capacity + 256);

        out.push_str("# ");
        out.push_str(&self.preamble.title);
        out.push_str("\n\n> ");
        out.push_str(&self.preamble.description);
        out.push_str("\n\n");

        for section in &self.sections {
            section.render_into(&mut out);
        }
        out
    }
}

/// Aggregate every accepted unit of `site` in provider order.
pub fn aggregate(site: &impl SiteModel, filter: &ContentFilter, preamble: Preamble) -> Aggregation {
    let pages = site.pages().iter();
    let docs = site
        .collections()
        .iter()
        .filter(|collection| filter.accepts_collection(&collection.name))
        .flat_map(|collection| collection.docs.iter());

    let sections = pages
        .chain(docs)
        .filter(|unit| filter.accepts(unit))
        .map(Section::from_unit)
        .collect();

    Aggregation { preamble, sections }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Title if non-empty, else the capitalized file stem; collection suffixed.
fn heading(unit: &ContentUnit) -> String {
    let base = match unit.title.as_deref() {
        Some(title) if !title.is_empty() => title.to_owned(),
        _ => capitalize(file_stem(&unit.path)),
    };
    match &unit.collection {
        Some(collection) => format!("{base} ({collection})"),
        None => base,
    }
}

/// File name without its last extension.
fn file_stem(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Trim ASCII whitespace and NUL from both ends.
fn strip(s: &str) -> &str {
    s.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r' | '\0'))
}

// ============================================================================
// Tests
// ============================================================================
