//! Source tree walking.
//!
//! Follows Jekyll's layout conventions:
//!
//! - entries starting with `.` or `_` are never pages
//! - `_<name>/` holds the documents of collection `<name>`
//! - only files opening with front matter become content units;
//!   everything else is a static file and ignored here. The first line is
//!   checked before a file is read in full
//! - `published: false` removes a file from the site
//!
//! Walk order is file-name order at every level, which makes provider order
//! deterministic across platforms.

use super::{Collection, ContentUnit, frontmatter};
use crate::{config::SiteSection, log};
use anyhow::{Context, Result};
use std::{
    ffi::OsStr,
    fs::{self, File},
    io::{BufRead, BufReader, Read},
    path::Path,
};
use walkdir::{DirEntry, WalkDir};

/// Longest first line inspected for a front matter opener.
const OPENER_MAX_LEN: u64 = 64;

/// Collect pages from the source tree.
pub fn load_pages(source: &Path, output: &Path, section: &SiteSection) -> Result<Vec<ContentUnit>> {
    let exclude = &section.exclude;
    let walker = WalkDir::new(source)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || is_page_entry(entry, output, exclude));

    let mut pages = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", source.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(page) = read_unit(entry.path(), source, None, section.toml_front_matter)? {
            pages.push(page);
        }
    }

    Ok(pages)
}

/// Collect the documents of one collection from `<source>/_<name>/`.
///
/// A missing directory yields an empty collection.
pub fn load_collection(source: &Path, name: &str, section: &SiteSection) -> Result<Collection> {
    let dir = source.join(format!("_{name}"));
    let mut docs = Vec::new();

    if dir.is_dir() {
        let walker = WalkDir::new(&dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(doc) = read_unit(entry.path(), source, Some(name), section.toml_front_matter)? {
                docs.push(doc);
            }
        }
    }

    Ok(Collection {
        name: name.to_owned(),
        docs,
    })
}

/// Whether a walked entry may contain or be a page.
fn is_page_entry(entry: &DirEntry, output: &Path, exclude: &[String]) -> bool {
    let name = entry.file_name();
    if is_hidden(name) || is_underscored(name) {
        return false;
    }
    if exclude.iter().any(|excluded| name == OsStr::new(excluded)) {
        return false;
    }
    entry.path() != output
}

#[inline]
fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

#[inline]
fn is_underscored(name: &OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('_'))
}

/// Whether the first line of the file at `path` opens a front matter block.
fn has_front_matter(path: &Path, toml: bool) -> Result<bool> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut head = Vec::new();
    BufReader::new(file)
        .take(OPENER_MAX_LEN)
        .read_until(b'\n', &mut head)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(frontmatter::opens_block(&head, toml))
}

/// Read one file into a content unit.
///
/// Returns `None` for static files (binary, or no front matter) and for
/// unpublished files.
fn read_unit(
    path: &Path,
    source: &Path,
    collection: Option<&str>,
    toml: bool,
) -> Result<Option<ContentUnit>> {
    if !has_front_matter(path, toml)? {
        return Ok(None);
    }

    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let Ok(text) = String::from_utf8(bytes) else {
        return Ok(None);
    };

    let relative = relative_path(path, source);
    let Some((front_matter, body)) = frontmatter::parse(&text, toml) else {
        return Ok(None);
    };

    let front_matter = front_matter.unwrap_or_else(|err| {
        log!("warn"; "{relative}: {err:#}, ignoring front matter");
        frontmatter::FrontMatter::default()
    });
    if !front_matter.published {
        return Ok(None);
    }

    let title = front_matter.title.as_deref();
    let unit = match collection {
        Some(name) => ContentUnit::doc(name, relative, title, Some(body)),
        None => ContentUnit::page(relative, title, Some(body)),
    };
    Ok(Some(unit))
}

/// Source-relative, `/`-separated path.
fn relative_path(path: &Path, source: &Path) -> String {
    let rel = path.strip_prefix(source).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
