//! `%INCLUDE` directive scanner.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;

use crate::core::HeaderReference;

/// Karel line comment marker.
pub const COMMENT_MARKER: &str = "--";

static INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*%INCLUDE\s+(\S+)").expect("valid include regex"));

/// Scanner over the include directives of one source text.
///
/// Iterating is lazy and can be repeated; each call to [`iter`](Self::iter)
/// starts again from the first line.
#[derive(Debug, Clone, Copy)]
pub struct IncludeScanner<'a> {
    source: &'a str,
}

impl<'a> IncludeScanner<'a> {
    pub fn new(source: &'a str) -> Self {
        IncludeScanner { source }
    }

    /// Iterate over the header references in textual order.
    pub fn iter(&self) -> Includes<'a> {
        Includes {
            lines: self.source.lines(),
        }
    }
}

impl<'a> IntoIterator for IncludeScanner<'a> {
    type Item = HeaderReference;
    type IntoIter = Includes<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`IncludeScanner::iter`].
#[derive(Debug, Clone)]
pub struct Includes<'a> {
    lines: std::str::Lines<'a>,
}

impl Iterator for Includes<'_> {
    type Item = HeaderReference;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.by_ref().find_map(include_on_line)
    }
}

/// Extract the header reference from a single line, if it holds one.
fn include_on_line(line: &str) -> Option<HeaderReference> {
    if line.trim_start().starts_with(COMMENT_MARKER) {
        return None;
    }
    INCLUDE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| HeaderReference::new(m.as_str()))
}

/// Collect the header references of a source text.
pub fn scan_includes(source: &str) -> Vec<HeaderReference> {
    IncludeScanner::new(source).iter().collect()
}

/// Read a source file and collect its header references.
pub fn scan_file(path: &Path) -> Result<Vec<HeaderReference>> {
    let source = crate::util::fs::read_to_string_lossy(path)?;
    Ok(scan_includes(&source))
}
