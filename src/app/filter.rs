//! Extension-based link classification
//!
//! A hyperlink is a download candidate when the extension of the last segment
//! of its path is in the allow-list. Query strings and fragments are ignored.
//! Classification never fails: anything that cannot be parsed is rejected.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// How file extensions are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionMatching {
    /// `zip` and `ZIP` are different extensions
    #[default]
    CaseSensitive,
    /// Extensions are compared after lowercasing
    CaseInsensitive,
}

impl ExtensionMatching {
    /// Normalize an extension or filename for comparison
    pub fn normalize(self, value: &str) -> String {
        match self {
            ExtensionMatching::CaseSensitive => value.to_string(),
            ExtensionMatching::CaseInsensitive => value.to_lowercase(),
        }
    }
}

/// Strip query string and fragment, keeping only the path portion of a link
pub fn path_portion(link: &str) -> &str {
    let end = link.find(['?', '#']).unwrap_or(link.len());
    &link[..end]
}

/// Last path segment of a link, as written (not decoded)
///
/// Both `/` and `\` count as separators.
pub fn bare_filename(link: &str) -> &str {
    let path = path_portion(link);
    match path.rfind(['/', '\\']) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Extension of a link's final path segment, without the dot
///
/// Returns `None` for empty links and for names with no `.`.
pub fn extension_of(link: &str) -> Option<&str> {
    let name = bare_filename(link);
    name.rsplit_once('.').map(|(_, ext)| ext)
}

/// Replace the extension of a bare filename
///
/// Names without an extension get one appended.
pub fn replace_extension(name: &str, extension: &str) -> String {
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    format!("{}.{}", stem, extension)
}

/// Classifies hyperlinks as download candidates
#[derive(Debug, Clone)]
pub struct LinkFilter {
    formats: HashSet<String>,
    matching: ExtensionMatching,
}

impl LinkFilter {
    /// Create a filter from the configured download formats
    pub fn new<I, S>(formats: I, matching: ExtensionMatching) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let formats = formats
            .into_iter()
            .map(|f| matching.normalize(f.as_ref()))
            .collect();
        Self { formats, matching }
    }

    /// Whether the link should be considered for download
    pub fn is_candidate(&self, link: &str) -> bool {
        if link.is_empty() {
            return false;
        }

        match extension_of(link) {
            Some(ext) => self.formats.contains(&self.matching.normalize(ext)),
            None => false,
        }
    }
}
