//! Download selection against the local inventory
//!
//! A candidate is skipped when a file with the same stem and any of the
//! configured check extensions already exists somewhere under the inventory
//! root. Check extensions are tried in order and the first hit wins.

use std::borrow::Cow;

use tracing::debug;

use crate::app::filter::{bare_filename, replace_extension};
use crate::app::inventory::InventoryIndex;
use crate::errors::InventoryResult;

/// Outcome of checking one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// No local equivalent exists
    Needed,
    /// A local equivalent was found under this filename
    Skip { existing: String },
}

impl Selection {
    pub fn is_needed(&self) -> bool {
        matches!(self, Selection::Needed)
    }
}

/// Percent-decode a link; invalid UTF-8 sequences are replaced
pub fn decode_link(link: &str) -> Cow<'_, str> {
    match urlencoding::decode(link) {
        Ok(decoded) => decoded,
        Err(_) => {
            let bytes = urlencoding::decode_binary(link.as_bytes());
            Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// Decides whether candidates need downloading
#[derive(Debug)]
pub struct DownloadSelector<'a> {
    inventory: &'a InventoryIndex,
    check_formats: &'a [String],
}

impl<'a> DownloadSelector<'a> {
    pub fn new(inventory: &'a InventoryIndex, check_formats: &'a [String]) -> Self {
        Self {
            inventory,
            check_formats,
        }
    }

    /// Local filenames probed for `candidate`, in check order
    pub fn probe_names(&self, candidate: &str) -> Vec<String> {
        // Separators are located before decoding so %2F stays part of the name
        let decoded = decode_link(bare_filename(candidate));
        self.check_formats
            .iter()
            .map(|ext| replace_extension(&decoded, ext))
            .collect()
    }

    /// Check a candidate against the inventory
    pub async fn select(&self, candidate: &str) -> InventoryResult<Selection> {
        for name in self.probe_names(candidate) {
            if self.inventory.exists(&name).await? {
                debug!("Skipping {}: found local {}", candidate, name);
                return Ok(Selection::Skip { existing: name });
            }
        }

        debug!("Need download: {}", candidate);
        Ok(Selection::Needed)
    }
}
