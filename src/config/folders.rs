//! Backup folder mappings.
//!
//! Each line of a folder list has the form `source[:dest]`. Relative sources
//! live under [`DEFAULT_ROOT`]; absolute ones are used as-is. A missing
//! destination mirrors the source.

use serde::{Deserialize, Serialize};

use super::DEFAULT_ROOT;

/// A single backup entry: device path to remote destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FolderMapping {
    /// Absolute path on the device.
    pub from: String,

    /// Destination path relative to the backup root.
    pub to: String,
}

impl FolderMapping {
    /// Parses one `source[:dest]` line.
    ///
    /// Fields after the second `:` are ignored.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut fields = line.trim().split(':');
        let source = fields.next().unwrap_or_default();
        let to = fields.next().filter(|dest| !dest.is_empty()).unwrap_or(source);

        let from = if source.starts_with('/') {
            source.to_owned()
        } else {
            format!("{DEFAULT_ROOT}{source}")
        };

        Self {
            from,
            to: to.to_owned(),
        }
    }
}

/// Parses a multi-line folder list, skipping blank lines. Order is kept.
#[must_use]
pub fn parse_folder_list(text: &str) -> Vec<FolderMapping> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(FolderMapping::parse)
        .collect()
}
