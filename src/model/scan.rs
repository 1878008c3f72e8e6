//! Scan-result model.
//!
//! The scanner output is an external, read-only collaborator: a mapping
//! from file path to an ordered list of detected matches. Entries whose
//! match type is the "no match" sentinel are dropped before
//! classification ever sees them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// What kind of detection the scanner reported for a file.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// The whole file matched a known component.
    File,
    /// Only a snippet of the file matched.
    Snippet,
    /// Sentinel: the scanner looked but found nothing.
    #[default]
    None,
}

impl MatchType {
    /// Whether this entry carries an actual detection.
    #[must_use]
    pub fn is_match(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// One raw entry in the scan-report file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ScanEntry {
    /// Match type; the scanner calls this field `id`.
    #[serde(default, rename = "id")]
    pub match_type: MatchType,

    /// Detected component identifiers, most likely first.
    #[serde(default)]
    pub purl: Vec<String>,

    /// Detected component name.
    #[serde(default)]
    pub component: String,
}

/// One detected match for a path, as the classification engine sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Path relative to the scan root, forward-slash form.
    pub path: String,
    pub match_type: MatchType,
    /// Ordered component identifiers; the first is primary.
    pub purls: Vec<String>,
    pub component: String,
}

impl ScanResult {
    /// The primary (first-listed) purl, if the scanner reported any.
    #[must_use]
    pub fn primary_purl(&self) -> Option<&str> {
        self.purls.first().map(String::as_str)
    }
}

/// The parsed scan report: path → detections, in file order.
///
/// No-match sentinel entries are filtered out at load time, so every
/// entry held here is a real detection.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    entries: IndexMap<String, Vec<ScanEntry>>,
}

impl ScanReport {
    /// Build a report from raw parsed entries, dropping no-match
    /// sentinels and paths left with no detections.
    #[must_use]
    pub fn from_entries(raw: IndexMap<String, Vec<ScanEntry>>) -> Self {
        let entries = raw
            .into_iter()
            .filter_map(|(path, matches)| {
                let kept: Vec<ScanEntry> = matches
                    .into_iter()
                    .filter(|m| m.match_type.is_match())
                    .collect();
                if kept.is_empty() {
                    None
                } else {
                    Some((path, kept))
                }
            })
            .collect();
        Self { entries }
    }

    /// The primary detection for a path, as a [`ScanResult`].
    #[must_use]
    pub fn result_for(&self, path: &str) -> Option<ScanResult> {
        let matches = self.entries.get(path)?;
        let first = matches.first()?;
        Some(ScanResult {
            path: path.to_string(),
            match_type: first.match_type,
            purls: first.purl.clone(),
            component: first.component.clone(),
        })
    }

    /// Whether the report has any detection for the given path.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of paths with at least one detection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(path, detections)` in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ScanEntry])> {
        self.entries.iter().map(|(p, m)| (p.as_str(), m.as_slice()))
    }
}
