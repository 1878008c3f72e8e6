//! Session persistence: the rule-set file round-trip and scan-report
//! loading.
//!
//! The rule-set file is read once at session start and written back on
//! explicit save. Its absence is not an error (the session starts
//! empty); malformed content is. The scan report is an external,
//! read-only collaborator and must be present.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WorkbenchError};
use crate::model::{ClassificationRule, RuleSet, ScanEntry, ScanReport};
use crate::utils::paths::normalize_separators;

/// On-disk layout of the persisted rule-set file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct SessionFile {
    #[serde(default)]
    bom: BomSection,
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct BomSection {
    #[serde(default)]
    include: Vec<ClassificationRule>,
    #[serde(default)]
    remove: Vec<ClassificationRule>,
    #[serde(default)]
    replace: Vec<ClassificationRule>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct SettingsSection {
    #[serde(default)]
    skip: SkipSection,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct SkipSection {
    #[serde(default)]
    patterns: PatternSection,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct PatternSection {
    #[serde(default)]
    scanning: Vec<String>,
}

/// Load the persisted rule set, or the empty set when no file exists.
pub fn load_rule_set(path: &Path) -> Result<RuleSet> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no rule-set file; starting empty");
            return Ok(RuleSet::default());
        }
        Err(err) => return Err(WorkbenchError::io(path, err)),
    };

    let file: SessionFile = serde_json::from_str(&content)
        .map_err(|e| WorkbenchError::read("rule set", path, e.to_string()))?;

    Ok(RuleSet {
        include: file.bom.include,
        remove: file.bom.remove,
        replace: file.bom.replace,
        skip_patterns: file
            .settings
            .skip
            .patterns
            .scanning
            .iter()
            .map(|p| normalize_separators(p))
            .collect(),
    })
}

/// Write the rule set back to disk in the persisted layout.
pub fn save_rule_set(path: &Path, rules: &RuleSet) -> Result<()> {
    let file = SessionFile {
        bom: BomSection {
            include: rules.include.clone(),
            remove: rules.remove.clone(),
            replace: rules.replace.clone(),
        },
        settings: SettingsSection {
            skip: SkipSection {
                patterns: PatternSection {
                    scanning: rules.skip_patterns.clone(),
                },
            },
        },
    };
    let json = serde_json::to_string_pretty(&file)
        .map_err(|e| WorkbenchError::read("rule set", path, e.to_string()))?;
    fs::write(path, json).map_err(|e| WorkbenchError::io(path, e))?;
    debug!(path = %path.display(), rules = rules.rule_count(), "saved rule set");
    Ok(())
}

/// Load the scanner's result file. Unlike the rule set, the report must
/// exist; no-match sentinel entries are dropped here.
pub fn load_scan_report(path: &Path) -> Result<ScanReport> {
    let content = fs::read_to_string(path).map_err(|e| WorkbenchError::io(path, e))?;
    let raw: IndexMap<String, Vec<ScanEntry>> = serde_json::from_str(&content)
        .map_err(|e| WorkbenchError::read("scan report", path, e.to_string()))?;
    let report = ScanReport::from_entries(
        raw.into_iter()
            .map(|(path, entries)| (normalize_separators(&path), entries))
            .collect(),
    );
    debug!(path = %path.display(), detections = report.len(), "loaded scan report");
    Ok(report)
}
