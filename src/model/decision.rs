//! Reviewer decisions.
//!
//! A decision is one reviewer action against a scanned path/component;
//! a batch is an ordered list of decisions applied as a single
//! undo/redo unit.

use std::str::FromStr;

use packageurl::PackageUrl;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkbenchError};
use crate::model::rules::{ClassificationRule, RuleAction};

/// One reviewer action: classify a path/purl as include, remove, or
/// replace.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ClassificationDecision {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    pub purl: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_with: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    pub action: RuleAction,
}

/// An ordered group of decisions applied as one undo/redo unit.
pub type Batch = Vec<ClassificationDecision>;

impl ClassificationDecision {
    /// Shorthand for an include/remove decision on a path+purl pair.
    pub fn new(path: impl Into<String>, purl: impl Into<String>, action: RuleAction) -> Self {
        Self {
            path: Some(path.into()),
            purl: purl.into(),
            action,
            ..Self::default()
        }
    }

    /// Validate the decision before it is turned into a rule.
    ///
    /// Requires a non-empty purl and a `replace_with` target when the
    /// action is replace. A purl that does not parse as a package URL is
    /// accepted but logged, since rule matching only ever compares purls
    /// as strings. Callers that need batch atomicity should validate
    /// every decision up front; `apply_batch` does not roll back earlier
    /// siblings.
    pub fn validate(&self) -> Result<()> {
        if self.purl.trim().is_empty() {
            return Err(WorkbenchError::validation(format!(
                "decision for path {:?} has no purl",
                self.path.as_deref().unwrap_or("<none>")
            )));
        }
        if PackageUrl::from_str(&self.purl).is_err() {
            tracing::warn!(purl = %self.purl, "decision purl does not parse as a package URL");
        }
        if self.action == RuleAction::Replace {
            match self.replace_with.as_deref() {
                Some(target) if !target.trim().is_empty() => {}
                _ => {
                    return Err(WorkbenchError::validation(format!(
                        "replace decision for '{}' has no replacement purl",
                        self.purl
                    )));
                }
            }
        }
        Ok(())
    }

    /// The rule this decision inserts into its target list.
    #[must_use]
    pub fn to_rule(&self) -> ClassificationRule {
        ClassificationRule {
            path: self.path.clone(),
            purl: Some(self.purl.clone()),
            usage: self.usage.clone(),
            comment: self.comment.clone(),
            replace_with: self.replace_with.clone(),
            license: self.license.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_purl_rejected() {
        let decision = ClassificationDecision {
            purl: "  ".to_string(),
            action: RuleAction::Include,
            ..Default::default()
        };
        assert!(decision.validate().is_err());
    }

    #[test]
    fn test_malformed_purl_is_tolerated() {
        // Matching compares purls as opaque strings, so an odd purl is
        // logged but not rejected.
        let decision = ClassificationDecision::new("a/b.js", "not-a-purl", RuleAction::Include);
        assert!(decision.validate().is_ok());
    }

    #[test]
    fn test_replace_requires_target() {
        let mut decision =
            ClassificationDecision::new("a/b.js", "pkg:npm/leftpad", RuleAction::Replace);
        assert!(decision.validate().is_err());

        decision.replace_with = Some("pkg:npm/padded".to_string());
        assert!(decision.validate().is_ok());
    }

    #[test]
    fn test_valid_include_decision() {
        let decision = ClassificationDecision::new("a/b.js", "pkg:npm/lodash", RuleAction::Include);
        assert!(decision.validate().is_ok());

        let rule = decision.to_rule();
        assert_eq!(rule.path.as_deref(), Some("a/b.js"));
        assert_eq!(rule.purl.as_deref(), Some("pkg:npm/lodash"));
    }
}
