//! Classification rules and the rule-set container.
//!
//! A rule states that a path and/or component identifier should be
//! included in, removed from, or replaced in the bill of materials.
//! Rules live in three ordered lists; order within a list has no matching
//! significance but is preserved for persistence stability.

use serde::{Deserialize, Serialize};

/// The reviewer action a rule encodes, doubling as the target rule list.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    /// Keep the component in the BOM.
    #[default]
    Include,
    /// Drop the component from the BOM.
    Remove,
    /// Substitute the component with `replace_with`.
    Replace,
}

impl RuleAction {
    /// All actions, in list-precedence order (include → remove → replace).
    pub const ALL: [Self; 3] = [Self::Include, Self::Remove, Self::Replace];
}

impl std::fmt::Display for RuleAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Include => write!(f, "include"),
            Self::Remove => write!(f, "remove"),
            Self::Replace => write!(f, "replace"),
        }
    }
}

/// How a winning rule constrained the match.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    /// The rule's path is a folder prefix (ends in a separator).
    ByFolder,
    /// The rule pinned both an exact file path and a purl.
    ByFile,
    /// The rule constrained only the purl.
    ByPurl,
}

/// A single user-authored classification rule.
///
/// A rule with neither `path` nor `purl` matches nothing. A `path` ending
/// in `/` is a folder rule (prefix match); otherwise it is a file rule
/// (exact match). `replace_with` is only meaningful on the replace list.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ClassificationRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_with: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl ClassificationRule {
    /// Create a rule constraining only the purl.
    pub fn for_purl(purl: impl Into<String>) -> Self {
        Self {
            purl: Some(purl.into()),
            ..Self::default()
        }
    }

    /// Create a rule constraining only the path.
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Whether the rule's path denotes a folder (trailing separator).
    #[must_use]
    pub fn is_folder_rule(&self) -> bool {
        self.path
            .as_deref()
            .is_some_and(|p| p.ends_with('/') || p.ends_with('\\'))
    }

    /// The kind reported for this rule when it wins a match.
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        if self.is_folder_rule() {
            RuleKind::ByFolder
        } else if self.path.is_some() && self.purl.is_some() {
            RuleKind::ByFile
        } else {
            RuleKind::ByPurl
        }
    }

    /// Whether the rule can match anything at all.
    #[must_use]
    pub fn is_constrained(&self) -> bool {
        self.path.is_some() || self.purl.is_some()
    }
}

/// The three ordered rule lists plus the committed skip patterns.
///
/// Owned by the workflow and skip engines through a
/// [`RuleStore`](crate::store::RuleStore); never mutated directly by
/// callers.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RuleSet {
    #[serde(default)]
    pub include: Vec<ClassificationRule>,

    #[serde(default)]
    pub remove: Vec<ClassificationRule>,

    #[serde(default)]
    pub replace: Vec<ClassificationRule>,

    /// Committed skip patterns, normalized to forward slashes.
    #[serde(default)]
    pub skip_patterns: Vec<String>,
}

impl RuleSet {
    /// The rule list for a given action.
    #[must_use]
    pub fn list(&self, action: RuleAction) -> &Vec<ClassificationRule> {
        match action {
            RuleAction::Include => &self.include,
            RuleAction::Remove => &self.remove,
            RuleAction::Replace => &self.replace,
        }
    }

    /// Mutable access to the rule list for a given action.
    pub fn list_mut(&mut self, action: RuleAction) -> &mut Vec<ClassificationRule> {
        match action {
            RuleAction::Include => &mut self.include,
            RuleAction::Remove => &mut self.remove,
            RuleAction::Replace => &mut self.replace,
        }
    }

    /// Check if no rules or skip patterns are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include.is_empty()
            && self.remove.is_empty()
            && self.replace.is_empty()
            && self.skip_patterns.is_empty()
    }

    /// Total number of rules across the three lists.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.include.len() + self.remove.len() + self.replace.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_rule_detection() {
        assert!(ClassificationRule::for_path("src/vendor/").is_folder_rule());
        assert!(ClassificationRule::for_path("src\\vendor\\").is_folder_rule());
        assert!(!ClassificationRule::for_path("src/vendor/lib.js").is_folder_rule());
        assert!(!ClassificationRule::for_purl("pkg:npm/lodash").is_folder_rule());
    }

    #[test]
    fn test_rule_kind() {
        assert_eq!(
            ClassificationRule::for_path("src/").kind(),
            RuleKind::ByFolder
        );
        let both = ClassificationRule {
            path: Some("src/file.js".into()),
            purl: Some("pkg:npm/lodash".into()),
            ..Default::default()
        };
        assert_eq!(both.kind(), RuleKind::ByFile);
        assert_eq!(
            ClassificationRule::for_purl("pkg:npm/lodash").kind(),
            RuleKind::ByPurl
        );
    }

    #[test]
    fn test_unconstrained_rule() {
        assert!(!ClassificationRule::default().is_constrained());
        assert!(ClassificationRule::for_purl("pkg:npm/x").is_constrained());
    }

    #[test]
    fn test_list_access_by_action() {
        let mut set = RuleSet::default();
        set.list_mut(RuleAction::Remove)
            .push(ClassificationRule::for_purl("pkg:npm/x"));
        assert_eq!(set.list(RuleAction::Remove).len(), 1);
        assert!(set.list(RuleAction::Include).is_empty());
        assert_eq!(set.rule_count(), 1);
    }
}
