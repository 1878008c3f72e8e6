//! Rule matching and result classification.
//!
//! `resolve` decides which rule in one list wins for a scanned result;
//! `classify` runs all three lists and reports the workflow state plus
//! the winning rule's action and kind. Priority: a rule constraining
//! both path and purl beats a purl-only rule beats a path-only rule;
//! among equal scores the longer rule path wins (the more specific
//! folder or file over a shorter-prefix ancestor).

use serde::Serialize;
use tracing::warn;

use crate::model::{ClassificationRule, RuleAction, RuleKind, RuleSet, ScanResult, WorkflowState};
use crate::utils::paths::normalize_separators;

/// Priority score of a path+purl match.
pub const SCORE_PATH_AND_PURL: u8 = 4;
/// Priority score of a purl-only match.
pub const SCORE_PURL: u8 = 2;
/// Priority score of a path-only match (file or folder).
pub const SCORE_PATH: u8 = 1;

/// A winning rule and the priority score it matched with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub rule: &'a ClassificationRule,
    pub score: u8,
}

/// The action and constraint kind of the rule that classified a result.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    pub action: RuleAction,
    #[serde(rename = "type")]
    pub kind: RuleKind,
}

/// Outcome of classifying one scanned result.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub workflow_state: WorkflowState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_config: Option<FilterConfig>,
}

impl Classification {
    /// The no-rule-matched outcome.
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            workflow_state: WorkflowState::Pending,
            filter_config: None,
        }
    }
}

/// Whether a rule's path constraint holds for a result path.
///
/// Both sides are compared in forward-slash form. A folder rule (path
/// ending in a separator) matches any result under that prefix; a file
/// rule requires exact equality, so `src/vendor/` contains
/// `src/vendor/lib.js` but not `src/vendorlib/file.js`.
fn path_matches(rule: &ClassificationRule, result_path: &str) -> bool {
    let Some(rule_path) = rule.path.as_deref() else {
        return false;
    };
    let rule_path = normalize_separators(rule_path);
    if rule.is_folder_rule() {
        // The trailing separator is part of the prefix, which is what
        // rules out sibling folders sharing the name as a prefix.
        result_path.starts_with(&rule_path)
    } else {
        result_path == rule_path
    }
}

/// Whether a rule's purl constraint holds: the rule purl must appear in
/// the result's purl list.
fn purl_matches(rule: &ClassificationRule, result: &ScanResult) -> bool {
    rule.purl
        .as_deref()
        .is_some_and(|purl| result.purls.iter().any(|p| p == purl))
}

/// Score one rule against one result. `None` when the rule does not
/// apply, including when only one of two stated constraints holds.
fn score(rule: &ClassificationRule, result: &ScanResult, result_path: &str) -> Option<u8> {
    if !rule.is_constrained() {
        return None;
    }
    match (rule.path.is_some(), rule.purl.is_some()) {
        (true, true) => (path_matches(rule, result_path) && purl_matches(rule, result))
            .then_some(SCORE_PATH_AND_PURL),
        (false, true) => purl_matches(rule, result).then_some(SCORE_PURL),
        (true, false) => path_matches(rule, result_path).then_some(SCORE_PATH),
        (false, false) => None,
    }
}

/// Find the winning rule for a result within one rule list.
///
/// Candidates are ranked by priority score, then by rule-path length so
/// the most specific folder or file rule beats a shorter ancestor
/// prefix.
#[must_use]
pub fn resolve<'a>(result: &ScanResult, rules: &'a [ClassificationRule]) -> Option<RuleMatch<'a>> {
    let result_path = normalize_separators(&result.path);
    let mut best: Option<(RuleMatch<'a>, usize)> = None;
    for rule in rules {
        let Some(rule_score) = score(rule, result, &result_path) else {
            continue;
        };
        let path_len = rule.path.as_deref().map_or(0, str::len);
        let better = match &best {
            None => true,
            Some((current, current_len)) => {
                rule_score > current.score
                    || (rule_score == current.score && path_len > *current_len)
            }
        };
        if better {
            best = Some((
                RuleMatch {
                    rule,
                    score: rule_score,
                },
                path_len,
            ));
        }
    }
    best.map(|(found, _)| found)
}

/// Classify a result against all three rule lists.
///
/// List precedence include → remove → replace decides the reported
/// action when more than one list matches; that situation means the rule
/// lists were authored inconsistently, so it is logged rather than
/// silently masked.
#[must_use]
pub fn classify(result: &ScanResult, rules: &RuleSet) -> Classification {
    let mut winner: Option<FilterConfig> = None;
    let mut extra_lists: Vec<RuleAction> = Vec::new();

    for action in RuleAction::ALL {
        if let Some(found) = resolve(result, rules.list(action)) {
            if winner.is_none() {
                winner = Some(FilterConfig {
                    action,
                    kind: found.rule.kind(),
                });
            } else {
                extra_lists.push(action);
            }
        }
    }

    if !extra_lists.is_empty() {
        warn!(
            path = %result.path,
            lists = ?extra_lists,
            "result matched more than one rule list; keeping first in precedence order"
        );
    }

    match winner {
        Some(config) => Classification {
            workflow_state: WorkflowState::Completed,
            filter_config: Some(config),
        },
        None => Classification::pending(),
    }
}
