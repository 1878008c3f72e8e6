//! Integration tests for rule matching and the decision workflow.

use std::sync::Arc;

use bom_workbench::{
    classify, resolve, ClassificationDecision, ClassificationRule, MatchType, RuleAction, RuleKind,
    RuleSet, RuleStore, ScanResult, WorkflowEngine, WorkflowState,
};

fn result(path: &str, purls: &[&str]) -> ScanResult {
    ScanResult {
        path: path.to_string(),
        match_type: MatchType::File,
        purls: purls.iter().map(ToString::to_string).collect(),
        component: "lib".to_string(),
    }
}

fn rule(path: Option<&str>, purl: Option<&str>) -> ClassificationRule {
    ClassificationRule {
        path: path.map(ToString::to_string),
        purl: purl.map(ToString::to_string),
        ..Default::default()
    }
}

// ============================================================================
// Priority ordering
// ============================================================================

#[test]
fn test_path_and_purl_rule_wins_over_purl_and_path_rules() {
    let rules = vec![
        rule(Some("src/file.js"), Some("pkg:npm/lodash")),
        rule(None, Some("pkg:npm/lodash")),
        rule(Some("src/"), None),
    ];
    let winner = resolve(&result("src/file.js", &["pkg:npm/lodash"]), &rules)
        .expect("all three rules match");
    assert_eq!(winner.rule, &rules[0]);
    assert_eq!(winner.score, 4);
}

#[test]
fn test_longer_path_wins_among_folder_rules() {
    let rules = vec![rule(Some("src/"), None), rule(Some("src/vendor/"), None)];
    let winner = resolve(&result("src/vendor/lib.js", &[]), &rules).expect("both match");
    assert_eq!(winner.rule.path.as_deref(), Some("src/vendor/"));
}

#[test]
fn test_folder_rule_containment_boundaries() {
    let rules = vec![rule(Some("src/vendor/"), None)];
    assert!(resolve(&result("src/vendor/lib.js", &[]), &rules).is_some());
    assert!(resolve(&result("src/vendor/deep/nested/file.js", &[]), &rules).is_some());
    assert!(resolve(&result("src/vendorlib/file.js", &[]), &rules).is_none());
    assert!(resolve(&result("lib/vendor/file.js", &[]), &rules).is_none());
}

// ============================================================================
// Classification scenario
// ============================================================================

#[test]
fn test_empty_rules_then_include_decision() {
    let store = Arc::new(RuleStore::default());
    let mut engine = WorkflowEngine::new(Arc::clone(&store));
    let scanned = result("a/b.js", &["pkg:npm/x"]);

    let before = engine.classify(&scanned);
    assert_eq!(before.workflow_state, WorkflowState::Pending);
    assert!(before.filter_config.is_none());

    engine
        .apply_batch(vec![ClassificationDecision::new(
            "a/b.js",
            "pkg:npm/x",
            RuleAction::Include,
        )])
        .expect("apply");

    let after = engine.classify(&scanned);
    assert_eq!(after.workflow_state, WorkflowState::Completed);
    let config = after.filter_config.expect("rule matched");
    assert_eq!(config.action, RuleAction::Include);
    assert_eq!(config.kind, RuleKind::ByFile);
}

#[test]
fn test_folder_decision_reports_by_folder_kind() {
    let rules = RuleSet {
        remove: vec![rule(Some("src/vendor/"), None)],
        ..Default::default()
    };
    let classification = classify(&result("src/vendor/lib.js", &[]), &rules);
    let config = classification.filter_config.expect("matched");
    assert_eq!(config.kind, RuleKind::ByFolder);
}

// ============================================================================
// Undo/redo replay
// ============================================================================

#[test]
fn test_undo_redo_round_trip_is_field_exact() {
    let store = Arc::new(RuleStore::default());
    let mut engine = WorkflowEngine::new(Arc::clone(&store));

    let b1 = vec![ClassificationDecision::new(
        "src/a.js",
        "pkg:npm/a",
        RuleAction::Include,
    )];
    let mut replace = ClassificationDecision::new("src/b.js", "pkg:npm/b", RuleAction::Replace);
    replace.replace_with = Some("pkg:npm/b-fixed".to_string());
    replace.license = Some("Apache-2.0".to_string());
    let b2 = vec![replace];

    engine.apply_batch(b1).expect("b1");
    let state_b1 = store.snapshot();
    engine.apply_batch(b2).expect("b2");
    let state_b2 = store.snapshot();

    engine.undo().expect("undo");
    engine.undo().expect("undo");
    assert_eq!(store.snapshot(), RuleSet::default());

    engine.redo().expect("redo");
    assert_eq!(store.snapshot(), state_b1);
    engine.redo().expect("redo");
    assert_eq!(store.snapshot(), state_b2);
}

#[test]
fn test_include_then_remove_is_exclusive() {
    let store = Arc::new(RuleStore::default());
    let mut engine = WorkflowEngine::new(Arc::clone(&store));

    engine
        .apply_batch(vec![ClassificationDecision::new("p", "x", RuleAction::Include)])
        .expect("include");
    engine
        .apply_batch(vec![ClassificationDecision::new("p", "x", RuleAction::Remove)])
        .expect("remove");

    let rules = store.snapshot();
    assert!(rules.include.is_empty());
    assert_eq!(rules.remove.len(), 1);
}

#[test]
fn test_replayed_history_restores_eviction_effects() {
    // Undoing past an eviction must bring the evicted rule back.
    let store = Arc::new(RuleStore::default());
    let mut engine = WorkflowEngine::new(Arc::clone(&store));

    engine
        .apply_batch(vec![ClassificationDecision::new("p", "x", RuleAction::Include)])
        .expect("include");
    engine
        .apply_batch(vec![ClassificationDecision::new("p", "x", RuleAction::Remove)])
        .expect("remove");

    engine.undo().expect("undo remove");
    let rules = store.snapshot();
    assert_eq!(rules.include.len(), 1);
    assert!(rules.remove.is_empty());
}

#[test]
fn test_can_undo_can_redo_track_stacks() {
    let store = Arc::new(RuleStore::default());
    let mut engine = WorkflowEngine::new(store);
    assert!(!engine.can_undo());

    engine
        .apply_batch(vec![ClassificationDecision::new(
            "a.js",
            "pkg:npm/a",
            RuleAction::Include,
        )])
        .expect("apply");
    assert!(engine.can_undo());
    assert!(!engine.can_redo());

    engine.undo().expect("undo");
    assert!(!engine.can_undo());
    assert!(engine.can_redo());
}
