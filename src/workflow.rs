//! The filter mutation engine: applies reviewer decisions and keeps the
//! undo/redo history.
//!
//! Undo is a full replay: state is always `f(baseline, batches)`, never
//! the result of inverse operations. Undo resets the rule lists to the
//! session baseline and replays every remaining batch in order, which
//! keeps the correctness argument trivial at the cost of replay work.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::matcher::{classify, Classification};
use crate::model::{Batch, ClassificationDecision, RuleSet, ScanResult};
use crate::store::RuleStore;

/// Applies decision batches to the rule store and replays history.
pub struct WorkflowEngine {
    store: Arc<RuleStore>,
    /// Rule lists as they stood when the session began; the replay
    /// starting point.
    baseline: RuleSet,
    undo_stack: Vec<Batch>,
    redo_stack: Vec<Batch>,
}

impl WorkflowEngine {
    /// Create an engine over a session's rule store. The store's current
    /// contents become the replay baseline.
    #[must_use]
    pub fn new(store: Arc<RuleStore>) -> Self {
        let baseline = store.snapshot();
        Self {
            store,
            baseline,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// The shared store, for wiring into the tree builder.
    #[must_use]
    pub fn store(&self) -> &Arc<RuleStore> {
        &self.store
    }

    /// Classify a scanned result against the current rule lists.
    ///
    /// This is the read path: it takes the shared lock and never blocks
    /// on anything but in-flight list mutations.
    #[must_use]
    pub fn classify(&self, result: &ScanResult) -> Classification {
        self.store.with_rules(|rules| classify(result, rules))
    }

    /// Apply a batch of decisions as one undo/redo unit.
    ///
    /// Decisions fan out as independent units of work; every one runs to
    /// completion even when a sibling fails, and the first error in
    /// batch order is returned. A batch that fails midway is *not*
    /// rolled back — decisions that succeeded have already mutated the
    /// rule store. Callers needing atomicity must validate every
    /// decision before calling.
    ///
    /// On success the batch is pushed onto the undo stack and the redo
    /// stack is cleared.
    pub fn apply_batch(&mut self, batch: Batch) -> Result<()> {
        if batch.is_empty() {
            debug!("empty batch ignored");
            return Ok(());
        }
        debug!(decisions = batch.len(), "applying batch");
        Self::apply_decisions(&self.store, &batch)?;
        self.undo_stack.push(batch);
        self.redo_stack.clear();
        Ok(())
    }

    /// Undo the most recent batch by replaying everything else.
    ///
    /// No-op when there is nothing to undo.
    pub fn undo(&mut self) -> Result<()> {
        let Some(last) = self.undo_stack.pop() else {
            return Ok(());
        };
        self.redo_stack.push(last);
        debug!(remaining = self.undo_stack.len(), "undo: replaying history");

        self.store.reset_rules(&self.baseline);
        for batch in &self.undo_stack {
            Self::apply_decisions(&self.store, batch)?;
        }
        Ok(())
    }

    /// Re-apply the most recently undone batch.
    ///
    /// No-op when there is nothing to redo.
    pub fn redo(&mut self) -> Result<()> {
        let Some(batch) = self.redo_stack.pop() else {
            return Ok(());
        };
        debug!(decisions = batch.len(), "redo: re-applying batch");
        Self::apply_decisions(&self.store, &batch)?;
        self.undo_stack.push(batch);
        Ok(())
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Apply every decision of one batch concurrently.
    ///
    /// Errors are collected rather than cancelling siblings; the first
    /// one in batch order wins after all units finish.
    fn apply_decisions(store: &RuleStore, batch: &[ClassificationDecision]) -> Result<()> {
        let mut errors: Vec<_> = batch
            .par_iter()
            .filter_map(|decision| Self::apply_one(store, decision).err())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.remove(0))
        }
    }

    /// Validate one decision, evict colliding rules, insert the new rule.
    fn apply_one(store: &RuleStore, decision: &ClassificationDecision) -> Result<()> {
        decision.validate()?;
        store.evict_colliding(decision);
        store.insert(decision.action, decision.to_rule());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchType, RuleAction, WorkflowState};

    fn engine() -> WorkflowEngine {
        WorkflowEngine::new(Arc::new(RuleStore::default()))
    }

    fn decision(path: &str, purl: &str, action: RuleAction) -> ClassificationDecision {
        ClassificationDecision::new(path, purl, action)
    }

    fn scan_result(path: &str, purl: &str) -> ScanResult {
        ScanResult {
            path: path.to_string(),
            match_type: MatchType::File,
            purls: vec![purl.to_string()],
            component: "lib".to_string(),
        }
    }

    #[test]
    fn test_scenario_pending_then_completed() {
        let mut engine = engine();
        let result = scan_result("a/b.js", "pkg:npm/x");

        let before = engine.classify(&result);
        assert_eq!(before.workflow_state, WorkflowState::Pending);
        assert!(before.filter_config.is_none());

        engine
            .apply_batch(vec![decision("a/b.js", "pkg:npm/x", RuleAction::Include)])
            .expect("apply");

        let after = engine.classify(&result);
        assert_eq!(after.workflow_state, WorkflowState::Completed);
        let config = after.filter_config.expect("matched");
        assert_eq!(config.action, RuleAction::Include);
    }

    #[test]
    fn test_duplicate_exclusivity() {
        let mut engine = engine();
        engine
            .apply_batch(vec![decision("p", "x", RuleAction::Include)])
            .expect("apply include");
        engine
            .apply_batch(vec![decision("p", "x", RuleAction::Remove)])
            .expect("apply remove");

        let rules = engine.store().snapshot();
        assert!(rules.include.is_empty(), "include side must be evicted");
        assert_eq!(rules.remove.len(), 1);
        assert_eq!(rules.remove[0].purl.as_deref(), Some("x"));
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut engine = engine();
        let b1 = vec![decision("a.js", "pkg:npm/a", RuleAction::Include)];
        let b2 = vec![decision("b.js", "pkg:npm/b", RuleAction::Remove)];

        engine.apply_batch(b1).expect("b1");
        let after_b1 = engine.store().snapshot();
        engine.apply_batch(b2).expect("b2");
        let after_b2 = engine.store().snapshot();

        engine.undo().expect("undo b2");
        assert_eq!(engine.store().snapshot(), after_b1);
        engine.undo().expect("undo b1");
        assert_eq!(engine.store().snapshot(), RuleSet::default());
        assert!(!engine.can_undo());

        engine.redo().expect("redo b1");
        assert_eq!(engine.store().snapshot(), after_b1);
        engine.redo().expect("redo b2");
        assert_eq!(engine.store().snapshot(), after_b2);
        assert!(!engine.can_redo());
    }

    #[test]
    fn test_undo_replays_from_nonempty_baseline() {
        let baseline = RuleSet {
            include: vec![crate::model::ClassificationRule::for_purl("pkg:npm/seed")],
            ..Default::default()
        };
        let store = Arc::new(RuleStore::new(baseline.clone()));
        let mut engine = WorkflowEngine::new(Arc::clone(&store));

        engine
            .apply_batch(vec![decision("a.js", "pkg:npm/a", RuleAction::Remove)])
            .expect("apply");
        engine.undo().expect("undo");

        assert_eq!(store.snapshot(), baseline);
    }

    #[test]
    fn test_apply_clears_redo_stack() {
        let mut engine = engine();
        engine
            .apply_batch(vec![decision("a.js", "pkg:npm/a", RuleAction::Include)])
            .expect("apply");
        engine.undo().expect("undo");
        assert!(engine.can_redo());

        engine
            .apply_batch(vec![decision("b.js", "pkg:npm/b", RuleAction::Include)])
            .expect("apply");
        assert!(!engine.can_redo());
    }

    #[test]
    fn test_invalid_decision_reports_first_error() {
        let mut engine = engine();
        let batch = vec![
            decision("a.js", "pkg:npm/a", RuleAction::Include),
            decision("b.js", "", RuleAction::Include),
        ];
        let err = engine.apply_batch(batch).expect_err("must fail");
        assert!(err.to_string().contains("purl"), "got: {err}");
        // The failed batch is not undoable, and siblings were not
        // rolled back.
        assert!(!engine.can_undo());
        assert_eq!(engine.store().snapshot().include.len(), 1);
    }

    #[test]
    fn test_undo_redo_noop_when_empty() {
        let mut engine = engine();
        assert!(!engine.can_undo());
        assert!(!engine.can_redo());
        engine.undo().expect("noop undo");
        engine.redo().expect("noop redo");
    }

    #[test]
    fn test_large_batch_applies_all_decisions() {
        let mut engine = engine();
        let batch: Batch = (0..64)
            .map(|i| {
                decision(
                    &format!("src/file{i}.js"),
                    &format!("pkg:npm/dep{i}"),
                    RuleAction::Include,
                )
            })
            .collect();
        engine.apply_batch(batch).expect("apply");
        assert_eq!(engine.store().snapshot().include.len(), 64);
    }
}
