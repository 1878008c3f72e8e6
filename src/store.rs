//! The rule store: lock-guarded ownership of the session's [`RuleSet`].
//!
//! One store instance is created per review session and shared by `Arc`
//! into the workflow, skip, and tree engines; there is no ambient global
//! state. Writers hold the exclusive lock only for the duration of a
//! single list insert or removal, never for a whole batch, so decisions
//! fanning out concurrently interleave at list granularity. Readers
//! (classification, skip matching) take the shared lock.

use std::sync::{PoisonError, RwLock};

use crate::model::{ClassificationDecision, ClassificationRule, RuleAction, RuleSet};

/// Shared, lock-guarded rule state.
#[derive(Debug, Default)]
pub struct RuleStore {
    inner: RwLock<RuleSet>,
}

impl RuleStore {
    /// Create a store seeded with the rules loaded at session start.
    #[must_use]
    pub fn new(rules: RuleSet) -> Self {
        Self {
            inner: RwLock::new(rules),
        }
    }

    /// Run a closure against the current rule set under the read lock.
    pub fn with_rules<T>(&self, f: impl FnOnce(&RuleSet) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Clone the current rule set.
    #[must_use]
    pub fn snapshot(&self) -> RuleSet {
        self.with_rules(RuleSet::clone)
    }

    /// Remove, from every rule list, rules colliding with a decision.
    ///
    /// A rule collides when it carries the same purl: the same component
    /// must not end up simultaneously included and removed. Each list is
    /// swept under its own short exclusive lock; removal is idempotent,
    /// so concurrent decisions for the same purl are safe.
    pub fn evict_colliding(&self, decision: &ClassificationDecision) {
        for action in RuleAction::ALL {
            let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            guard
                .list_mut(action)
                .retain(|rule| rule.purl.as_deref() != Some(decision.purl.as_str()));
        }
    }

    /// Append a rule to the list for `action`.
    pub fn insert(&self, action: RuleAction, rule: ClassificationRule) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.list_mut(action).push(rule);
    }

    /// Reset the three rule lists to a baseline, leaving skip patterns
    /// untouched. Used by undo replay.
    pub fn reset_rules(&self, baseline: &RuleSet) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.include = baseline.include.clone();
        guard.remove = baseline.remove.clone();
        guard.replace = baseline.replace.clone();
    }

    /// The committed skip patterns.
    #[must_use]
    pub fn committed_patterns(&self) -> Vec<String> {
        self.with_rules(|rules| rules.skip_patterns.clone())
    }

    /// Replace the committed skip patterns. Used by skip-pattern commit.
    pub fn set_committed_patterns(&self, patterns: Vec<String>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.skip_patterns = patterns;
    }
}
