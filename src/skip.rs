//! Skip-pattern staging: propose, withdraw, commit, or discard the
//! patterns that exclude paths from future scans.
//!
//! Patterns are normalized to forward-slash form on ingestion, and
//! candidate paths are normalized again on lookup, so matching behaves
//! identically whether callers pass native-OS or already-normalized
//! paths. Matching is shell-glob style: `*` is a wildcard and a trailing
//! separator means "this folder and anything under it". Globs are
//! compiled to anchored regexes whenever the effective set changes, so
//! lookups during a tree build never recompile.

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, warn};

use crate::store::RuleStore;
use crate::utils::paths::normalize_separators;

/// Staged and committed skip patterns for one review session.
pub struct SkipEngine {
    store: Arc<RuleStore>,
    /// Patterns proposed but not yet committed.
    staged_adds: Vec<String>,
    /// Committed patterns marked for removal on the next commit.
    staged_removes: Vec<String>,
    /// Compiled form of the effective set; rebuilt on every staging
    /// operation and on commit/discard.
    matchers: Vec<Regex>,
}

impl SkipEngine {
    /// Create an engine over the session's rule store. Committed
    /// patterns live in the store; the staged delta lives here.
    #[must_use]
    pub fn new(store: Arc<RuleStore>) -> Self {
        let mut engine = Self {
            store,
            staged_adds: Vec::new(),
            staged_removes: Vec::new(),
            matchers: Vec::new(),
        };
        engine.rebuild_matchers();
        engine
    }

    /// Propose a pattern. If the same pattern was staged for removal,
    /// the removal is withdrawn instead.
    pub fn stage(&mut self, pattern: &str) {
        let pattern = normalize_separators(pattern);
        if let Some(pos) = self.staged_removes.iter().position(|p| *p == pattern) {
            self.staged_removes.remove(pos);
        } else if !self.staged_adds.contains(&pattern) {
            self.staged_adds.push(pattern);
        }
        self.rebuild_matchers();
    }

    /// Withdraw a pattern. A staged proposal is dropped; a committed
    /// pattern is marked for removal on the next commit.
    pub fn unstage(&mut self, pattern: &str) {
        let pattern = normalize_separators(pattern);
        if let Some(pos) = self.staged_adds.iter().position(|p| *p == pattern) {
            self.staged_adds.remove(pos);
        } else if !self.staged_removes.contains(&pattern) {
            self.staged_removes.push(pattern);
        }
        self.rebuild_matchers();
    }

    /// Whether any staged additions or removals are pending.
    #[must_use]
    pub fn has_staged_changes(&self) -> bool {
        !self.staged_adds.is_empty() || !self.staged_removes.is_empty()
    }

    /// Committed patterns plus staged additions, minus staged removals.
    /// This is the set `matches` evaluates against.
    #[must_use]
    pub fn effective_patterns(&self) -> Vec<String> {
        let mut patterns: Vec<String> = self
            .store
            .committed_patterns()
            .into_iter()
            .filter(|p| !self.staged_removes.contains(p))
            .collect();
        for added in &self.staged_adds {
            if !patterns.contains(added) {
                patterns.push(added.clone());
            }
        }
        patterns
    }

    /// Whether a path is excluded by any effective pattern.
    ///
    /// Evaluates against the pre-compiled matcher set; no compilation
    /// happens per lookup.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let path = normalize_separators(path);
        self.matchers.iter().any(|re| re.is_match(&path))
    }

    /// Merge the staged delta into the committed set and clear it.
    pub fn commit(&mut self) {
        let merged = self.effective_patterns();
        debug!(patterns = merged.len(), "committing skip patterns");
        self.store.set_committed_patterns(merged);
        self.staged_adds.clear();
        self.staged_removes.clear();
        self.rebuild_matchers();
    }

    /// Drop the staged delta without touching the committed set.
    pub fn discard(&mut self) {
        debug!(
            adds = self.staged_adds.len(),
            removes = self.staged_removes.len(),
            "discarding staged skip patterns"
        );
        self.staged_adds.clear();
        self.staged_removes.clear();
        self.rebuild_matchers();
    }

    /// Recompile the effective pattern set.
    fn rebuild_matchers(&mut self) {
        self.matchers = self
            .effective_patterns()
            .iter()
            .filter_map(|pattern| compile_pattern(pattern))
            .collect();
    }
}

/// Compile one normalized pattern to an anchored regex.
///
/// A trailing separator makes the pattern match the folder itself and
/// anything under it; otherwise the whole path must match the glob. A
/// pattern that does not compile is logged and dropped from matching.
fn compile_pattern(pattern: &str) -> Option<Regex> {
    let (glob, folder) = match pattern.strip_suffix('/') {
        Some(trimmed) => (trimmed, true),
        None => (pattern, false),
    };
    let anchored = if folder {
        format!("^{}(/.*)?$", glob_to_regex(glob))
    } else {
        format!("^{}$", glob_to_regex(glob))
    };
    match Regex::new(&anchored) {
        Ok(re) => Some(re),
        Err(err) => {
            warn!(pattern, %err, "skip pattern did not compile; treating as non-matching");
            None
        }
    }
}

/// Translate a glob into a regex fragment: `*` becomes `.*`, `?` becomes
/// `.`, everything else is matched literally.
fn glob_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    for ch in glob.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            c if regex_syntax_char(c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

fn regex_syntax_char(c: char) -> bool {
    matches!(
        c,
        '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\'
    )
}
