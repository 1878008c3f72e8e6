//! **BOM classification and workflow-state resolution for
//! source-composition scans.**
//!
//! `bom-workbench` is the engine behind a scan-review session: given the
//! output of a source-composition scanner, it lets a reviewer decide,
//! file by file, whether each detected third-party component is kept,
//! removed, or replaced in the project's bill of materials.
//!
//! ## Key Features
//!
//! - **Rule matching**: user-authored include/remove/replace rules are
//!   matched against scan results with a deterministic priority order
//!   (path+purl over purl over path, most specific path wins).
//! - **Batched decisions with replayable history**: reviewer decisions
//!   apply in batches; undo resets the rule lists and deterministically
//!   replays every earlier batch, so state is always a pure function of
//!   the session baseline and the applied history.
//! - **Skip-pattern staging**: patterns excluding paths from future
//!   scans can be proposed, withdrawn, committed, or discarded, and
//!   match identically across path-separator conventions.
//! - **Concurrent tree building**: the review tree aggregates workflow
//!   and skip status per directory, fanning out over directory entries
//!   with order-independent aggregation.
//!
//! ## Core Concepts & Modules
//!
//! - [`model`]: scan results, classification rules, reviewer decisions,
//!   and tree nodes.
//! - [`store`]: the lock-guarded [`RuleStore`] owning the session's
//!   rule lists — one instance per session, shared by `Arc`, no global
//!   state.
//! - [`matcher`]: [`resolve`] and [`classify`], the rule-matching core.
//! - [`workflow`]: the [`WorkflowEngine`] applying decision batches
//!   with undo/redo replay.
//! - [`skip`]: the [`SkipEngine`] staging skip patterns.
//! - [`tree`]: the [`TreeBuilder`] composing the review tree.
//! - [`session`]: rule-set file round-trip and scan-report loading.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use bom_workbench::{
//!     load_rule_set, load_scan_report, ClassificationDecision, RuleAction, RuleStore,
//!     SkipEngine, TreeBuilder, WorkflowEngine,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let rules = load_rule_set(Path::new("project/rules.json"))?;
//!     let report = load_scan_report(Path::new("project/scan-results.json"))?;
//!
//!     let store = Arc::new(RuleStore::new(rules));
//!     let mut workflow = WorkflowEngine::new(Arc::clone(&store));
//!     let skip = SkipEngine::new(Arc::clone(&store));
//!
//!     workflow.apply_batch(vec![ClassificationDecision::new(
//!         "src/vendor/lib.js",
//!         "pkg:npm/lodash",
//!         RuleAction::Include,
//!     )])?;
//!
//!     let tree = TreeBuilder::new("project/src", &workflow, &skip, &report).build()?;
//!     println!("{}/{} files reviewed", tree.completed_files, tree.total_files);
//!     Ok(())
//! }
//! ```

#![warn(clippy::unwrap_used)]

pub mod error;
pub mod matcher;
pub mod model;
pub mod session;
pub mod skip;
pub mod store;
pub mod tree;
pub mod utils;
pub mod workflow;

// Re-export main types for convenience
pub use error::{Result, WorkbenchError};
pub use matcher::{classify, resolve, Classification, FilterConfig, RuleMatch};
pub use model::{
    Batch, ClassificationDecision, ClassificationRule, MatchType, RuleAction, RuleKind, RuleSet,
    ScanEntry, ScanReport, ScanResult, SkipState, TreeNode, WorkflowState,
};
pub use session::{load_rule_set, load_scan_report, save_rule_set};
pub use skip::SkipEngine;
pub use store::RuleStore;
pub use tree::TreeBuilder;
pub use workflow::WorkflowEngine;
