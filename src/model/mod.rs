//! Core data model for the review workflow.
//!
//! Scan results come from the external scanner and are read-only;
//! classification rules are user-authored and live in the rule store;
//! decisions are the reviewer's mutations; tree nodes are the derived,
//! never-persisted review view.

mod decision;
mod rules;
mod scan;
mod tree;

pub use decision::*;
pub use rules::*;
pub use scan::*;
pub use tree::*;
