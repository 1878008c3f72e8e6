//! Review-tree nodes and state aggregation.
//!
//! Directory nodes summarize their descendants. Aggregation is written
//! as a commutative, associative `combine` so the result is identical no
//! matter in which order concurrently computed child states arrive.

use serde::{Deserialize, Serialize};

/// Review progress of a file, or the summary of a directory.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowState {
    /// Not yet reviewed (or: every descendant pending).
    Pending,
    /// Reviewed (or: every descendant completed).
    Completed,
    /// Directory only: descendants disagree.
    Mixed,
}

impl WorkflowState {
    /// Fold two child states into their parent summary.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        if self == other { self } else { Self::Mixed }
    }
}

/// Whether a path is excluded from future scans, or a directory summary
/// of the same.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkipState {
    /// Still part of future scans.
    Included,
    /// Matched by a skip pattern.
    Excluded,
    /// Directory only: descendants disagree.
    Mixed,
}

impl SkipState {
    /// Fold two child states into their parent summary.
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        if self == other { self } else { Self::Mixed }
    }
}

/// One node of the review tree. Built fresh on every request, never
/// persisted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TreeNode {
    /// Stable identifier; the root-relative path.
    pub id: String,
    /// Final path component.
    pub name: String,
    /// Path relative to the scan root, forward-slash form.
    pub path: String,
    pub is_folder: bool,
    pub workflow_state: WorkflowState,
    pub skip_state: SkipState,
    /// Descendant files, for progress display.
    pub total_files: usize,
    /// Descendant files whose review is completed.
    pub completed_files: usize,
    /// Folders first, then lexicographic by path.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a leaf (file) node.
    #[must_use]
    pub fn file(
        name: impl Into<String>,
        path: impl Into<String>,
        workflow_state: WorkflowState,
        skip_state: SkipState,
    ) -> Self {
        let path = path.into();
        let completed = usize::from(workflow_state == WorkflowState::Completed);
        Self {
            id: path.clone(),
            name: name.into(),
            path,
            is_folder: false,
            workflow_state,
            skip_state,
            total_files: 1,
            completed_files: completed,
            children: Vec::new(),
        }
    }

    /// Create a folder node summarizing already-built children.
    ///
    /// Children must already be sorted (folders first, then by path).
    /// An empty directory defaults to pending/included.
    #[must_use]
    pub fn folder(
        name: impl Into<String>,
        path: impl Into<String>,
        children: Vec<TreeNode>,
    ) -> Self {
        let workflow_state = children
            .iter()
            .map(|c| c.workflow_state)
            .reduce(WorkflowState::combine)
            .unwrap_or(WorkflowState::Pending);
        let skip_state = children
            .iter()
            .map(|c| c.skip_state)
            .reduce(SkipState::combine)
            .unwrap_or(SkipState::Included);
        let total_files = children.iter().map(|c| c.total_files).sum();
        let completed_files = children.iter().map(|c| c.completed_files).sum();
        let path = path.into();
        Self {
            id: path.clone(),
            name: name.into(),
            path,
            is_folder: true,
            workflow_state,
            skip_state,
            total_files,
            completed_files,
            children,
        }
    }
}
