//! Review-tree construction.
//!
//! Walks a directory subtree depth-first, fanning the direct children of
//! each level out as parallel units of work, and composes per-directory
//! workflow and skip summaries from the results. Hidden entries and
//! symlinks are skipped. Filesystem errors abort the enclosing subtree
//! and propagate with the failing path.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::error::{Result, WorkbenchError};
use crate::model::{ScanReport, SkipState, TreeNode, WorkflowState};
use crate::skip::SkipEngine;
use crate::utils::paths::relative_to_root;
use crate::workflow::WorkflowEngine;

/// Builds the review tree for a scan root.
///
/// Holds read-only views of its collaborators: classification goes
/// through the workflow engine's read path, skip status through the skip
/// engine, and per-file detections come from the scan report. The tree
/// is built fresh on every call and never cached.
pub struct TreeBuilder<'a> {
    root: PathBuf,
    workflow: &'a WorkflowEngine,
    skip: &'a SkipEngine,
    report: &'a ScanReport,
}

impl<'a> TreeBuilder<'a> {
    #[must_use]
    pub fn new(
        root: impl Into<PathBuf>,
        workflow: &'a WorkflowEngine,
        skip: &'a SkipEngine,
        report: &'a ScanReport,
    ) -> Self {
        Self {
            root: root.into(),
            workflow,
            skip,
            report,
        }
    }

    /// Build the tree rooted at the configured scan root.
    pub fn build(&self) -> Result<TreeNode> {
        let name = self
            .root
            .file_name()
            .map_or_else(|| self.root.display().to_string(), |n| n.to_string_lossy().into_owned());
        debug!(root = %self.root.display(), "building review tree");
        self.build_dir(&self.root, name)
    }

    /// Build one directory node: list entries, fan out over them, then
    /// compose the parent from the sorted children.
    fn build_dir(&self, dir: &Path, name: String) -> Result<TreeNode> {
        let entries = self.list_entries(dir)?;

        let mut children = entries
            .into_par_iter()
            .map(|entry| self.build_entry(entry))
            .collect::<Vec<Result<TreeNode>>>();

        // All units ran to completion; surface the first error in entry
        // order, matching the batch-application contract.
        let mut nodes = Vec::with_capacity(children.len());
        let mut first_err = None;
        for child in children.drain(..) {
            match child {
                Ok(node) => nodes.push(node),
                Err(err) if first_err.is_none() => first_err = Some(err),
                Err(_) => {}
            }
        }
        if let Some(err) = first_err {
            return Err(err);
        }

        nodes.sort_by(|a, b| {
            b.is_folder
                .cmp(&a.is_folder)
                .then_with(|| a.path.cmp(&b.path))
        });

        let rel = relative_to_root(&self.root, dir).unwrap_or_default();
        let mut node = TreeNode::folder(name, rel, nodes);
        // A directory that itself matches a skip pattern is excluded
        // outright, regardless of what its children aggregate to.
        if !node.path.is_empty() && self.skip.matches(&node.path) {
            node.skip_state = SkipState::Excluded;
        }
        Ok(node)
    }

    /// List a directory's visible, non-symlink entries.
    fn list_entries(&self, dir: &Path) -> Result<Vec<DirEntryInfo>> {
        let read = fs::read_dir(dir).map_err(|e| WorkbenchError::io(dir, e))?;
        let mut entries = Vec::new();
        for entry in read {
            let entry = entry.map_err(|e| WorkbenchError::io(dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let file_type = entry
                .file_type()
                .map_err(|e| WorkbenchError::io(entry.path(), e))?;
            if file_type.is_symlink() {
                continue;
            }
            entries.push(DirEntryInfo {
                path: entry.path(),
                name,
                is_dir: file_type.is_dir(),
            });
        }
        Ok(entries)
    }

    /// Build one child: recurse for directories, classify for files.
    fn build_entry(&self, entry: DirEntryInfo) -> Result<TreeNode> {
        if entry.is_dir {
            return self.build_dir(&entry.path, entry.name);
        }

        let rel = relative_to_root(&self.root, &entry.path).unwrap_or_default();
        let workflow_state = match self.report.result_for(&rel) {
            Some(result) => self.workflow.classify(&result).workflow_state,
            // Nothing detected for this file, so there is nothing to
            // review yet.
            None => WorkflowState::Pending,
        };
        let skip_state = if self.skip.matches(&rel) {
            SkipState::Excluded
        } else {
            SkipState::Included
        };
        Ok(TreeNode::file(entry.name, rel, workflow_state, skip_state))
    }
}

struct DirEntryInfo {
    path: PathBuf,
    name: String,
    is_dir: bool,
}
