//! Path normalization helpers.
//!
//! Skip patterns and rule paths are compared in forward-slash form so
//! that matching behaves identically across separator conventions.

use std::path::Path;

/// Normalize a path string to forward slashes.
#[must_use]
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// A path's position relative to the scan root, forward-slash form.
///
/// Returns `None` when `path` is not under `root`.
#[must_use]
pub fn relative_to_root(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut parts: Vec<String> = Vec::new();
    for component in rel.components() {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }
    Some(parts.join("/"))
}
