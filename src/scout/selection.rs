//! File Sampling Policy
//!
//! Decides which tree entries are worth fetching in full. A path qualifies if
//! it is exactly one of the priority names, or if it is a root-level file with
//! a recognized source extension.

use crate::constants::evidence::{PRIORITY_FILES, SOURCE_EXTENSIONS};
use crate::hosting::TreeEntry;

/// Whether `path` is a sampling candidate
pub fn qualifies(path: &str) -> bool {
    if PRIORITY_FILES.contains(&path) {
        return true;
    }

    !path.contains('/') && SOURCE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Candidates in tree order. Directory entries are never candidates.
pub fn candidates(tree: &[TreeEntry]) -> impl Iterator<Item = &str> {
    tree.iter()
        .filter(|entry| entry.kind.as_deref() != Some("tree"))
        .map(|entry| entry.path.as_str())
        .filter(|path| qualifies(path))
}
