//! Workflow file discovery.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of workflow definition files.
pub const WORKFLOW_EXTENSION: &str = "json";

/// Find every workflow file under `root`, recursively, in full-path order.
///
/// Unreadable directories are skipped. A missing root yields nothing.
pub fn discover_workflows(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext == WORKFLOW_EXTENSION)
        })
        .map(|e| e.into_path())
        .collect();

    files.sort();
    files
}

/// Display name of a workflow file (its final path component).
pub fn workflow_filename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
