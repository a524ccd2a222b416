//! Scan target produced by the source walker.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A candidate source file: absolute path, root-relative display path, and extension.
pub struct ScanTarget {
    pub path: PathBuf,
    pub rel: String,
    pub ext: String,
}

impl ScanTarget {
    /// Build a target for `path`, displaying it relative to `root`.
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let rel = crate::utils::rel_to_root(root, &path);
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        ScanTarget { path, rel, ext }
    }

    pub fn has_ext(&self, exts: &[&str]) -> bool {
        exts.iter().any(|e| self.ext.eq_ignore_ascii_case(e))
    }
}
