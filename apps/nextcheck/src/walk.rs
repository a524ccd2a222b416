//! Source walker: enumerates candidate files under the configured roots.
//!
//! Each root is expanded with one `glob` pattern per extension
//! (`<root>/**/*.<ext>`). The glob crate yields paths in sorted order, so
//! traversal order is deterministic: roots in configured order, then
//! extensions in configured order, then path order. Missing roots are
//! skipped without error.

use crate::models::ScanTarget;
use glob::{glob_with, MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directories scanned when no configuration overrides them.
pub const DEFAULT_ROOTS: &[&str] = &["app", "src"];
/// Extensions treated as source files.
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];
/// Path components that are never scanned (dependencies, build cache).
pub const DEFAULT_EXCLUDE: &[&str] = &["node_modules", ".next"];

#[derive(Debug, Clone, PartialEq, Eq)]
/// Walker policy: where to look, which extensions count, what to skip.
pub struct WalkPolicy {
    pub roots: Vec<String>,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for WalkPolicy {
    fn default() -> Self {
        WalkPolicy {
            roots: DEFAULT_ROOTS.iter().map(|s| s.to_string()).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude: DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl WalkPolicy {
    /// True when any component of `path` below `project` is excluded.
    pub fn is_excluded(&self, project: &Path, path: &Path) -> bool {
        let rel = path.strip_prefix(project).unwrap_or(path);
        rel.components().any(|c| {
            let name = c.as_os_str().to_string_lossy();
            self.exclude.iter().any(|ex| ex == name.as_ref())
        })
    }
}

fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

/// Expand `<dir>/**/<tail>` into sorted paths. Unreadable entries are dropped.
pub(crate) fn glob_under(dir: &Path, tail: &str) -> Vec<PathBuf> {
    let base = Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{}/**/{}", base, tail);
    match glob_with(&pattern, match_options()) {
        Ok(paths) => paths
            .filter_map(|entry| match entry {
                Ok(p) => Some(p),
                Err(e) => {
                    debug!(error = %e, "skipping unreadable path");
                    None
                }
            })
            .collect(),
        Err(e) => {
            debug!(pattern = %pattern, error = %e, "invalid glob pattern");
            Vec::new()
        }
    }
}

/// Lazily enumerate scan targets for `project` under `policy`.
pub fn walk<'a>(project: &'a Path, policy: &'a WalkPolicy) -> impl Iterator<Item = ScanTarget> + 'a {
    policy
        .roots
        .iter()
        .map(move |r| project.join(r))
        .filter(|dir| {
            let present = dir.is_dir();
            if !present {
                debug!(root = %dir.display(), "source root not present; skipping");
            }
            present
        })
        .flat_map(move |dir| {
            policy
                .extensions
                .iter()
                .flat_map(move |ext| glob_under(&dir, &format!("*.{}", ext)))
        })
        .filter(|p| p.is_file())
        .filter(move |p| !policy.is_excluded(project, p))
        .map(move |p| ScanTarget::new(project, p))
}
