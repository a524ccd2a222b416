//! Supporting helpers: colored stderr prefixes and path display.

use owo_colors::OwoColorize;
use std::path::Path;

/// Colors are disabled when `NO_COLOR` is set.
pub fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if colors_enabled() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn warn_prefix() -> String {
    if colors_enabled() {
        "warning:".yellow().bold().to_string()
    } else {
        "warning:".to_string()
    }
}

/// Display `path` relative to `root` with forward slashes; falls back to
/// the path as given when no relative form exists.
pub fn rel_to_root(root: &Path, path: &Path) -> String {
    let rel = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    let s = rel.to_string_lossy().replace('\\', "/");
    if s.is_empty() {
        ".".to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rel_to_root_strips_prefix() {
        let root = Path::new("/work/site");
        assert_eq!(
            rel_to_root(root, Path::new("/work/site/app/page.tsx")),
            "app/page.tsx"
        );
        assert_eq!(rel_to_root(root, root), ".");
    }
}
