//! Dependency checks against `package.json`.
//!
//! The manifest is matched textually: the first `"<name>": "<version>"`
//! pair wins, wherever it sits (dependencies, devDependencies, engines).
//! A manifest that cannot be read contributes nothing beyond the
//! missing-file error.

use crate::models::{Finding, Group, Location, Severity};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

pub const MANIFEST: &str = "package.json";

pub const MANIFEST_MISSING: &str = "manifest-missing";
pub const NEXT_VERSION: &str = "next-version";
pub const NODE_VERSION: &str = "node-version";
pub const TYPESCRIPT_VERSION: &str = "typescript-version";

const NEXT_MAJOR: u64 = 16;
const NODE_FLOOR_MAJOR: u64 = 20;
const TYPESCRIPT_FLOOR: (u64, u64) = (5, 1);

static NEXT_RE: LazyLock<Regex> = LazyLock::new(|| declared("next"));
static NODE_RE: LazyLock<Regex> = LazyLock::new(|| declared("node"));
static TYPESCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| declared("typescript"));

fn declared(name: &str) -> Regex {
    Regex::new(&format!(r#""{}"\s*:\s*"([^"]+)""#, regex::escape(name)))
        .unwrap_or_else(|e| panic!("invalid manifest regex for {name}: {e}"))
}

/// Read the manifest lossily. `None` when missing or unreadable.
fn read_manifest(root: &Path) -> Option<String> {
    let path = root.join(MANIFEST);
    match fs::read(&path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "manifest not readable");
            None
        }
    }
}

/// First declared version for `re`, with its 1-based line.
fn find_declared(content: &str, re: &Regex) -> Option<(String, u32)> {
    let caps = re.captures(content)?;
    let whole = caps.get(0)?;
    let line = content[..whole.start()].matches('\n').count() as u32 + 1;
    Some((caps[1].to_string(), line))
}

/// Leading `major[.minor]` of a version requirement after range operators
/// and a `v` prefix are stripped.
pub fn parse_major_minor(version: &str) -> Option<(u64, Option<u64>)> {
    let v = version.trim_start_matches(|c: char| "^~>=<v ".contains(c));
    let mut parts = v.split('.');
    let major = leading_number(parts.next()?)?;
    let minor = parts.next().and_then(leading_number);
    Some((major, minor))
}

fn leading_number(s: &str) -> Option<u64> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn manifest_finding(rule: &'static str, severity: Severity, line: u32, message: String) -> Finding {
    Finding {
        rule,
        group: Group::Dependencies,
        severity,
        location: Location::line(MANIFEST, line),
        message,
    }
}

pub fn check_manifest_present(root: &Path) -> Vec<Finding> {
    if root.join(MANIFEST).is_file() {
        return Vec::new();
    }
    vec![Finding {
        rule: MANIFEST_MISSING,
        group: Group::Dependencies,
        severity: Severity::Error,
        location: Location::file(MANIFEST),
        message: "File not found".to_string(),
    }]
}

pub fn check_next_version(root: &Path) -> Vec<Finding> {
    let Some(content) = read_manifest(root) else {
        return Vec::new();
    };
    next_version_findings(&content)
}

pub fn check_node_version(root: &Path) -> Vec<Finding> {
    let Some(content) = read_manifest(root) else {
        return Vec::new();
    };
    node_version_findings(&content)
}

pub fn check_typescript_version(root: &Path) -> Vec<Finding> {
    let Some(content) = read_manifest(root) else {
        return Vec::new();
    };
    typescript_version_findings(&content)
}

fn next_version_findings(content: &str) -> Vec<Finding> {
    let Some((version, line)) = find_declared(content, &NEXT_RE) else {
        return Vec::new();
    };
    let on_target = matches!(parse_major_minor(&version), Some((major, _)) if major == NEXT_MAJOR);
    if on_target {
        return Vec::new();
    }
    vec![manifest_finding(
        NEXT_VERSION,
        Severity::Warning,
        line,
        format!("Next.js version '{}' should be updated to 16.x", version),
    )]
}

fn node_version_findings(content: &str) -> Vec<Finding> {
    let Some((version, line)) = find_declared(content, &NODE_RE) else {
        return Vec::new();
    };
    // Pinned versions like `18.20.4` mention "20" but sit below the floor.
    let below_floor =
        matches!(parse_major_minor(&version), Some((major, _)) if major < NODE_FLOOR_MAJOR);
    let too_low = (!version.contains("20") && !version.contains(">=")) || below_floor;
    if !too_low {
        return Vec::new();
    }
    vec![manifest_finding(
        NODE_VERSION,
        Severity::Error,
        line,
        format!("Node.js version '{}' should be 20.9.0+", version),
    )]
}

fn typescript_version_findings(content: &str) -> Vec<Finding> {
    let Some((version, line)) = find_declared(content, &TYPESCRIPT_RE) else {
        return Vec::new();
    };
    let below = match parse_major_minor(&version) {
        Some((major, Some(minor))) => (major, minor) < TYPESCRIPT_FLOOR,
        Some((major, None)) => major < TYPESCRIPT_FLOOR.0,
        None => version.contains("5.0") || version.contains("4."),
    };
    if !below {
        return Vec::new();
    }
    vec![manifest_finding(
        TYPESCRIPT_VERSION,
        Severity::Warning,
        line,
        format!("TypeScript version '{}' should be 5.1.0+", version),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const OLD: &str = r#"{
  "name": "shop",
  "dependencies": {
    "next": "^15.2.0",
    "react": "19.0.0"
  },
  "devDependencies": {
    "typescript": "^5.0.4"
  },
  "engines": {
    "node": "18.x"
  }
}"#;

    const CURRENT: &str = r#"{
  "dependencies": { "next": "^16.0.1" },
  "devDependencies": { "typescript": "5.6.3", "@types/node": "22.0.0" },
  "engines": { "node": ">=20.9.0" }
}"#;

    #[test]
    fn test_missing_manifest_is_single_error() {
        let tmp = tempdir().unwrap();
        let found = check_manifest_present(tmp.path());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Error);
        assert_eq!(found[0].location.path, "package.json");
        assert!(check_next_version(tmp.path()).is_empty());
        assert!(check_node_version(tmp.path()).is_empty());
        assert!(check_typescript_version(tmp.path()).is_empty());
    }

    #[test]
    fn test_old_manifest_reports_each_dependency() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join(MANIFEST), OLD).unwrap();
        assert!(check_manifest_present(tmp.path()).is_empty());

        let next = check_next_version(tmp.path());
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].severity, Severity::Warning);
        assert_eq!(next[0].location, Location::line("package.json", 4));
        assert!(next[0].message.contains("^15.2.0"));

        let node = check_node_version(tmp.path());
        assert_eq!(node.len(), 1);
        assert_eq!(node[0].severity, Severity::Error);
        assert_eq!(node[0].location.line, Some(11));

        let ts = check_typescript_version(tmp.path());
        assert_eq!(ts.len(), 1);
        assert_eq!(ts[0].severity, Severity::Warning);
    }

    #[test]
    fn test_current_manifest_is_clean() {
        assert!(next_version_findings(CURRENT).is_empty());
        assert!(node_version_findings(CURRENT).is_empty());
        assert!(typescript_version_findings(CURRENT).is_empty());
    }

    #[test]
    fn test_next_versions_below_16_warn_once() {
        for v in ["14.2.3", "^15.0.0", "~13.5.1", "latest"] {
            let m = format!(r#"{{"dependencies": {{"next": "{}"}}}}"#, v);
            assert_eq!(next_version_findings(&m).len(), 1, "version {}", v);
        }
        for v in ["16.0.0", "~16.1.0", ">=16"] {
            let m = format!(r#"{{"dependencies": {{"next": "{}"}}}}"#, v);
            assert!(next_version_findings(&m).is_empty(), "version {}", v);
        }
    }

    #[test]
    fn test_node_version_policy() {
        for v in [
            "18",
            "18.x",
            "^18.17.0",
            "22",
            ">=18",
            "18.20.4",
            "^18.20.0",
            "~18.20",
            ">=16.20.0",
        ] {
            let m = format!(r#"{{"engines": {{"node": "{}"}}}}"#, v);
            assert_eq!(node_version_findings(&m).len(), 1, "version {}", v);
        }
        for v in ["20.x", "^20.9.0", ">=20.9.0", ">=22"] {
            let m = format!(r#"{{"engines": {{"node": "{}"}}}}"#, v);
            assert!(node_version_findings(&m).is_empty(), "version {}", v);
        }
    }

    #[test]
    fn test_types_node_is_not_the_runtime() {
        let m = r#"{"devDependencies": {"@types/node": "18.0.0"}}"#;
        assert!(node_version_findings(m).is_empty());
    }

    #[test]
    fn test_typescript_floor() {
        for v in ["4.9.5", "~5.0.2", "4"] {
            let m = format!(r#"{{"typescript": "{}"}}"#, v);
            assert_eq!(typescript_version_findings(&m).len(), 1, "version {}", v);
        }
        for v in ["5.1.0", "^5.4.2", "6.0.0", "5"] {
            let m = format!(r#"{{"typescript": "{}"}}"#, v);
            assert!(typescript_version_findings(&m).is_empty(), "version {}", v);
        }
    }

    #[test]
    fn test_parse_major_minor() {
        assert_eq!(parse_major_minor("^15.2.0"), Some((15, Some(2))));
        assert_eq!(parse_major_minor(">= 20"), Some((20, None)));
        assert_eq!(parse_major_minor("v18.x"), Some((18, None)));
        assert_eq!(parse_major_minor("latest"), None);
    }
}
