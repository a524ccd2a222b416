//! Shared data models for scan findings and summaries.

pub mod target;

pub use target::ScanTarget;

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
/// Finding severity. `Error` marks a breaking change, `Warning` a recommended one.
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Upper-case label used by the human report (`ERROR`, `WARNING`).
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
/// Detector groups, declared in report order.
pub enum Group {
    Dependencies,
    Middleware,
    ParallelRoutes,
    Source,
}

impl Group {
    pub const ALL: [Group; 4] = [
        Group::Dependencies,
        Group::Middleware,
        Group::ParallelRoutes,
        Group::Source,
    ];

    /// Section title for the human report.
    pub fn title(self) -> &'static str {
        match self {
            Group::Dependencies => "Checking Dependencies",
            Group::Middleware => "Checking Middleware",
            Group::ParallelRoutes => "Checking Parallel Routes",
            Group::Source => "Checking TypeScript/JavaScript Files",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Group::Dependencies => "dependencies",
            Group::Middleware => "middleware",
            Group::ParallelRoutes => "parallel-routes",
            Group::Source => "source",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Where a finding points: a path relative to the project root, plus an
/// optional 1-based line.
pub struct Location {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Location {
    pub fn file(path: impl Into<String>) -> Self {
        Location {
            path: path.into(),
            line: None,
        }
    }

    pub fn line(path: impl Into<String>, line: u32) -> Self {
        Location {
            path: path.into(),
            line: Some(line),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(n) => write!(f, "{}:{}", self.path, n),
            None => f.write_str(&self.path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single migration issue reported by one detector.
pub struct Finding {
    pub rule: &'static str,
    pub group: Group,
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Counts derived from a finding collection.
pub struct Summary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
    pub files: usize,
}

impl Summary {
    /// Derive counts from `findings`; `files` is the number of scanned targets.
    pub fn from_findings(findings: &[Finding], files: usize) -> Self {
        let errors = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count();
        Summary {
            total: findings.len(),
            errors,
            warnings: findings.len() - errors,
            files,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Scan results container handed to the printers.
pub struct ScanResult {
    pub root: String,
    pub findings: Vec<Finding>,
    pub files_scanned: usize,
}

impl ScanResult {
    pub fn summary(&self) -> Summary {
        Summary::from_findings(&self.findings, self.files_scanned)
    }

    /// Findings of one group, in aggregation order.
    pub fn in_group(&self, group: Group) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.group == group)
    }
}
