//! Scan runner: walks the project, evaluates every detector, and
//! aggregates findings in a fixed order.
//!
//! Order is: project rules in registry order (dependencies, middleware,
//! parallel routes), then content rules per file in walker order. Content
//! rules run in parallel across files; rayon's indexed `collect` keeps the
//! per-file results in walker order, so output is identical to a serial run.

use crate::detectors::{ContentRule, ProjectRule, CONTENT_RULES, PROJECT_RULES};
use crate::models::{Finding, ScanResult, ScanTarget, Severity};
use crate::walk::{walk, WalkPolicy};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Directory '{}' not found", .0.display())]
    RootNotFound(PathBuf),
}

#[derive(Debug, Clone, Default)]
/// Options for a scan run.
pub struct ScanOptions {
    pub walk: WalkPolicy,
    /// Rule ids that are skipped entirely.
    pub disabled: BTreeSet<String>,
}

impl ScanOptions {
    fn enabled(&self, id: &str) -> bool {
        !self.disabled.contains(id)
    }
}

#[derive(Debug, Default)]
/// Ordered finding collection with running severity counts.
pub struct Aggregator {
    findings: Vec<Finding>,
    errors: usize,
    warnings: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
        }
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        for f in findings {
            self.push(f);
        }
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn total(&self) -> usize {
        self.findings.len()
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}

/// Scan `project` and return the ordered findings.
///
/// Fails only when `project` is not a directory. Every other problem is
/// either a finding (missing manifest) or a skipped file.
pub fn run_scan(project: &Path, opts: &ScanOptions) -> Result<ScanResult, ScanError> {
    if !project.is_dir() {
        return Err(ScanError::RootNotFound(project.to_path_buf()));
    }
    let mut agg = Aggregator::new();

    for rule in PROJECT_RULES.iter().filter(|r| opts.enabled(r.id)) {
        agg.extend(run_project_rule(rule, project));
    }

    let rules: Vec<&ContentRule> = CONTENT_RULES
        .iter()
        .filter(|r| opts.enabled(r.id))
        .collect();
    let targets: Vec<ScanTarget> = walk(project, &opts.walk).collect();
    info!(files = targets.len(), rules = rules.len(), "scanning source files");

    let per_file: Vec<Vec<Finding>> = targets
        .par_iter()
        .map(|t| scan_target(t, &rules))
        .collect();
    for found in per_file {
        agg.extend(found);
    }

    debug!(
        total = agg.total(),
        errors = agg.errors(),
        warnings = agg.warnings(),
        "scan complete"
    );
    let shown = fs::canonicalize(project).unwrap_or_else(|_| project.to_path_buf());
    Ok(ScanResult {
        root: shown.to_string_lossy().to_string(),
        findings: agg.into_findings(),
        files_scanned: targets.len(),
    })
}

fn run_project_rule(rule: &ProjectRule, project: &Path) -> Vec<Finding> {
    let found = (rule.check)(project);
    debug!(rule = rule.id, findings = found.len(), "project rule evaluated");
    found
}

/// Run every applicable content rule against one target. An unreadable
/// file yields no findings; invalid UTF-8 is decoded lossily.
pub fn scan_target(target: &ScanTarget, rules: &[&ContentRule]) -> Vec<Finding> {
    let bytes = match fs::read(&target.path) {
        Ok(b) => b,
        Err(e) => {
            debug!(file = %target.rel, error = %e, "skipping unreadable file");
            return Vec::new();
        }
    };
    let content = String::from_utf8_lossy(&bytes);
    rules
        .iter()
        .filter(|r| target.has_ext(r.applies_to))
        .flat_map(|r| (r.check)(target, &content))
        .collect()
}
