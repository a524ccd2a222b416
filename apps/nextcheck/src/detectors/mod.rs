//! Detector registry.
//!
//! Every rule is a plain function registered under a stable id. Project
//! rules look at the project root (manifest, well-known files, directory
//! layout); content rules look at one source file at a time. Registry order
//! is report order within a group.

pub mod layout;
pub mod manifest;
pub mod source;

use crate::models::{Finding, Group, ScanTarget, Severity};
use std::path::Path;

/// Rule evaluated once per project.
pub type ProjectCheck = fn(&Path) -> Vec<Finding>;
/// Rule evaluated once per scan target with its decoded content.
pub type ContentCheck = fn(&ScanTarget, &str) -> Vec<Finding>;

#[derive(Clone, Copy)]
/// Registry entry for a project-level rule.
pub struct ProjectRule {
    pub id: &'static str,
    pub group: Group,
    pub severity: Severity,
    pub description: &'static str,
    pub check: ProjectCheck,
}

#[derive(Clone, Copy)]
/// Registry entry for a per-file rule, gated by extension.
pub struct ContentRule {
    pub id: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    pub applies_to: &'static [&'static str],
    pub check: ContentCheck,
}

const SOURCE_EXTS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Project rules in aggregation order: dependencies, middleware, parallel routes.
pub static PROJECT_RULES: &[ProjectRule] = &[
    ProjectRule {
        id: manifest::MANIFEST_MISSING,
        group: Group::Dependencies,
        severity: Severity::Error,
        description: "package.json must exist at the project root",
        check: manifest::check_manifest_present,
    },
    ProjectRule {
        id: manifest::NEXT_VERSION,
        group: Group::Dependencies,
        severity: Severity::Warning,
        description: "next dependency should target major version 16",
        check: manifest::check_next_version,
    },
    ProjectRule {
        id: manifest::NODE_VERSION,
        group: Group::Dependencies,
        severity: Severity::Error,
        description: "engines.node must allow Node.js 20.9.0 or later",
        check: manifest::check_node_version,
    },
    ProjectRule {
        id: manifest::TYPESCRIPT_VERSION,
        group: Group::Dependencies,
        severity: Severity::Warning,
        description: "typescript should be 5.1.0 or later",
        check: manifest::check_typescript_version,
    },
    ProjectRule {
        id: layout::LEGACY_MIDDLEWARE,
        group: Group::Middleware,
        severity: Severity::Warning,
        description: "middleware.{ts,js} is replaced by proxy.{ts,js}",
        check: layout::check_legacy_middleware,
    },
    ProjectRule {
        id: layout::PARALLEL_ROUTE_DEFAULT,
        group: Group::ParallelRoutes,
        severity: Severity::Error,
        description: "parallel route slots (@name) need a default.{tsx,ts,jsx,js}",
        check: layout::check_parallel_route_defaults,
    },
];

/// Content rules in per-file evaluation order.
pub static CONTENT_RULES: &[ContentRule] = &[
    ContentRule {
        id: source::ASYNC_PARAMS_TYPE,
        severity: Severity::Error,
        description: "params/searchParams props must be typed as Promise<...>",
        applies_to: SOURCE_EXTS,
        check: source::check_async_params_type,
    },
    ContentRule {
        id: source::PARAMS_AWAIT,
        severity: Severity::Error,
        description: "params must be awaited before field access",
        applies_to: SOURCE_EXTS,
        check: source::check_params_await,
    },
    ContentRule {
        id: source::REQUEST_API_AWAIT,
        severity: Severity::Error,
        description: "cookies(), headers() and draftMode() must be awaited",
        applies_to: SOURCE_EXTS,
        check: source::check_request_api_await,
    },
    ContentRule {
        id: source::REVALIDATE_TAG_PROFILE,
        severity: Severity::Warning,
        description: "revalidateTag() requires a cacheLife profile argument",
        applies_to: SOURCE_EXTS,
        check: source::check_revalidate_tag,
    },
];

/// True when `id` names a registered rule.
pub fn is_known_rule(id: &str) -> bool {
    PROJECT_RULES.iter().any(|r| r.id == id) || CONTENT_RULES.iter().any(|r| r.id == id)
}

/// True when at least one content rule inspects files with extension `ext`.
pub fn is_covered_extension(ext: &str) -> bool {
    CONTENT_RULES
        .iter()
        .any(|r| r.applies_to.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}
