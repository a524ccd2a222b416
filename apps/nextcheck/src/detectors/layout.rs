//! Project layout checks: legacy middleware entrypoint and parallel route slots.

use crate::models::{Finding, Group, Location, Severity};
use crate::utils::rel_to_root;
use crate::walk::{glob_under, WalkPolicy};
use std::path::Path;

pub const LEGACY_MIDDLEWARE: &str = "legacy-middleware";
pub const PARALLEL_ROUTE_DEFAULT: &str = "parallel-route-default";

/// Locations probed for the old interception entrypoint.
const MIDDLEWARE_FILES: &[&str] = &[
    "middleware.ts",
    "middleware.js",
    "src/middleware.ts",
    "src/middleware.js",
];

/// Fallback files accepted inside a parallel route slot.
const DEFAULT_FILES: &[&str] = &["default.tsx", "default.ts", "default.jsx", "default.js"];

pub fn check_legacy_middleware(root: &Path) -> Vec<Finding> {
    MIDDLEWARE_FILES
        .iter()
        .filter(|rel| root.join(rel).is_file())
        .map(|rel| {
            let ext = if rel.ends_with(".js") { "js" } else { "ts" };
            Finding {
                rule: LEGACY_MIDDLEWARE,
                group: Group::Middleware,
                severity: Severity::Warning,
                location: Location::file(*rel),
                message: format!("Should be renamed to proxy.{}", ext),
            }
        })
        .collect()
}

/// Report every `@slot` directory under `app/` that lacks a `default.*` file.
pub fn check_parallel_route_defaults(root: &Path) -> Vec<Finding> {
    let app = root.join("app");
    if !app.is_dir() {
        return Vec::new();
    }
    let policy = WalkPolicy::default();
    glob_under(&app, "@*")
        .into_iter()
        .filter(|dir| dir.is_dir())
        .filter(|dir| !policy.is_excluded(root, dir))
        .filter(|dir| !DEFAULT_FILES.iter().any(|f| dir.join(f).is_file()))
        .map(|dir| Finding {
            rule: PARALLEL_ROUTE_DEFAULT,
            group: Group::ParallelRoutes,
            severity: Severity::Error,
            location: Location::file(rel_to_root(root, &dir)),
            message: "Missing default.tsx file".to_string(),
        })
        .collect()
}
