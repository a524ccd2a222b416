//! Output rendering for scan results and the rule registry.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-finding fields and a top-level summary.

use crate::config::OutputMode;
use crate::detectors::{CONTENT_RULES, PROJECT_RULES};
use crate::models::{Finding, Group, ScanResult, Severity};
use crate::utils::colors_enabled;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::fmt::Write as _;

const RULE: &str = "============================================================";
const CODEMOD: &str = "npx @next/codemod@canary upgrade latest";

fn use_colors(output: OutputMode) -> bool {
    output != OutputMode::Json && colors_enabled()
}

/// Print scan results in the requested format.
pub fn print_scan(res: &ScanResult, output: OutputMode) {
    match output {
        OutputMode::Json => println!("{}", render_json(&compose_scan_json(res))),
        OutputMode::Human => print!("{}", compose_scan_human(res, use_colors(output))),
    }
}

/// Print the detector registry.
pub fn print_rules(output: OutputMode) {
    match output {
        OutputMode::Json => println!("{}", render_json(&compose_rules_json())),
        OutputMode::Human => {
            let color = use_colors(output);
            let rows = PROJECT_RULES
                .iter()
                .map(|r| (r.id, r.group, r.severity, r.description))
                .chain(
                    CONTENT_RULES
                        .iter()
                        .map(|r| (r.id, Group::Source, r.severity, r.description)),
                );
            for (id, group, severity, description) in rows {
                let sev = severity_tag(severity, color);
                let id = if color { id.bold().to_string() } else { id.to_string() };
                println!("{} {:<24} {:<16} {}", sev, id, group.as_str(), description);
            }
        }
    }
}

fn render_json(v: &JsonVal) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

fn severity_tag(sev: Severity, color: bool) -> String {
    let tag = format!("[{}]", sev.label());
    match (color, sev) {
        (false, _) => tag,
        (true, Severity::Error) => tag.red().bold().to_string(),
        (true, Severity::Warning) => tag.yellow().bold().to_string(),
    }
}

fn header(out: &mut String, text: &str, color: bool) {
    if color {
        let _ = writeln!(out, "\n{}", RULE.cyan().bold());
        let _ = writeln!(out, "{}", text.cyan().bold());
        let _ = writeln!(out, "{}\n", RULE.cyan().bold());
    } else {
        let _ = writeln!(out, "\n{}\n{}\n{}\n", RULE, text, RULE);
    }
}

fn finding_lines(out: &mut String, f: &Finding, color: bool) {
    let _ = writeln!(out, "{} {}", severity_tag(f.severity, color), f.location);
    let _ = writeln!(out, "  → {}\n", f.message);
}

/// Compose the human report (pure) for testing/snapshot purposes.
pub fn compose_scan_human(res: &ScanResult, color: bool) -> String {
    let mut out = String::new();
    header(&mut out, "Next.js 16 Migration Checker", color);
    let _ = writeln!(out, "Scanning: {}\n", res.root);

    for (n, group) in Group::ALL.iter().enumerate() {
        header(&mut out, &format!("{}. {}", n + 1, group.title()), color);
        for f in res.in_group(*group) {
            finding_lines(&mut out, f, color);
        }
    }

    header(&mut out, "Summary", color);
    let s = res.summary();
    if s.total == 0 {
        let ok = "✓ No migration issues found!";
        let ready = "Your project appears ready for Next.js 16.";
        if color {
            let _ = writeln!(out, "{}\n{}\n", ok.green(), ready.green());
        } else {
            let _ = writeln!(out, "{}\n{}\n", ok, ready);
        }
        return out;
    }
    let found = format!(
        "Found {} potential issues ({} errors, {} warnings).",
        s.total, s.errors, s.warnings
    );
    if color {
        let _ = writeln!(out, "{}\n", found.yellow());
    } else {
        let _ = writeln!(out, "{}\n", found);
    }
    let codemod = if color {
        CODEMOD.cyan().to_string()
    } else {
        CODEMOD.to_string()
    };
    let _ = writeln!(out, "Next steps:");
    let _ = writeln!(out, "  1. Run automated migration: {}", codemod);
    let _ = writeln!(out, "  2. Review the issues above and fix manually if needed");
    let _ = writeln!(out, "  3. Test your application thoroughly\n");
    out
}

/// Compose scan JSON object (pure) for testing/snapshot purposes.
pub fn compose_scan_json(res: &ScanResult) -> JsonVal {
    json!({
        "root": res.root,
        "findings": res.findings,
        "summary": res.summary(),
    })
}

/// Compose registry JSON (pure).
pub fn compose_rules_json() -> JsonVal {
    let project = PROJECT_RULES.iter().map(|r| {
        json!({
            "id": r.id,
            "group": r.group,
            "severity": r.severity,
            "description": r.description,
        })
    });
    let content = CONTENT_RULES.iter().map(|r| {
        json!({
            "id": r.id,
            "group": Group::Source,
            "severity": r.severity,
            "description": r.description,
            "extensions": r.applies_to,
        })
    });
    JsonVal::Array(project.chain(content).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;

    fn sample() -> ScanResult {
        ScanResult {
            root: "/work/site".into(),
            findings: vec![
                Finding {
                    rule: "next-version",
                    group: Group::Dependencies,
                    severity: Severity::Warning,
                    location: Location::line("package.json", 4),
                    message: "Next.js version '^15.0.0' should be updated to 16.x".into(),
                },
                Finding {
                    rule: "request-api-await",
                    group: Group::Source,
                    severity: Severity::Error,
                    location: Location::line("app/page.tsx", 9),
                    message: "cookies() must be awaited".into(),
                },
            ],
            files_scanned: 3,
        }
    }

    #[test]
    fn test_compose_scan_json_shape() {
        let out = compose_scan_json(&sample());
        assert_eq!(out["summary"]["total"], 2);
        assert_eq!(out["summary"]["errors"], 1);
        assert_eq!(out["summary"]["warnings"], 1);
        assert_eq!(out["summary"]["files"], 3);
        assert_eq!(out["findings"][0]["severity"], "warning");
        assert_eq!(out["findings"][0]["group"], "dependencies");
        assert_eq!(out["findings"][1]["location"]["path"], "app/page.tsx");
        assert_eq!(out["findings"][1]["location"]["line"], 9);
        assert_eq!(out["findings"][1]["rule"], "request-api-await");
    }

    #[test]
    fn test_human_report_sections_and_hint() {
        let text = compose_scan_human(&sample(), false);
        assert!(text.contains("Scanning: /work/site"));
        assert!(text.contains("1. Checking Dependencies"));
        assert!(text.contains("4. Checking TypeScript/JavaScript Files"));
        assert!(text.contains("[WARNING] package.json:4\n  → Next.js version"));
        assert!(text.contains("[ERROR] app/page.tsx:9\n  → cookies() must be awaited"));
        assert!(text.contains("Found 2 potential issues (1 errors, 1 warnings)."));
        assert!(text.contains(CODEMOD));
        let deps = text.find("package.json:4").unwrap();
        let src = text.find("app/page.tsx:9").unwrap();
        assert!(deps < src);
    }

    #[test]
    fn test_human_report_success_state() {
        let res = ScanResult {
            root: ".".into(),
            findings: vec![],
            files_scanned: 0,
        };
        let text = compose_scan_human(&res, false);
        assert!(text.contains("No migration issues found!"));
        assert!(!text.contains(CODEMOD));
    }

    #[test]
    fn test_rules_json_lists_registry() {
        let out = compose_rules_json();
        let arr = out.as_array().unwrap();
        assert_eq!(arr.len(), PROJECT_RULES.len() + CONTENT_RULES.len());
        assert_eq!(arr[0]["id"], "manifest-missing");
        assert_eq!(arr.last().unwrap()["group"], "source");
    }
}
