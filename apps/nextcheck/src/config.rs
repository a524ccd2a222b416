//! Configuration discovery and effective settings resolution.
//!
//! nextcheck reads `nextcheck.toml|yaml|yml` from the scanned project root
//! and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `output`: `human`
//! - `fail_on`: `any`
//! - `scan.roots`: `["app", "src"]`
//! - `scan.extensions`: `["ts", "tsx", "js", "jsx"]`
//! - `scan.exclude`: `["node_modules", ".next"]`
//! - `rules.disable`: empty
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::scan::ScanOptions;
use crate::walk::WalkPolicy;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_TOML: &str = "nextcheck.toml";
pub const CONFIG_YAML: [&str; 2] = ["nextcheck.yaml", "nextcheck.yml"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Walker overrides under `[scan]`.
pub struct ScanCfg {
    pub roots: Option<Vec<String>>,
    pub extensions: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Rule selection under `[rules]`.
pub struct RulesCfg {
    #[serde(default)]
    pub disable: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `nextcheck.toml|yaml`.
pub struct NextcheckConfig {
    pub output: Option<String>,
    pub fail_on: Option<String>,
    #[serde(default)]
    pub scan: Option<ScanCfg>,
    #[serde(default)]
    pub rules: Option<RulesCfg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Output mode for printers.
pub enum OutputMode {
    Human,
    Json,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(OutputMode::Human),
            "json" => Ok(OutputMode::Json),
            other => Err(format!("unknown output mode '{}' (expected human|json)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which findings make the process exit non-zero.
pub enum FailOn {
    Any,
    Error,
    Never,
}

impl FromStr for FailOn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(FailOn::Any),
            "error" => Ok(FailOn::Error),
            "never" => Ok(FailOn::Never),
            other => Err(format!("unknown fail-on '{}' (expected any|error|never)", other)),
        }
    }
}

impl FailOn {
    /// True when a run with these counts should fail.
    pub fn should_fail(self, errors: usize, warnings: usize) -> bool {
        match self {
            FailOn::Any => errors + warnings > 0,
            FailOn::Error => errors > 0,
            FailOn::Never => false,
        }
    }
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub project: PathBuf,
    pub output: OutputMode,
    pub fail_on: FailOn,
    pub scan: ScanOptions,
    /// Non-fatal problems found while resolving (bad values, unknown rules).
    pub warnings: Vec<String>,
    /// True when a config file was found and parsed.
    pub config_loaded: bool,
}

/// Load `NextcheckConfig` from `nextcheck.toml` or `nextcheck.yaml|yml`.
///
/// `Ok(None)` when no config file exists.
pub fn load_config(root: &Path) -> Result<Option<NextcheckConfig>, ConfigError> {
    let toml_path = root.join(CONFIG_TOML);
    if toml_path.is_file() {
        let s = read(&toml_path)?;
        let cfg = toml::from_str(&s).map_err(|source| ConfigError::Toml {
            path: toml_path.clone(),
            source,
        })?;
        return Ok(Some(cfg));
    }
    for yml in CONFIG_YAML {
        let p = root.join(yml);
        if p.is_file() {
            let s = read(&p)?;
            let cfg = serde_yaml::from_str(&s).map_err(|source| ConfigError::Yaml {
                path: p.clone(),
                source,
            })?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse an output mode, falling back to `human` with a warning when the
/// value is not recognized.
pub fn parse_output(value: Option<String>, warnings: &mut Vec<String>) -> OutputMode {
    match value.map(|s| s.parse::<OutputMode>()) {
        None => OutputMode::Human,
        Some(Ok(mode)) => mode,
        Some(Err(e)) => {
            warnings.push(format!("{}; using human", e));
            OutputMode::Human
        }
    }
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
///
/// A missing project directory is not checked here; the scan reports it.
pub fn resolve_effective(
    cli_project: Option<&str>,
    cli_output: Option<&str>,
    cli_fail_on: Option<&str>,
    cli_disable: &[String],
) -> Effective {
    let project = PathBuf::from(cli_project.unwrap_or("."));
    let mut warnings = Vec::new();
    let (cfg, config_loaded) = match load_config(&project) {
        Ok(Some(c)) => (c, true),
        Ok(None) => (NextcheckConfig::default(), false),
        Err(e) => {
            warnings.push(format!("{}; using defaults", e));
            (NextcheckConfig::default(), false)
        }
    };

    let output = parse_output(cli_output.map(str::to_string).or(cfg.output), &mut warnings);

    let fail_on = cli_fail_on
        .map(|s| s.to_string())
        .or(cfg.fail_on)
        .map(|s| {
            s.parse::<FailOn>().unwrap_or_else(|e| {
                warnings.push(e);
                FailOn::Any
            })
        })
        .unwrap_or(FailOn::Any);

    let scan_cfg = cfg.scan.unwrap_or_default();
    let defaults = WalkPolicy::default();
    let walk = WalkPolicy {
        roots: scan_cfg.roots.unwrap_or(defaults.roots),
        extensions: scan_cfg
            .extensions
            .map(|exts| {
                exts.into_iter()
                    .map(|e| e.trim_start_matches('.').to_string())
                    .collect()
            })
            .unwrap_or(defaults.extensions),
        exclude: scan_cfg.exclude.unwrap_or(defaults.exclude),
    };
    for ext in walk
        .extensions
        .iter()
        .filter(|e| !crate::detectors::is_covered_extension(e))
    {
        warnings.push(format!(
            "extension '{}' is not checked by any rule; its files produce no findings",
            ext
        ));
    }

    let mut disabled = BTreeSet::new();
    let cfg_disable = cfg.rules.map(|r| r.disable).unwrap_or_default();
    for id in cfg_disable.iter().chain(cli_disable.iter()) {
        if !crate::detectors::is_known_rule(id) {
            warnings.push(format!("unknown rule id '{}' in disable list", id));
        }
        disabled.insert(id.clone());
    }

    Effective {
        project,
        output,
        fail_on,
        scan: ScanOptions { walk, disabled },
        warnings,
        config_loaded,
    }
}
