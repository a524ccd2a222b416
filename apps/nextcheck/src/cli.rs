//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "nextcheck",
    version,
    about = "Next.js 16 migration checker",
    long_about = "nextcheck — scan a Next.js project for code that breaks or needs changes when upgrading to Next.js 16.\n\nConfiguration precedence: CLI > nextcheck.toml > defaults.",
    after_help = "Examples:\n  nextcheck scan\n  nextcheck scan --repo-root ../shop --output json\n  nextcheck scan --fail-on error --disable revalidate-tag-profile\n  nextcheck rules",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current nextcheck version."
    )]
    Version,
    /// Scan a project for migration issues
    #[command(
        about = "Scan a project",
        long_about = "Check package.json, middleware, parallel route slots and app/src sources for Next.js 16 migration issues.",
        after_help = "Examples:\n  nextcheck scan --repo-root .\n  nextcheck scan --output json"
    )]
    Scan {
        #[arg(long, help = "Project root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Exit non-zero on: any|error|never (default: any)")]
        fail_on: Option<String>,
        #[arg(long = "disable", value_name = "RULE", help = "Skip a rule by id (repeatable)")]
        disable: Vec<String>,
        #[arg(short, long, action = clap::ArgAction::SetTrue, help = "Log scan progress to stderr")]
        verbose: bool,
    },
    /// List the built-in rules
    #[command(
        about = "List rules",
        long_about = "List every built-in rule with its id, group, severity and description."
    )]
    Rules {
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}
