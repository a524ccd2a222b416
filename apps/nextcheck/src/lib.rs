//! nextcheck core library.
//!
//! This crate exposes programmatic APIs for scanning a Next.js project for
//! changes required by the Next.js 16 release.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `walk`: Source walker over `app/` and `src/`.
//! - `detectors`: Rule registry and the individual detectors.
//! - `scan`: Scan runner and finding aggregator.
//! - `models`: Findings, severities, scan targets and summaries.
//! - `output`: Human/JSON printers.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod config;
pub mod detectors;
pub mod models;
pub mod output;
pub mod scan;
pub mod utils;
pub mod walk;
