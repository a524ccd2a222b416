//! nextcheck CLI binary entry point.
//! Resolves configuration, runs the scan and prints results.

use clap::Parser;
use nextcheck::cli::{Cli, Commands};
use nextcheck::config;
use nextcheck::{output, scan, utils};
use tracing::debug;

/// Initialize tracing on stderr: `warn` by default, `debug` with `--verbose`.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{filter::LevelFilter, fmt};

    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let _ = fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    debug!("logging initialized at level {}", level);
}

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Rules { output } => {
            let mut warnings = Vec::new();
            let mode = config::parse_output(output, &mut warnings);
            for w in &warnings {
                eprintln!("{} {}", utils::warn_prefix(), w);
            }
            output::print_rules(mode);
        }
        Commands::Scan {
            repo_root,
            output,
            fail_on,
            disable,
            verbose,
        } => {
            init_logging(verbose);
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                output.as_deref(),
                fail_on.as_deref(),
                &disable,
            );
            for w in &eff.warnings {
                eprintln!("{} {}", utils::warn_prefix(), w);
            }
            if !eff.config_loaded {
                debug!("no nextcheck config found; using defaults");
            }
            let result = match scan::run_scan(&eff.project, &eff.scan) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(2);
                }
            };
            output::print_scan(&result, eff.output);
            let summary = result.summary();
            if eff.fail_on.should_fail(summary.errors, summary.warnings) {
                std::process::exit(1);
            }
        }
    }
}
