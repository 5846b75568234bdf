//! namedupe - find folders and files that share a name
//!
//! Walks one or more directory trees, bucketing folders (or files) by their
//! case-insensitive name. In `perfect` mode, same-named entries only count as
//! duplicates when their size, and for folders their nested file count, agree
//! within 10%.
//!
//! The library entry point is [`duplicates::DuplicateFinder`]; the binary is a
//! thin wrapper around [`run_app`].

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{write_report, Render};
use crate::progress::Progress;

/// Run the command described by `cli` and return the exit code to use.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, a root is invalid,
/// the scan is interrupted, or output cannot be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    let mut config =
        Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Config => {
            let source = cli.config.clone().or_else(Config::default_path);
            if let Some(path) = source.filter(|p| p.is_file()) {
                println!("# loaded from {}", path.display());
            }
            print!("{}", config.to_toml()?);
            Ok(ExitCode::Success)
        }
        Commands::List(args) => {
            config.merge_walk_args(&args.walk);
            let finder = build_finder(&config, cli.quiet)?;
            let report = finder
                .scan(&args.path, args.walk.kind())
                .with_context(|| format!("Failed to list {}", args.path.display()))?;

            log::info!(
                "Listed {} {} in {:.2?}",
                report.entries.len(),
                report.kind,
                report.scan_duration
            );
            let code = ExitCode::for_listing(report.skipped);
            emit(&report, &config, cli.no_color, code)?;
            Ok(code)
        }
        Commands::Find(args) => {
            config.merge_walk_args(&args.walk);
            config.merge_mode(args.mode);
            let finder = build_finder(&config, cli.quiet)?;
            let report = finder
                .find_duplicates(&args.path, args.walk.kind(), config.search_mode)
                .with_context(|| {
                    format!("Failed to search {} for duplicates", args.path.display())
                })?;

            log::info!(
                "Found {} duplicate groups in {:.2?}",
                report.groups.len(),
                report.scan_duration
            );
            let code = ExitCode::for_search(report.groups.len(), report.skipped);
            emit(&report, &config, cli.no_color, code)?;
            Ok(code)
        }
        Commands::Compare(args) => {
            config.merge_walk_args(&args.walk);
            config.merge_mode(args.mode);
            let finder = build_finder(&config, cli.quiet)?;
            let report = finder
                .compare_roots(&args.paths, args.walk.kind(), config.search_mode)
                .context("Failed to compare directories")?;

            log::info!(
                "Found {} duplicate groups across {} roots in {:.2?}",
                report.groups.len(),
                report.roots.len(),
                report.scan_duration
            );
            let code = ExitCode::for_search(report.groups.len(), report.skipped);
            emit(&report, &config, cli.no_color, code)?;
            Ok(code)
        }
    }
}

/// Finder wired to Ctrl+C and, for interactive text output, a spinner.
fn build_finder(config: &Config, quiet: bool) -> Result<DuplicateFinder> {
    let handler = signal::install_handler()?;

    let mut finder_config = FinderConfig::default()
        .with_walker_config(config.walker_config())
        .with_shutdown_flag(handler.get_flag());

    if !quiet && config.output == OutputFormat::Text {
        finder_config = finder_config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    log::debug!("Finder configuration: {:?}", finder_config);
    Ok(DuplicateFinder::new(finder_config))
}

fn emit<R: Render>(report: &R, config: &Config, no_color: bool, code: ExitCode) -> Result<()> {
    let stdout = std::io::stdout();
    let color = !no_color && stdout.is_terminal();
    let mut out = stdout.lock();
    write_report(report, config.output, color, code, &mut out).context("Failed to write output")
}
