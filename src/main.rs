//! `py-licenses` — list installed Python package licenses and enforce license policy.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load configuration defaults ([`config::load_config`]).
//! 3. Resolve and verify the effective options ([`options`]).
//! 4. Enumerate installed distributions ([`discovery`]).
//! 5. Filter packages and evaluate license policy ([`collector`]).
//! 6. Build, sort and serialize the report ([`fields`], [`report`]).
//! 7. Exit `0` (report printed or saved) or `1` (policy violation,
//!    unwritable output file, configuration error).

mod cli;
mod collector;
mod config;
mod discovery;
mod fields;
mod filters;
mod license;
mod models;
mod options;
mod report;

use std::path::Path;
use std::process;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use cli::{Cli, FormatArg};
use collector::{PackageCollector, PolicyViolation};
use options::Options;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        if let Some(violation) = err.downcast_ref::<PolicyViolation>() {
            for message in &violation.messages {
                eprint!("{message}");
            }
        } else {
            eprintln!("{} {err:#}", "error:".red().bold());
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;
    let opts = Options::resolve(cli, config)?;

    let include_files = opts.with_license_file || opts.with_notice_file;
    let records = discovery::installed_packages(&opts.python, include_files)?;

    let collector = PackageCollector::new(records.into_iter(), &opts);
    let output = report::create_output_string(&opts, collector)?;

    save_if_needs(opts.output_file.as_deref(), &output);

    println!("{output}");
    let warnings = create_warn_string(&opts);
    if !warnings.is_empty() {
        eprintln!("{warnings}");
    }
    Ok(())
}

/// Save the report when `--output-file` is set. Writing ends the run either
/// way: `created path: FILE` and exit 0 on success, a short diagnostic on
/// stderr and exit 1 on failure. The report is then never printed to stdout.
fn save_if_needs(output_file: Option<&Path>, output: &str) {
    let Some(path) = output_file else { return };

    let mut content = output.to_string();
    if !content.ends_with('\n') {
        // output files always end with a newline
        content.push('\n');
    }

    match std::fs::write(path, content) {
        Ok(()) => {
            println!("created path: {}", path.display());
            process::exit(0);
        }
        Err(_) => {
            eprintln!("check path: --output-file");
            process::exit(1);
        }
    }
}

/// Advisory warnings for flag combinations that work but rarely do what the
/// user wants.
fn create_warn_string(opts: &Options) -> String {
    let mut messages = Vec::new();

    if opts.with_license_file && opts.format != FormatArg::Json {
        messages.push(
            "Due to the length of these fields, this option is best paired with --format=json."
                .yellow()
                .to_string(),
        );
    }
    if opts.summary && (opts.with_authors || opts.with_urls) {
        messages.push(
            "When using this option, only --order=count or --order=license has an effect for the \
             --order option. And using --with-authors and --with-urls will be ignored."
                .yellow()
                .to_string(),
        );
    }

    messages.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_on_license_file_without_json() {
        let mut opts = Options::default_for_tests();
        opts.with_license_file = true;
        assert!(create_warn_string(&opts).contains("best paired with --format=json"));

        opts.format = FormatArg::Json;
        assert!(create_warn_string(&opts).is_empty());
    }

    #[test]
    fn test_warn_on_summary_with_author_columns() {
        let mut opts = Options::default_for_tests();
        opts.summary = true;
        assert!(create_warn_string(&opts).is_empty());

        opts.with_authors = true;
        assert!(create_warn_string(&opts).contains("--order=count or --order=license"));
    }
}
