use std::collections::BTreeSet;

use colored::Colorize;
use thiserror::Error;

use crate::filters::filter_record;
use crate::license::expression::{LicenseExpressionParser, ParserMode};
use crate::license::set_ops::{
    case_insensitive_diff, case_insensitive_intersect, partial_match_diff, partial_match_intersect,
};
use crate::models::{normalize_package_name, PackageRecord};
use crate::options::Options;

/// Bookkeeping packages excluded from reports unless `--with-system` is set.
pub const SYSTEM_PACKAGES: &[&str] = &["pip", "setuptools", "wheel", "pkg-resources"];

/// One or more packages violated the `--fail-on` / `--allow-only` policy.
/// Each message is pre-formatted and newline-terminated.
#[derive(Debug, Error)]
#[error("{}", .messages.concat())]
pub struct PolicyViolation {
    pub messages: Vec<String>,
}

/// Split a semicolon-separated license list into a set, dropping empty items.
pub fn parse_licenses_list(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|list| {
        list.split(';')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Single-pass filtering and policy pipeline over a package source.
///
/// Yields surviving records in source order. A policy violation surfaces as
/// an `Err` item: immediately for the offending package, or once after the
/// source is exhausted when `--collect-all-failures` buffers them. Violating
/// packages are still yielded in collect-all mode, matching the report the
/// violation aborts.
pub struct PackageCollector<'a, I> {
    source: I,
    opts: &'a Options,
    parser: LicenseExpressionParser,
    ignore_packages: Vec<String>,
    packages: Vec<String>,
    fail_on_licenses: BTreeSet<String>,
    allow_only_licenses: BTreeSet<String>,
    failures: Vec<String>,
    finished: bool,
}

impl<'a, I: Iterator<Item = PackageRecord>> PackageCollector<'a, I> {
    pub fn new(source: I, opts: &'a Options) -> Self {
        Self {
            source,
            opts,
            parser: LicenseExpressionParser::new(ParserMode::Spdx),
            ignore_packages: opts
                .ignore_packages
                .iter()
                .map(|pkg| normalize_ignore_entry(pkg))
                .collect(),
            packages: opts
                .packages
                .iter()
                .map(|pkg| normalize_package_name(pkg))
                .collect(),
            fail_on_licenses: parse_licenses_list(opts.fail_on.as_deref()),
            allow_only_licenses: parse_licenses_list(opts.allow_only.as_deref()),
            failures: Vec::new(),
            finished: false,
        }
    }

    /// Parse every declared license name and union the results.
    fn parsed_license_names(&mut self, pkg: &PackageRecord) -> BTreeSet<String> {
        let mut parsed = BTreeSet::new();
        for expression in pkg.license_names(self.opts.from) {
            parsed.extend(self.parser.parse(&expression));
        }
        for warning in self.parser.take_warnings() {
            eprintln!("{}", warning.yellow());
        }
        parsed
    }

    /// Evaluate fail-on, then allow-only when fail-on did not already flag
    /// the package. Returns the formatted failure message, if any.
    fn check_policy(&self, pkg: &PackageRecord, parsed: &BTreeSet<String>) -> Option<String> {
        if !self.fail_on_licenses.is_empty() {
            let failed = if self.opts.partial_match {
                partial_match_intersect(parsed, &self.fail_on_licenses)
            } else {
                case_insensitive_intersect(parsed, &self.fail_on_licenses)
            };
            if !failed.is_empty() {
                return Some(format!(
                    "fail-on license {} was found for package {}:{}\n",
                    join_sorted(&failed),
                    pkg.name,
                    pkg.version
                ));
            }
        }

        if !self.allow_only_licenses.is_empty() {
            let uncommon = if self.opts.partial_match {
                partial_match_diff(parsed, &self.allow_only_licenses)
            } else {
                case_insensitive_diff(parsed, &self.allow_only_licenses)
            };
            // No declared license matched the allow list; note that a
            // package without any license fails here as well.
            if uncommon.len() == parsed.len() {
                return Some(format!(
                    "license {} not in allow-only licenses was found for package {}:{}\n",
                    join_sorted(&uncommon),
                    pkg.name,
                    pkg.version
                ));
            }
        }

        None
    }
}

impl<I: Iterator<Item = PackageRecord>> Iterator for PackageCollector<'_, I> {
    type Item = Result<PackageRecord, PolicyViolation>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let Some(pkg) = self.source.next() else {
                self.finished = true;
                if self.failures.is_empty() {
                    return None;
                }
                return Some(Err(PolicyViolation {
                    messages: std::mem::take(&mut self.failures),
                }));
            };

            let pkg_name = normalize_package_name(&pkg.name);
            let pkg_name_and_version =
                format!("{}:{}", pkg_name, pkg.version.to_lowercase());

            if self.ignore_packages.contains(&pkg_name)
                || self.ignore_packages.contains(&pkg_name_and_version)
            {
                continue;
            }

            if !self.packages.is_empty() && !self.packages.contains(&pkg_name) {
                continue;
            }

            if !self.opts.with_system && SYSTEM_PACKAGES.contains(&pkg_name.as_str()) {
                continue;
            }

            let pkg = if self.opts.filter_strings {
                filter_record(&pkg, self.opts.filter_code_page)
            } else {
                pkg
            };

            let parsed = self.parsed_license_names(&pkg);

            if let Some(message) = self.check_policy(&pkg, &parsed) {
                if !self.opts.collect_all_failures {
                    self.finished = true;
                    return Some(Err(PolicyViolation {
                        messages: vec![message],
                    }));
                }
                self.failures.push(message);
            }

            return Some(Ok(pkg));
        }
    }
}

/// Normalize one `--ignore-packages` entry: the name part is canonicalized,
/// an optional `:version` suffix is only lowercased.
fn normalize_ignore_entry(entry: &str) -> String {
    match entry.split_once(':') {
        Some((name, version)) => {
            format!("{}:{}", normalize_package_name(name), version.to_lowercase())
        }
        None => normalize_package_name(entry),
    }
}

fn join_sorted(licenses: &BTreeSet<String>) -> String {
    licenses.iter().cloned().collect::<Vec<_>>().join("; ")
}
