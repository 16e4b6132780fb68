//! Report construction and serialization.
//!
//! A [`Table`] is built once from the collector stream, sorted by the
//! resolved sort column, and handed to one of the style renderers:
//!
//! - [`grid`] — plain, plain-vertical, markdown, rst, confluence
//! - [`json`] — pretty JSON and the compact license-finder variant
//! - [`csv`] — RFC 4180 with every value quoted
//! - [`html`] — table markup with numeric character references

pub mod csv;
pub mod grid;
pub mod html;
pub mod json;

use anyhow::Result;

use crate::cli::{FormatArg, FromArg};
use crate::collector::PolicyViolation;
use crate::fields::{output_fields, sort_field, OutputField};
use crate::models::{PackageRecord, LICENSE_UNKNOWN};
use crate::options::Options;

/// Rows of cells aligned with an ordered field list. Built once, sorted by a
/// single column, then serialized; never mutated otherwise.
#[derive(Debug)]
pub struct Table {
    pub fields: Vec<OutputField>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Stable sort by one column. Count sorts numerically, everything else
    /// lexicographically. A column that is not part of the table leaves the
    /// row order untouched.
    pub fn sort_by(&mut self, field: OutputField) {
        let Some(index) = self.fields.iter().position(|f| *f == field) else {
            return;
        };
        if field == OutputField::Count {
            self.rows
                .sort_by_key(|row| row[index].parse::<u64>().unwrap_or(0));
        } else {
            self.rows.sort_by(|a, b| a[index].cmp(&b[index]));
        }
    }
}

/// Build the table for the active options, consume the package stream, and
/// serialize it in the requested format.
pub fn create_output_string<I>(opts: &Options, packages: I) -> Result<String>
where
    I: Iterator<Item = Result<PackageRecord, PolicyViolation>>,
{
    let mut table = if opts.summary {
        create_summary_table(opts, packages)?
    } else {
        create_licenses_table(opts, &output_fields(opts), packages)?
    };
    table.sort_by(sort_field(opts));

    Ok(match opts.format {
        FormatArg::Plain => grid::plain(&table),
        FormatArg::PlainVertical => grid::plain_vertical(&table),
        FormatArg::Markdown => grid::bordered(&table, grid::Style::MARKDOWN),
        FormatArg::Rst => grid::bordered(&table, grid::Style::RST),
        FormatArg::Confluence => grid::bordered(&table, grid::Style::CONFLUENCE),
        FormatArg::Html => html::render(&table),
        FormatArg::Json => json::render(&table)?,
        FormatArg::JsonLicenseFinder => json::render_license_finder(&table)?,
        FormatArg::Csv => csv::render(&table),
    })
}

/// One row per surviving package.
fn create_licenses_table<I>(
    opts: &Options,
    fields: &[OutputField],
    packages: I,
) -> Result<Table, PolicyViolation>
where
    I: Iterator<Item = Result<PackageRecord, PolicyViolation>>,
{
    let mut rows = Vec::new();
    for pkg in packages {
        let pkg = pkg?;
        rows.push(build_row(&pkg, fields, opts.from));
    }
    Ok(Table {
        fields: fields.to_vec(),
        rows,
    })
}

/// Count of packages per distinct license set.
fn create_summary_table<I>(opts: &Options, packages: I) -> Result<Table, PolicyViolation>
where
    I: Iterator<Item = Result<PackageRecord, PolicyViolation>>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for pkg in packages {
        let pkg = pkg?;
        let license = joined_license_names(&pkg, opts.from);
        match counts.iter_mut().find(|(name, _)| *name == license) {
            Some((_, count)) => *count += 1,
            None => counts.push((license, 1)),
        }
    }

    Ok(Table {
        fields: vec![OutputField::Count, OutputField::License],
        rows: counts
            .into_iter()
            .map(|(license, count)| vec![count.to_string(), license])
            .collect(),
    })
}

fn build_row(pkg: &PackageRecord, fields: &[OutputField], from: FromArg) -> Vec<String> {
    fields
        .iter()
        .map(|field| match field {
            OutputField::Name => pkg.name.clone(),
            OutputField::Version => pkg.version.clone(),
            OutputField::License => joined_license_names(pkg, from),
            OutputField::LicenseMetadata => pkg
                .license_metadata
                .clone()
                .unwrap_or_else(|| LICENSE_UNKNOWN.to_string()),
            OutputField::LicenseClassifier => {
                if pkg.license_classifiers.is_empty() {
                    LICENSE_UNKNOWN.to_string()
                } else {
                    let mut classifiers = pkg.license_classifiers.clone();
                    classifiers.sort();
                    classifiers.join("; ")
                }
            }
            OutputField::Author => pkg.author.clone(),
            OutputField::Maintainer => pkg.maintainer.clone(),
            OutputField::Url => pkg.homepage.clone(),
            OutputField::Description => pkg.summary.clone(),
            OutputField::LicenseFile => first_path(&pkg.license_files),
            OutputField::LicenseText => first_text(&pkg.license_files),
            OutputField::NoticeFile => first_path(&pkg.notice_files),
            OutputField::NoticeText => first_text(&pkg.notice_files),
            // summary rows are built directly, never through build_row
            OutputField::Count => String::new(),
        })
        .collect()
}

fn joined_license_names(pkg: &PackageRecord, from: FromArg) -> String {
    pkg.license_names(from)
        .into_iter()
        .collect::<Vec<_>>()
        .join("; ")
}

fn first_path(files: &[crate::models::FileContent]) -> String {
    files
        .first()
        .map(|file| file.path.clone())
        .unwrap_or_else(|| LICENSE_UNKNOWN.to_string())
}

fn first_text(files: &[crate::models::FileContent]) -> String {
    files
        .first()
        .map(|file| file.text.clone())
        .unwrap_or_else(|| LICENSE_UNKNOWN.to_string())
}
