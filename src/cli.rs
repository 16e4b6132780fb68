use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(
    name = "py-licenses",
    about = "List installed Python package licenses and enforce license policy",
    version
)]
pub struct Cli {
    /// Path to the python executable whose environment is inspected
    #[arg(long, value_name = "PYTHON_EXEC")]
    pub python: Option<PathBuf>,

    /// Where to find license information [default: mixed]
    #[arg(long = "from", value_name = "SOURCE")]
    pub from_source: Option<FromArg>,

    /// Order rows by column [default: name]
    #[arg(short, long, value_name = "COL")]
    pub order: Option<OrderArg>,

    /// Output format style [default: plain]
    #[arg(short, long, value_name = "STYLE")]
    pub format: Option<FormatArg>,

    /// Dump a count of packages per license instead of one row per package
    #[arg(long)]
    pub summary: bool,

    /// Save the report to a file instead of printing it
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Ignore packages by name or name:version (repeatable)
    #[arg(short, long, value_name = "PKG", num_args = 1..)]
    pub ignore_packages: Vec<String>,

    /// Only include the selected packages in the report (repeatable)
    #[arg(short, long, value_name = "PKG", num_args = 1..)]
    pub packages: Vec<String>,

    /// Include system/bookkeeping packages (pip, setuptools, ...)
    #[arg(short = 's', long)]
    pub with_system: bool,

    /// Include the package author column
    #[arg(short = 'a', long)]
    pub with_authors: bool,

    /// Include the package maintainer column
    #[arg(long)]
    pub with_maintainers: bool,

    /// Include the package homepage column
    #[arg(short = 'u', long)]
    pub with_urls: bool,

    /// Include the short package description column
    #[arg(short = 'd', long)]
    pub with_description: bool,

    /// Drop the version column
    #[arg(long)]
    pub no_version: bool,

    /// Include license file locations and contents, best paired with JSON
    #[arg(short = 'l', long)]
    pub with_license_file: bool,

    /// With --with-license-file, suppress the license file location column
    #[arg(long)]
    pub no_license_path: bool,

    /// With --with-license-file, also include notice file contents
    #[arg(long)]
    pub with_notice_file: bool,

    /// Re-encode output strings through the filter code page
    #[arg(long)]
    pub filter_strings: bool,

    /// Code page used by --filter-strings [default: latin-1]
    #[arg(long, value_name = "CODE")]
    pub filter_code_page: Option<String>,

    /// Exit with code 1 when one of these semicolon-separated licenses is found
    #[arg(long, value_name = "LICENSES")]
    pub fail_on: Option<String>,

    /// Exit with code 1 when a license outside this semicolon-separated list is found
    #[arg(long, value_name = "LICENSES")]
    pub allow_only: Option<String>,

    /// Substring matching for --fail-on/--allow-only instead of exact matching
    #[arg(long)]
    pub partial_match: bool,

    /// Report every policy failure after processing all packages instead of
    /// aborting on the first one
    #[arg(long)]
    pub collect_all_failures: bool,

    /// Configuration file [default: ./pyproject.toml, section [tool.py-licenses]]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Metadata source used to resolve a package's license names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FromArg {
    Meta,
    Classifier,
    Mixed,
    All,
}

/// Sort column selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderArg {
    Count,
    License,
    Name,
    Author,
    Maintainer,
    Url,
}

/// Output serialization style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatArg {
    Plain,
    PlainVertical,
    Markdown,
    Rst,
    Confluence,
    Html,
    Json,
    JsonLicenseFinder,
    Csv,
}
