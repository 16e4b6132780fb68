use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::cli::{Cli, FormatArg, FromArg, OrderArg};
use crate::config::Config;
use crate::filters::CodePage;

/// Fully resolved invocation options: command line over configuration file
/// over built-in defaults. Boolean flags OR with the configured value, so a
/// config file can switch them on but not veto an explicit flag.
#[derive(Debug, Clone)]
pub struct Options {
    pub python: PathBuf,
    pub from: FromArg,
    pub order: OrderArg,
    pub format: FormatArg,
    pub summary: bool,
    pub output_file: Option<PathBuf>,
    pub ignore_packages: Vec<String>,
    pub packages: Vec<String>,
    pub with_system: bool,
    pub with_authors: bool,
    pub with_maintainers: bool,
    pub with_urls: bool,
    pub with_description: bool,
    pub no_version: bool,
    pub with_license_file: bool,
    pub no_license_path: bool,
    pub with_notice_file: bool,
    pub filter_strings: bool,
    pub filter_code_page: CodePage,
    pub fail_on: Option<String>,
    pub allow_only: Option<String>,
    pub partial_match: bool,
    pub collect_all_failures: bool,
}

impl Options {
    /// Merge the parsed command line with configuration defaults and verify
    /// flag consistency. Inconsistent combinations are configuration errors
    /// reported before any package is inspected.
    pub fn resolve(cli: Cli, config: Config) -> Result<Self> {
        let flag = |from_cli: bool, from_config: Option<bool>| from_cli || from_config.unwrap_or(false);

        let with_license_file = flag(cli.with_license_file, config.with_license_file);
        let no_license_path = flag(cli.no_license_path, config.no_license_path);
        let with_notice_file = flag(cli.with_notice_file, config.with_notice_file);
        if !with_license_file && (no_license_path || with_notice_file) {
            bail!(
                "'--no-license-path' and '--with-notice-file' require the \
                 '--with-license-file' option to be set"
            );
        }

        let filter_strings = flag(cli.filter_strings, config.filter_strings);
        let code_page_name = cli
            .filter_code_page
            .or(config.filter_code_page)
            .unwrap_or_else(|| "latin-1".to_string());
        let Some(filter_code_page) = CodePage::from_name(&code_page_name) else {
            bail!(
                "invalid code page '{code_page_name}' given for '--filter-code-page', \
                 supported code pages: latin-1, ascii, utf-8"
            );
        };
        if !filter_strings && filter_code_page != CodePage::Latin1 {
            bail!("'--filter-code-page' requires the '--filter-strings' option to be set");
        }

        Ok(Options {
            python: cli
                .python
                .or_else(|| config.python.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("python3")),
            from: cli.from_source.or(config.from).unwrap_or(FromArg::Mixed),
            order: cli.order.or(config.order).unwrap_or(OrderArg::Name),
            format: cli.format.or(config.format).unwrap_or(FormatArg::Plain),
            summary: flag(cli.summary, config.summary),
            output_file: cli
                .output_file
                .or_else(|| config.output_file.map(PathBuf::from)),
            ignore_packages: if cli.ignore_packages.is_empty() {
                config.ignore_packages.unwrap_or_default()
            } else {
                cli.ignore_packages
            },
            packages: if cli.packages.is_empty() {
                config.packages.unwrap_or_default()
            } else {
                cli.packages
            },
            with_system: flag(cli.with_system, config.with_system),
            with_authors: flag(cli.with_authors, config.with_authors),
            with_maintainers: flag(cli.with_maintainers, config.with_maintainers),
            with_urls: flag(cli.with_urls, config.with_urls),
            with_description: flag(cli.with_description, config.with_description),
            no_version: flag(cli.no_version, config.no_version),
            with_license_file,
            no_license_path,
            with_notice_file,
            filter_strings,
            filter_code_page,
            fail_on: cli.fail_on.or(config.fail_on),
            allow_only: cli.allow_only.or(config.allow_only),
            partial_match: flag(cli.partial_match, config.partial_match),
            collect_all_failures: flag(cli.collect_all_failures, config.collect_all_failures),
        })
    }

    #[cfg(test)]
    pub fn default_for_tests() -> Self {
        Options {
            python: PathBuf::from("python3"),
            from: FromArg::Mixed,
            order: OrderArg::Name,
            format: FormatArg::Plain,
            summary: false,
            output_file: None,
            ignore_packages: Vec::new(),
            packages: Vec::new(),
            with_system: false,
            with_authors: false,
            with_maintainers: false,
            with_urls: false,
            with_description: false,
            no_version: false,
            with_license_file: false,
            no_license_path: false,
            with_notice_file: false,
            filter_strings: false,
            filter_code_page: CodePage::Latin1,
            fail_on: None,
            allow_only: None,
            partial_match: false,
            collect_all_failures: false,
        }
    }
}
