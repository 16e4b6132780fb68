use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::{FormatArg, FromArg, OrderArg};

/// Name of the configuration section inside `pyproject.toml`.
pub const TOML_SECTION_NAME: &str = "py-licenses";

/// Configuration defaults loaded from a `[tool.py-licenses]` section.
///
/// Every key mirrors a command-line flag; explicit command-line values win
/// over configured ones, and boolean flags OR with the configured value.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub python: Option<String>,
    pub from: Option<FromArg>,
    pub order: Option<OrderArg>,
    pub format: Option<FormatArg>,
    pub summary: Option<bool>,
    pub output_file: Option<String>,
    pub ignore_packages: Option<Vec<String>>,
    pub packages: Option<Vec<String>>,
    pub with_system: Option<bool>,
    pub with_authors: Option<bool>,
    pub with_maintainers: Option<bool>,
    pub with_urls: Option<bool>,
    pub with_description: Option<bool>,
    pub no_version: Option<bool>,
    pub with_license_file: Option<bool>,
    pub no_license_path: Option<bool>,
    pub with_notice_file: Option<bool>,
    pub filter_strings: Option<bool>,
    pub filter_code_page: Option<String>,
    pub fail_on: Option<String>,
    pub allow_only: Option<String>,
    pub partial_match: Option<bool>,
    pub collect_all_failures: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct Pyproject {
    #[serde(default)]
    tool: ToolSection,
}

#[derive(Debug, Default, Deserialize)]
struct ToolSection {
    #[serde(default, rename = "py-licenses")]
    py_licenses: Option<Config>,
}

/// Load configuration defaults, searching in order:
///
/// 1. `config_override` — path passed via `--config` (must exist)
/// 2. `./pyproject.toml`, section `[tool.py-licenses]`
/// 3. Built-in [`Config::default`] (everything unset)
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        return parse_config(&content, path);
    }

    let pyproject = Path::new("pyproject.toml");
    if pyproject.exists() {
        let content = std::fs::read_to_string(pyproject)
            .with_context(|| format!("cannot read config file {}", pyproject.display()))?;
        return parse_config(&content, pyproject);
    }

    Ok(Config::default())
}

fn parse_config(content: &str, path: &Path) -> Result<Config> {
    let pyproject: Pyproject = toml::from_str(content)
        .with_context(|| format!("invalid TOML in {}", path.display()))?;
    Ok(pyproject.tool.py_licenses.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_missing_section_yields_defaults() {
        let config = parse_config("[tool.other]\nkey = 1\n", Path::new("pyproject.toml")).unwrap();
        assert!(config.format.is_none());
        assert!(config.summary.is_none());
    }

    #[test]
    fn test_section_values() {
        let config = parse_config(
            concat!(
                "[tool.py-licenses]\n",
                "format = \"markdown\"\n",
                "from = \"all\"\n",
                "with-system = true\n",
                "ignore-packages = [\"pip\", \"wheel\"]\n",
                "fail-on = \"GPL-3.0-only;AGPL-3.0-only\"\n",
            ),
            Path::new("pyproject.toml"),
        )
        .unwrap();
        assert_eq!(config.format, Some(FormatArg::Markdown));
        assert_eq!(config.from, Some(FromArg::All));
        assert_eq!(config.with_system, Some(true));
        assert_eq!(
            config.ignore_packages.as_deref(),
            Some(["pip".to_string(), "wheel".to_string()].as_slice())
        );
        assert_eq!(config.fail_on.as_deref(), Some("GPL-3.0-only;AGPL-3.0-only"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = parse_config(
            "[tool.py-licenses]\nnot-a-key = true\n",
            Path::new("pyproject.toml"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_config_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[tool.py-licenses]").unwrap();
        writeln!(file, "order = \"license\"").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.order, Some(OrderArg::License));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/pyproject.toml"))).is_err());
    }
}
