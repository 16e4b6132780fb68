use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use regex::Regex;

use crate::models::{normalize_package_name, FileContent, PackageRecord, LICENSE_UNKNOWN};

/// Enumerate the distributions installed in the environment of `python`.
///
/// The interpreter is asked for its module search path, and every entry is
/// scanned for `*.dist-info` / `*.egg-info` metadata. The first sighting of
/// a normalized name wins, mirroring how the interpreter itself resolves
/// imports. License and notice file contents are only read when
/// `include_files` is set.
pub fn installed_packages(python: &Path, include_files: bool) -> Result<Vec<PackageRecord>> {
    let search_path = interpreter_search_path(python)?;

    let license_file_re = Regex::new(r"(?i)^(LICEN[CS]E|COPYING|AUTHORS)")?;
    let notice_file_re = Regex::new(r"(?i)^NOTICE")?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();
    for dir in &search_path {
        scan_search_dir(
            dir,
            include_files,
            (&license_file_re, &notice_file_re),
            &mut seen,
            &mut records,
        )?;
    }

    records.sort_by_key(|pkg| normalize_package_name(&pkg.name));
    Ok(records)
}

/// Ask the interpreter for its `sys.path`.
fn interpreter_search_path(python: &Path) -> Result<Vec<PathBuf>> {
    let output = Command::new(python)
        .arg("-c")
        .arg("import sys, json; print(json.dumps(sys.path))")
        .output()
        .with_context(|| format!("cannot run python interpreter {}", python.display()))?;

    if !output.status.success() {
        bail!(
            "python interpreter {} exited with {}: {}",
            python.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let entries: Vec<String> = serde_json::from_slice(&output.stdout)
        .with_context(|| format!("unexpected sys.path output from {}", python.display()))?;

    Ok(entries
        .into_iter()
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Scan one search-path entry for distribution metadata directories.
/// Entries that are not readable directories (zip archives, stale paths) are
/// skipped, as the interpreter itself tolerates them.
fn scan_search_dir(
    dir: &Path,
    include_files: bool,
    file_patterns: (&Regex, &Regex),
    seen: &mut HashSet<String>,
    records: &mut Vec<PackageRecord>,
) -> Result<()> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Ok(());
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let record = if file_name.ends_with(".dist-info") && path.is_dir() {
            read_metadata_dir(&path, "METADATA", include_files, file_patterns)?
        } else if file_name.ends_with(".egg-info") && path.is_dir() {
            read_metadata_dir(&path, "PKG-INFO", include_files, file_patterns)?
        } else if file_name.ends_with(".egg-info") && path.is_file() {
            // legacy setuptools layout: the .egg-info entry is the PKG-INFO
            fs::read_to_string(&path)
                .ok()
                .and_then(|text| record_from_metadata(&text, Vec::new(), Vec::new()))
        } else {
            None
        };

        if let Some(record) = record {
            if seen.insert(normalize_package_name(&record.name)) {
                records.push(record);
            }
        }
    }

    Ok(())
}

fn read_metadata_dir(
    info_dir: &Path,
    metadata_name: &str,
    include_files: bool,
    file_patterns: (&Regex, &Regex),
) -> Result<Option<PackageRecord>> {
    let metadata_path = info_dir.join(metadata_name);
    let Ok(raw) = fs::read(&metadata_path) else {
        return Ok(None);
    };
    let text = String::from_utf8_lossy(&raw);

    let (license_files, notice_files) = if include_files {
        collect_distribution_files(info_dir, file_patterns)?
    } else {
        (Vec::new(), Vec::new())
    };

    Ok(record_from_metadata(&text, license_files, notice_files))
}

/// Build a record from RFC 822 metadata headers. Returns `None` when the
/// mandatory `Name` header is missing.
fn record_from_metadata(
    text: &str,
    license_files: Vec<FileContent>,
    notice_files: Vec<FileContent>,
) -> Option<PackageRecord> {
    let headers = parse_headers(text);
    let header = |key: &str| header_value(&headers, key);

    let name = header("Name")?.to_string();

    // PEP 639 expression header wins over the free-form License header.
    let license_metadata = header("License-Expression")
        .or_else(|| header("License"))
        .filter(|value| *value != LICENSE_UNKNOWN)
        .map(str::to_string);

    let license_classifiers = headers
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case("Classifier"))
        .filter_map(|(_, value)| classifier_license_name(value))
        .collect();

    let homepage = header("Home-page")
        .map(str::to_string)
        .or_else(|| project_url_homepage(&headers));

    let unknown = || LICENSE_UNKNOWN.to_string();
    Some(PackageRecord {
        name,
        version: header("Version").map(str::to_string).unwrap_or_else(unknown),
        license_metadata,
        license_classifiers,
        author: header("Author")
            .or_else(|| header("Author-email"))
            .map(str::to_string)
            .unwrap_or_else(unknown),
        maintainer: header("Maintainer")
            .or_else(|| header("Maintainer-email"))
            .map(str::to_string)
            .unwrap_or_else(unknown),
        homepage: homepage.unwrap_or_else(unknown),
        summary: header("Summary").map(str::to_string).unwrap_or_else(unknown),
        license_files,
        notice_files,
    })
}

/// First non-empty value of a header, compared case-insensitively.
fn header_value<'a>(headers: &'a [(String, String)], key: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
}

/// Parse the header block of an RFC 822 style metadata file. Continuation
/// lines fold into the preceding header; the body after the first blank line
/// is the long description and is ignored.
fn parse_headers(text: &str) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();
    for line in text.lines() {
        if line.is_empty() {
            break;
        }
        if let Some(rest) = line.strip_prefix(' ').or_else(|| line.strip_prefix('\t')) {
            if let Some((_, value)) = headers.last_mut() {
                value.push(' ');
                value.push_str(rest.trim());
            }
        } else if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_string(), value.trim().to_string()));
        }
    }
    headers
}

/// License name of a `License ::` trove classifier: the last `::` segment.
/// The bare `License :: OSI Approved` grouping carries no name and is
/// dropped.
fn classifier_license_name(classifier: &str) -> Option<String> {
    let mut segments = classifier.split("::").map(str::trim);
    if segments.next() != Some("License") {
        return None;
    }
    let name = segments.last()?;
    if name.is_empty() || name == "OSI Approved" {
        return None;
    }
    Some(name.to_string())
}

fn project_url_homepage(headers: &[(String, String)]) -> Option<String> {
    headers
        .iter()
        .filter(|(name, _)| name.eq_ignore_ascii_case("Project-URL"))
        .find_map(|(_, value)| {
            let (label, url) = value.split_once(',')?;
            let label = label.trim().to_ascii_lowercase();
            if label == "homepage" || label == "home-page" || label == "home" {
                Some(url.trim().to_string())
            } else {
                None
            }
        })
}

/// Gather license and notice files from the metadata directory and its
/// `licenses/` subdirectory (the wheel 1.0 vs PEP 639 layouts).
fn collect_distribution_files(
    info_dir: &Path,
    (license_re, notice_re): (&Regex, &Regex),
) -> Result<(Vec<FileContent>, Vec<FileContent>)> {
    let mut license_files = Vec::new();
    let mut notice_files = Vec::new();

    for dir in [info_dir.to_path_buf(), info_dir.join("licenses")] {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let bucket = if notice_re.is_match(file_name) {
                &mut notice_files
            } else if license_re.is_match(file_name) {
                &mut license_files
            } else {
                continue;
            };

            let raw = fs::read(&path)
                .with_context(|| format!("cannot read license file {}", path.display()))?;
            bucket.push(FileContent {
                path: path.display().to_string(),
                text: String::from_utf8_lossy(&raw).into_owned(),
            });
        }
    }

    license_files.sort_by(|a, b| a.path.cmp(&b.path));
    notice_files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok((license_files, notice_files))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const METADATA: &str = "\
Metadata-Version: 2.1
Name: demo-package
Version: 1.2.3
Summary: A demonstration package
Home-page: https://example.org/demo
Author: Jane Doe
License: MIT
Classifier: Development Status :: 5 - Production/Stable
Classifier: License :: OSI Approved :: MIT License
Classifier: License :: OSI Approved

Long description starts here.
Name: not-a-header-anymore
";

    fn write_dist_info(site: &Path, dir_name: &str, metadata: &str) -> PathBuf {
        let info = site.join(dir_name);
        fs::create_dir_all(&info).unwrap();
        fs::write(info.join("METADATA"), metadata).unwrap();
        info
    }

    fn scan(site: &Path, include_files: bool) -> Vec<PackageRecord> {
        let license_re = Regex::new(r"(?i)^(LICEN[CS]E|COPYING|AUTHORS)").unwrap();
        let notice_re = Regex::new(r"(?i)^NOTICE").unwrap();
        let mut seen = HashSet::new();
        let mut records = Vec::new();
        scan_search_dir(
            site,
            include_files,
            (&license_re, &notice_re),
            &mut seen,
            &mut records,
        )
        .unwrap();
        records
    }

    #[test]
    fn test_parse_headers_folds_continuations() {
        let headers = parse_headers("Name: demo\nLicense: MIT\n and some more\n\nBody: no\n");
        assert_eq!(
            headers,
            vec![
                ("Name".to_string(), "demo".to_string()),
                ("License".to_string(), "MIT and some more".to_string()),
            ]
        );
    }

    #[test]
    fn test_classifier_license_name() {
        assert_eq!(
            classifier_license_name("License :: OSI Approved :: MIT License"),
            Some("MIT License".to_string())
        );
        assert_eq!(classifier_license_name("License :: OSI Approved"), None);
        assert_eq!(
            classifier_license_name("Development Status :: 5 - Production/Stable"),
            None
        );
    }

    #[test]
    fn test_record_from_metadata() {
        let record = record_from_metadata(METADATA, Vec::new(), Vec::new()).unwrap();
        assert_eq!(record.name, "demo-package");
        assert_eq!(record.version, "1.2.3");
        assert_eq!(record.license_metadata.as_deref(), Some("MIT"));
        assert_eq!(record.license_classifiers, vec!["MIT License".to_string()]);
        assert_eq!(record.author, "Jane Doe");
        assert_eq!(record.maintainer, LICENSE_UNKNOWN);
        assert_eq!(record.homepage, "https://example.org/demo");
    }

    #[test]
    fn test_license_expression_header_wins() {
        let record = record_from_metadata(
            "Name: demo\nLicense: some free text\nLicense-Expression: Apache-2.0\n",
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        assert_eq!(record.license_metadata.as_deref(), Some("Apache-2.0"));
    }

    #[test]
    fn test_project_url_homepage_fallback() {
        let record = record_from_metadata(
            "Name: demo\nProject-URL: Documentation, https://docs.example.org\nProject-URL: Homepage, https://example.org\n",
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        assert_eq!(record.homepage, "https://example.org");
    }

    #[test]
    fn test_scan_search_dir_finds_dist_info() {
        let site = TempDir::new().unwrap();
        write_dist_info(site.path(), "demo_package-1.2.3.dist-info", METADATA);
        fs::create_dir(site.path().join("demo_package")).unwrap();

        let records = scan(site.path(), false);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "demo-package");
        assert!(records[0].license_files.is_empty());
    }

    #[test]
    fn test_scan_skips_duplicate_normalized_names() {
        let site = TempDir::new().unwrap();
        write_dist_info(site.path(), "demo_package-1.0.dist-info", "Name: Demo.Package\nVersion: 1.0\n");
        write_dist_info(site.path(), "demo-package-2.0.dist-info", "Name: demo-package\nVersion: 2.0\n");

        let records = scan(site.path(), false);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_scan_reads_license_and_notice_files() {
        let site = TempDir::new().unwrap();
        let info = write_dist_info(site.path(), "demo-1.0.dist-info", "Name: demo\nVersion: 1.0\n");
        let licenses = info.join("licenses");
        fs::create_dir(&licenses).unwrap();
        fs::write(licenses.join("LICENSE.txt"), "license text").unwrap();
        fs::write(licenses.join("NOTICE"), "notice text").unwrap();

        let records = scan(site.path(), true);
        assert_eq!(records[0].license_files.len(), 1);
        assert_eq!(records[0].license_files[0].text, "license text");
        assert_eq!(records[0].notice_files.len(), 1);
        assert_eq!(records[0].notice_files[0].text, "notice text");
    }

    #[test]
    fn test_missing_name_is_skipped() {
        assert!(record_from_metadata("Version: 1.0\n", Vec::new(), Vec::new()).is_none());
    }
}
