use std::collections::BTreeSet;

use crate::cli::FromArg;

/// Sentinel used wherever package metadata does not declare a value.
pub const LICENSE_UNKNOWN: &str = "UNKNOWN";

/// One license or notice file shipped inside a distribution's metadata
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub path: String,
    pub text: String,
}

/// Metadata of one installed distribution.
///
/// Records are immutable for the duration of a report; the character filter
/// produces a new record instead of rewriting fields in place.
#[derive(Debug, Clone)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    /// `License-Expression` or `License` metadata header, when declared.
    pub license_metadata: Option<String>,
    /// License names taken from `License ::` trove classifiers.
    pub license_classifiers: Vec<String>,
    pub author: String,
    pub maintainer: String,
    pub homepage: String,
    pub summary: String,
    pub license_files: Vec<FileContent>,
    pub notice_files: Vec<FileContent>,
}

impl PackageRecord {
    /// The set of declared license names according to the selected metadata
    /// source.
    ///
    /// `mixed` prefers classifiers and falls back to the metadata header,
    /// `all` reports the union of both.
    pub fn license_names(&self, from: FromArg) -> BTreeSet<String> {
        let metadata: BTreeSet<String> = self
            .license_metadata
            .iter()
            .filter(|value| !value.is_empty())
            .cloned()
            .collect();
        let classifiers: BTreeSet<String> = self.license_classifiers.iter().cloned().collect();

        match from {
            FromArg::Meta => metadata,
            FromArg::Classifier => classifiers,
            FromArg::Mixed => {
                if classifiers.is_empty() {
                    metadata
                } else {
                    classifiers
                }
            }
            FromArg::All => {
                let mut names = metadata;
                names.extend(classifiers);
                names
            }
        }
    }
}

/// PEP 503 name canonicalization: lowercase, with every run of `-`, `_` and
/// `.` collapsed into a single `-`.
pub fn normalize_package_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut previous_was_separator = false;

    for ch in name.chars() {
        if matches!(ch, '-' | '_' | '.') {
            if !previous_was_separator {
                normalized.push('-');
            }
            previous_was_separator = true;
        } else {
            normalized.extend(ch.to_lowercase());
            previous_was_separator = false;
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(metadata: Option<&str>, classifiers: &[&str]) -> PackageRecord {
        PackageRecord {
            name: "demo".to_string(),
            version: "1.0".to_string(),
            license_metadata: metadata.map(str::to_string),
            license_classifiers: classifiers.iter().map(|c| c.to_string()).collect(),
            author: LICENSE_UNKNOWN.to_string(),
            maintainer: LICENSE_UNKNOWN.to_string(),
            homepage: LICENSE_UNKNOWN.to_string(),
            summary: LICENSE_UNKNOWN.to_string(),
            license_files: Vec::new(),
            notice_files: Vec::new(),
        }
    }

    #[test]
    fn test_normalize_package_name() {
        assert_eq!(normalize_package_name("Flask"), "flask");
        assert_eq!(normalize_package_name("zope.interface"), "zope-interface");
        assert_eq!(normalize_package_name("my__pkg..name"), "my-pkg-name");
        assert_eq!(normalize_package_name("Test-Package"), "test-package");
    }

    #[test]
    fn test_license_names_mixed_prefers_classifiers() {
        let pkg = record(Some("MIT"), &["MIT License"]);
        let names = pkg.license_names(FromArg::Mixed);
        assert_eq!(names, BTreeSet::from(["MIT License".to_string()]));
    }

    #[test]
    fn test_license_names_mixed_falls_back_to_metadata() {
        let pkg = record(Some("MIT"), &[]);
        assert_eq!(
            pkg.license_names(FromArg::Mixed),
            BTreeSet::from(["MIT".to_string()])
        );
    }

    #[test]
    fn test_license_names_all_is_union() {
        let pkg = record(Some("MIT"), &["MIT License"]);
        let names = pkg.license_names(FromArg::All);
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_license_names_empty() {
        let pkg = record(None, &[]);
        assert!(pkg.license_names(FromArg::Mixed).is_empty());
    }
}
