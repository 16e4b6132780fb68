use crate::models::{FileContent, PackageRecord};

/// Code pages supported by `--filter-code-page`.
///
/// Filtering re-encodes every textual field through the code page and drops
/// characters it cannot represent, so that downstream consumers limited to
/// that character set never see unrenderable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePage {
    Latin1,
    Ascii,
    Utf8,
}

impl CodePage {
    /// Resolve a code page name, accepting the common aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Some(CodePage::Latin1),
            "ascii" | "us-ascii" => Some(CodePage::Ascii),
            "utf-8" | "utf8" => Some(CodePage::Utf8),
            _ => None,
        }
    }

    fn encodable(self, ch: char) -> bool {
        match self {
            CodePage::Latin1 => (ch as u32) <= 0xFF,
            CodePage::Ascii => ch.is_ascii(),
            CodePage::Utf8 => true,
        }
    }

    /// Drop every character the code page cannot encode.
    pub fn filter(self, value: &str) -> String {
        value.chars().filter(|ch| self.encodable(*ch)).collect()
    }
}

/// Build a new record with every textual field filtered through `code_page`,
/// including the license/notice file paths and contents.
pub fn filter_record(pkg: &PackageRecord, code_page: CodePage) -> PackageRecord {
    let filter = |value: &str| code_page.filter(value);
    let filter_files = |files: &[FileContent]| -> Vec<FileContent> {
        files
            .iter()
            .map(|file| FileContent {
                path: filter(&file.path),
                text: filter(&file.text),
            })
            .collect()
    };

    PackageRecord {
        name: filter(&pkg.name),
        version: filter(&pkg.version),
        license_metadata: pkg.license_metadata.as_deref().map(filter),
        license_classifiers: pkg.license_classifiers.iter().map(|c| filter(c)).collect(),
        author: filter(&pkg.author),
        maintainer: filter(&pkg.maintainer),
        homepage: filter(&pkg.homepage),
        summary: filter(&pkg.summary),
        license_files: filter_files(&pkg.license_files),
        notice_files: filter_files(&pkg.notice_files),
    }
}
