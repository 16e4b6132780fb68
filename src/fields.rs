use std::fmt;

use crate::cli::{FromArg, OrderArg};
use crate::options::Options;

/// One output column. Variants map one-to-one onto the displayed column
/// names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputField {
    Name,
    Version,
    License,
    LicenseMetadata,
    LicenseClassifier,
    Author,
    Maintainer,
    Url,
    Description,
    LicenseFile,
    LicenseText,
    NoticeFile,
    NoticeText,
    Count,
}

impl OutputField {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputField::Name => "Name",
            OutputField::Version => "Version",
            OutputField::License => "License",
            OutputField::LicenseMetadata => "License-Metadata",
            OutputField::LicenseClassifier => "License-Classifier",
            OutputField::Author => "Author",
            OutputField::Maintainer => "Maintainer",
            OutputField::Url => "URL",
            OutputField::Description => "Description",
            OutputField::LicenseFile => "LicenseFile",
            OutputField::LicenseText => "LicenseText",
            OutputField::NoticeFile => "NoticeFile",
            OutputField::NoticeText => "NoticeText",
            OutputField::Count => "Count",
        }
    }
}

impl fmt::Display for OutputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the ordered column list for the active flag set.
///
/// Insertion order is display order. Version is appended first and stripped
/// afterwards when `--no-version` is set. The notice columns intentionally
/// append text before path, the reverse of the license columns.
pub fn output_fields(opts: &Options) -> Vec<OutputField> {
    if opts.summary {
        return vec![OutputField::Count, OutputField::License];
    }

    let mut fields = vec![OutputField::Name, OutputField::Version];

    if opts.from == FromArg::All {
        fields.push(OutputField::LicenseMetadata);
        fields.push(OutputField::LicenseClassifier);
    } else {
        fields.push(OutputField::License);
    }

    if opts.with_authors {
        fields.push(OutputField::Author);
    }
    if opts.with_maintainers {
        fields.push(OutputField::Maintainer);
    }
    if opts.with_urls {
        fields.push(OutputField::Url);
    }
    if opts.with_description {
        fields.push(OutputField::Description);
    }

    if opts.no_version {
        fields.retain(|field| *field != OutputField::Version);
    }

    if opts.with_license_file {
        if !opts.no_license_path {
            fields.push(OutputField::LicenseFile);
        }
        fields.push(OutputField::LicenseText);
        if opts.with_notice_file {
            fields.push(OutputField::NoticeText);
            if !opts.no_license_path {
                fields.push(OutputField::NoticeFile);
            }
        }
    }

    fields
}

/// Resolve the column to sort rows by before serialization.
///
/// Author/maintainer/URL orderings only apply when the matching column is
/// actually included; everything else falls back to Name.
pub fn sort_field(opts: &Options) -> OutputField {
    if opts.summary && opts.order == OrderArg::Count {
        OutputField::Count
    } else if opts.summary || opts.order == OrderArg::License {
        OutputField::License
    } else if opts.order == OrderArg::Author && opts.with_authors {
        OutputField::Author
    } else if opts.order == OrderArg::Maintainer && opts.with_maintainers {
        OutputField::Maintainer
    } else if opts.order == OrderArg::Url && opts.with_urls {
        OutputField::Url
    } else {
        OutputField::Name
    }
}
