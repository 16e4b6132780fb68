use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::Value;

use super::Table;
use crate::fields::OutputField;

/// Pretty-printed array of objects keyed by field name. `BTreeMap` keeps the
/// keys sorted.
pub fn render(table: &Table) -> Result<String> {
    let rows: Vec<BTreeMap<&str, &str>> = table
        .rows
        .iter()
        .map(|row| {
            table
                .fields
                .iter()
                .zip(row)
                .map(|(field, cell)| (field.as_str(), cell.as_str()))
                .collect()
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// Compact license-finder interchange format: only name, version and a
/// single-element licenses array survive; every other field is dropped.
pub fn render_license_finder(table: &Table) -> Result<String> {
    let rows: Vec<BTreeMap<&str, Value>> = table
        .rows
        .iter()
        .map(|row| {
            let mut object = BTreeMap::new();
            for (field, cell) in table.fields.iter().zip(row) {
                match field {
                    OutputField::Name => {
                        object.insert("name", Value::from(cell.as_str()));
                    }
                    OutputField::Version => {
                        object.insert("version", Value::from(cell.as_str()));
                    }
                    OutputField::License => {
                        object.insert("licenses", Value::from(vec![cell.as_str()]));
                    }
                    _ => {}
                }
            }
            object
        })
        .collect();
    Ok(serde_json::to_string(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table {
            fields: vec![
                OutputField::Name,
                OutputField::Version,
                OutputField::License,
                OutputField::Author,
            ],
            rows: vec![vec![
                "demo".to_string(),
                "1.0".to_string(),
                "MIT".to_string(),
                "Jane".to_string(),
            ]],
        }
    }

    #[test]
    fn test_render_sorts_keys() {
        let output = render(&table()).unwrap();
        assert_eq!(
            output,
            "[\n  {\n    \"Author\": \"Jane\",\n    \"License\": \"MIT\",\n    \"Name\": \"demo\",\n    \"Version\": \"1.0\"\n  }\n]"
        );
    }

    #[test]
    fn test_license_finder_drops_other_fields() {
        let output = render_license_finder(&table()).unwrap();
        assert_eq!(
            output,
            "[{\"licenses\":[\"MIT\"],\"name\":\"demo\",\"version\":\"1.0\"}]"
        );
    }

    #[test]
    fn test_license_finder_without_license_column() {
        let mut table = table();
        table.fields = vec![OutputField::Name, OutputField::Version];
        table.rows = vec![vec!["demo".to_string(), "1.0".to_string()]];
        let output = render_license_finder(&table).unwrap();
        assert_eq!(output, "[{\"name\":\"demo\",\"version\":\"1.0\"}]");
    }
}
