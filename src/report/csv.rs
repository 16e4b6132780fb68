use super::Table;

/// Comma-separated values with every cell double-quoted and embedded quotes
/// doubled, per RFC 4180.
pub fn render(table: &Table) -> String {
    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(format_row(
        table.fields.iter().map(|field| field.as_str().to_string()),
    ));
    for row in &table.rows {
        lines.push(format_row(row.iter().cloned()));
    }
    lines.join("\n")
}

fn format_row(cells: impl Iterator<Item = String>) -> String {
    cells
        .map(|cell| format!("\"{}\"", cell.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::OutputField;

    #[test]
    fn test_header_line() {
        let table = Table {
            fields: vec![
                OutputField::Name,
                OutputField::Version,
                OutputField::License,
                OutputField::Author,
            ],
            rows: Vec::new(),
        };
        assert_eq!(render(&table), "\"Name\",\"Version\",\"License\",\"Author\"");
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let table = Table {
            fields: vec![OutputField::Name, OutputField::License],
            rows: vec![vec![
                "demo".to_string(),
                "BSD \"Simplified\"".to_string(),
            ]],
        };
        assert_eq!(
            render(&table),
            "\"Name\",\"License\"\n\"demo\",\"BSD \"\"Simplified\"\"\""
        );
    }

    #[test]
    fn test_commas_stay_inside_quotes() {
        let table = Table {
            fields: vec![OutputField::Author],
            rows: vec![vec!["Doe, Jane".to_string()]],
        };
        assert_eq!(render(&table), "\"Author\"\n\"Doe, Jane\"");
    }
}
