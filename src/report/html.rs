use super::Table;

/// Full table markup. Output is pure ASCII: markup-significant characters
/// are entity-escaped and anything outside ASCII becomes a numeric character
/// reference.
pub fn render(table: &Table) -> String {
    let mut out = String::from("<table>\n    <thead>\n        <tr>\n");
    for field in &table.fields {
        out.push_str("            <th>");
        out.push_str(&escape(field.as_str()));
        out.push_str("</th>\n");
    }
    out.push_str("        </tr>\n    </thead>\n    <tbody>\n");
    for row in &table.rows {
        out.push_str("        <tr>\n");
        for cell in row {
            out.push_str("            <td>");
            out.push_str(&escape(cell));
            out.push_str("</td>\n");
        }
        out.push_str("        </tr>\n");
    }
    out.push_str("    </tbody>\n</table>");
    out
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            ch if ch.is_ascii() => escaped.push(ch),
            ch => escaped.push_str(&format!("&#{};", ch as u32)),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::OutputField;

    #[test]
    fn test_render_structure() {
        let table = Table {
            fields: vec![OutputField::Name, OutputField::License],
            rows: vec![vec!["demo".to_string(), "MIT".to_string()]],
        };
        let output = render(&table);
        assert!(output.starts_with("<table>\n    <thead>"));
        assert!(output.contains("            <th>Name</th>\n"));
        assert!(output.contains("            <td>MIT</td>\n"));
        assert!(output.ends_with("    </tbody>\n</table>"));
    }

    #[test]
    fn test_escape_markup_and_non_ascii() {
        assert_eq!(escape("a & b"), "a &amp; b");
        assert_eq!(escape("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape("café"), "caf&#233;");
        assert_eq!(escape("雪"), "&#38634;");
    }
}
