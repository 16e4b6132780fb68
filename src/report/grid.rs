use super::Table;

/// Where horizontal rules are drawn in a bordered style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HRules {
    None,
    Header,
    All,
}

/// A bordered grid style: the junction character used where rules meet the
/// column separators, and the rule placement.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub junction: char,
    pub hrules: HRules,
}

impl Style {
    pub const MARKDOWN: Style = Style {
        junction: '|',
        hrules: HRules::Header,
    };
    pub const RST: Style = Style {
        junction: '+',
        hrules: HRules::All,
    };
    pub const CONFLUENCE: Style = Style {
        junction: '|',
        hrules: HRules::None,
    };
}

/// Borderless left-aligned columns with a header row.
pub fn plain(table: &Table) -> String {
    let widths = column_widths(table);
    let mut lines = vec![plain_line(&header_cells(table), &widths)];
    for row in &table.rows {
        lines.push(plain_line(row, &widths));
    }
    lines.join("\n")
}

/// One value per line, with a blank line after each record; no columns, no
/// header. Similar to the license dump produced by Angular CLI's
/// `--extractLicenses`.
pub fn plain_vertical(table: &Table) -> String {
    let mut output = String::new();
    for row in &table.rows {
        for value in row {
            output.push_str(value);
            output.push('\n');
        }
        output.push('\n');
    }
    output
}

/// Bordered grid with `|` column separators.
pub fn bordered(table: &Table, style: Style) -> String {
    let widths = column_widths(table);
    let rule = rule_line(&widths, style.junction);

    let mut lines = Vec::new();
    if style.hrules == HRules::All {
        lines.push(rule.clone());
    }
    lines.push(bordered_line(&header_cells(table), &widths));
    if style.hrules != HRules::None {
        lines.push(rule.clone());
    }
    for row in &table.rows {
        lines.push(bordered_line(row, &widths));
        if style.hrules == HRules::All {
            lines.push(rule.clone());
        }
    }
    lines.join("\n")
}

fn header_cells(table: &Table) -> Vec<String> {
    table
        .fields
        .iter()
        .map(|field| field.as_str().to_string())
        .collect()
}

fn column_widths(table: &Table) -> Vec<usize> {
    let mut widths: Vec<usize> = table
        .fields
        .iter()
        .map(|field| field.as_str().chars().count())
        .collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

fn pad(value: &str, width: usize) -> String {
    let padding = width.saturating_sub(value.chars().count());
    let mut cell = value.to_string();
    cell.extend(std::iter::repeat(' ').take(padding));
    cell
}

fn plain_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect();
    padded.join("  ").trim_end().to_string()
}

fn bordered_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!(" {} ", pad(cell, *width)))
        .collect();
    format!("|{}|", padded.join("|"))
}

fn rule_line(widths: &[usize], junction: char) -> String {
    let mut line = String::new();
    line.push(junction);
    for width in widths {
        line.extend(std::iter::repeat('-').take(width + 2));
        line.push(junction);
    }
    line
}
