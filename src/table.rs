//! Plain-text aligned table renderer used by the diagnostic printer.
//!
//! Widths ignore ANSI colour sequences so coloured cells stay aligned.

use std::{borrow::Cow, fmt::Write as _};

const COLUMN_GAP: &str = "  ";
const MIN_RULE_WIDTH: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row; cells beyond the header count are not rendered.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let rule = widths
            .iter()
            .map(|width| "-".repeat((*width).max(MIN_RULE_WIDTH)))
            .collect::<Vec<_>>();
        let rule_widths = rule.iter().map(String::len).collect::<Vec<_>>();

        let mut output = String::new();
        let _ = writeln!(output, "{}", format_row(&self.headers, &widths));
        let _ = writeln!(output, "{}", format_row(&rule, &rule_widths));
        for row in &self.rows {
            let _ = writeln!(output, "{}", format_row(row, &widths));
        }
        output
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths = self
            .headers
            .iter()
            .map(|header| display_width(header))
            .collect::<Vec<_>>();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(display_width(cell));
            }
        }
        widths.into_iter().map(|width| width.max(1)).collect()
    }
}

/// Two-column `label  value` listing.
pub fn render_key_values<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let mut table = TextTable::new(["Metric", "Value"]);
    for (label, value) in pairs {
        table.push_row([label.to_string(), value]);
    }
    table.render()
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let cell = sanitize_cell(value);
            let padding = width.saturating_sub(display_width(&cell));
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    line.truncate(line.trim_end().len());
    line
}

pub(crate) fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // Skip to the end of the SGR sequence.
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_to_widest_cell() {
        let mut table = TextTable::new(["Column", "Pattern"]);
        table.push_row(["1", "99x99x9999"]);
        table.push_row(["12", "AA"]);
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Column  Pattern");
        assert_eq!(lines[1], "------  ----------");
        assert_eq!(lines[2], "1       99x99x9999");
        assert_eq!(lines[3], "12      AA");
    }

    #[test]
    fn ansi_sequences_do_not_count_towards_width() {
        assert_eq!(display_width("\u{1b}[31mred\u{1b}[0m"), 3);
    }

    #[test]
    fn control_whitespace_is_flattened() {
        let mut table = TextTable::new(["A"]);
        table.push_row(["x\ty"]);
        assert!(table.render().contains("x y"));
    }

    #[test]
    fn key_values_render_as_two_columns() {
        let rendered = render_key_values([("Tables Match", "true".to_string())]);
        assert!(rendered.lines().any(|line| line == "Tables Match  true"));
    }
}
