//! Plain-text newsletter rendering.

use crate::league::MatchLine;
use crate::newsletter::Newsletter;

use super::{Formatter, RenderOptions};

/// Renders the newsletter as two aligned text tables.
pub struct ConsoleFormatter;

impl Formatter for ConsoleFormatter {
    fn render(&self, newsletter: &Newsletter, options: &RenderOptions) -> String {
        let Some(org) = newsletter.organization() else {
            return String::new();
        };
        let (past, future) = org.matches_in_window(options.past, options.future);

        let past_lines: Vec<MatchLine> =
            past.iter().filter_map(|m| m.for_organization(org)).collect();
        let future_lines: Vec<MatchLine> =
            future.iter().filter_map(|m| m.for_organization(org)).collect();

        let mut out = String::new();

        if !past_lines.is_empty() {
            out.push_str("Recent matches:\n");
            let rows: Vec<Vec<String>> = past_lines
                .iter()
                .map(|line| {
                    vec![
                        line.date.format("%a, %b %d").to_string(),
                        line.first.clone(),
                        line.outcome.clone().unwrap_or_default(),
                        format!("{} {}", line.locator, line.second),
                    ]
                })
                .collect();
            render_table(&rows, &mut out);
            out.push('\n');
        }

        if !future_lines.is_empty() {
            out.push_str("Upcoming matches:\n");
            let rows: Vec<Vec<String>> = future_lines
                .iter()
                .map(|line| {
                    vec![
                        line.date.format("%a, %b %d").to_string(),
                        line.first.clone(),
                        format!("{} {}", line.locator, line.second),
                    ]
                })
                .collect();
            render_table(&rows, &mut out);
            out.push('\n');
        }

        out
    }
}

/// Writes rows as space-aligned columns, two spaces between columns.
fn render_table(rows: &[Vec<String>], out: &mut String) {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    for row in rows {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            line.push_str(cell);
            if i + 1 < row.len() {
                for _ in cell.chars().count()..widths[i] {
                    line.push(' ');
                }
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_alignment_pads_all_but_last_column() {
        let rows = vec![
            vec!["a".to_string(), "long cell".to_string(), "x".to_string()],
            vec!["longer".to_string(), "b".to_string(), "y".to_string()],
        ];
        let mut out = String::new();
        render_table(&rows, &mut out);
        assert_eq!(out, "a       long cell  x\nlonger  b          y\n");
    }
}
