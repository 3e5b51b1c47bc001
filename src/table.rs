use std::borrow::Cow;
use std::fmt::Write as _;

use crate::aggregate::{AggregateView, Kpis, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Renders an elastic plain-text table. Columns are separated by two spaces;
/// trailing whitespace is trimmed from every line.
pub fn render_table(headers: &[String], rows: &[Vec<String>], align: &[Align]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths, &[]));

    let separator_cells = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator_cells, &widths, &[]));

    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, align));
    }

    output
}

fn format_row(values: &[String], widths: &[usize], align: &[Align]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate().take(widths.len()) {
        let sanitized = sanitize_cell(value);
        let padding = widths[idx].saturating_sub(display_width(sanitized.as_ref()));
        let pad = " ".repeat(padding);
        let cell = match align.get(idx).copied().unwrap_or(Align::Left) {
            Align::Left => format!("{sanitized}{pad}"),
            Align::Right => format!("{pad}{sanitized}"),
        };
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

/// Renders a view under its title. Share views get a percent column;
/// rankings are listed highest first, the way they are read.
pub fn render_view(view: &AggregateView) -> String {
    let headers = match view.sort {
        SortOrder::Chronological => vec!["period".to_string(), "sales".to_string()],
        SortOrder::AscendingByCount => vec!["category".to_string(), "sales".to_string()],
        SortOrder::Unordered => vec![
            "category".to_string(),
            "sales".to_string(),
            "share".to_string(),
        ],
    };
    let mut ordered = view.rows.iter().collect::<Vec<_>>();
    if view.sort == SortOrder::AscendingByCount {
        ordered.reverse();
    }
    let rows = ordered
        .into_iter()
        .map(|(category, count)| {
            let mut row = vec![category.clone(), count.to_string()];
            if view.sort == SortOrder::Unordered {
                row.push(format!("{:.2}%", view.percent(*count)));
            }
            row
        })
        .collect::<Vec<_>>();

    let mut output = String::new();
    let _ = writeln!(output, "## {}", view.title);
    output.push_str(&render_table(
        &headers,
        &rows,
        &[Align::Left, Align::Right, Align::Right],
    ));
    output
}

pub fn render_kpis(kpis: &Kpis) -> String {
    let headers = vec!["indicator".to_string(), "value".to_string()];
    let rows = [
        ("total sales", kpis.total_sales),
        ("sellers", kpis.sellers),
        ("districts", kpis.districts),
        ("services", kpis.services),
    ]
    .into_iter()
    .map(|(name, value)| vec![name.to_string(), value.to_string()])
    .collect::<Vec<_>>();

    let mut output = String::from("## Key indicators\n");
    output.push_str(&render_table(&headers, &rows, &[Align::Left, Align::Right]));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_table_aligns_columns() {
        let headers = vec!["name".to_string(), "sales".to_string()];
        let rows = vec![
            vec!["LIMA".to_string(), "12".to_string()],
            vec!["CUSCO".to_string(), "3".to_string()],
        ];
        let rendered = render_table(&headers, &rows, &[Align::Left, Align::Right]);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["name   sales", "-----  -----", "LIMA      12", "CUSCO      3"]);
    }

    #[test]
    fn render_table_normalizes_control_characters() {
        let headers = vec!["note".to_string()];
        let rows = vec![vec!["line1\nline2\tvalue".to_string()]];
        let rendered = render_table(&headers, &rows, &[]);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "line1 line2 value");
    }

    #[test]
    fn render_view_lists_rankings_highest_first() {
        let view = AggregateView {
            title: "Sales by district".to_string(),
            sort: SortOrder::AscendingByCount,
            rows: vec![("CUSCO".to_string(), 1), ("LIMA".to_string(), 3)],
        };
        let rendered = render_view(&view);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "## Sales by district");
        assert!(lines[3].starts_with("LIMA"));
        assert!(lines[4].starts_with("CUSCO"));
    }

    #[test]
    fn render_view_adds_share_column() {
        let view = AggregateView {
            title: "Order channel share".to_string(),
            sort: SortOrder::Unordered,
            rows: vec![("WEB".to_string(), 1), ("TIENDA".to_string(), 3)],
        };
        let rendered = render_view(&view);
        assert!(rendered.contains("25.00%"));
        assert!(rendered.contains("75.00%"));
    }
}
