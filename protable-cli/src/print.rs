//! Plain-text rendering of a table page.

use protable_lib::table::ProTable;

const SEPARATOR: &str = " | ";

pub fn table_text(table: &ProTable) -> String {
    let headers: Vec<String> = table
        .leaf_columns()
        .iter()
        .map(|column| column.title.clone())
        .collect();
    let rows: Vec<Vec<String>> = table
        .render_rows()
        .into_iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|output| output.cell.plain_text().replace('\n', " / "))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }

    if let Some(view) = table.pagination() {
        out.push('\n');
        out.push_str(&view.total_text);
        out.push('\n');
    }
    if let Some(alert) = table.selection_alert() {
        out.push_str(&alert.text);
        out.push('\n');
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    out.push_str(padded.join(SEPARATOR).trim_end());
    out.push('\n');
}
