//! Plain-text table rendering.

use crate::config::TableConfig;
use crate::rows::Row;
use anyhow::Result;
use unicode_width::UnicodeWidthStr;

pub const NO_MATCH_MESSAGE: &str = "No products matching selected criteria";

const HEADERS: [&str; 4] = ["ID", "Product", "Category", "User"];

/// Render the rows as an aligned text table, or the no-match message
/// when nothing survived the filters. Pure string assembly; the caller
/// prints it.
pub fn render_table(rows: &[Row], table: &TableConfig) -> String {
    if rows.is_empty() {
        return format!("{}\n", NO_MATCH_MESSAGE);
    }

    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.product.id.to_string(),
                row.product.name.clone(),
                category_cell(row, table),
                user_cell(row),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| UnicodeWidthStr::width(*h)).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let mut out = String::new();
    out.push_str(&format_line(&HEADERS.map(String::from), &widths));
    out.push_str(&separator(&widths));
    for row in &cells {
        out.push_str(&format_line(row, &widths));
    }
    out
}

/// Render the rows as a JSON array.
pub fn render_json(rows: &[Row]) -> Result<String> {
    let values: Vec<serde_json::Value> = rows.iter().map(Row::to_json).collect();
    Ok(serde_json::to_string_pretty(&values)?)
}

fn category_cell(row: &Row, table: &TableConfig) -> String {
    match row.category {
        Some(c) if table.show_icons => format!("{} - {}", c.icon, c.title),
        Some(c) => c.title.clone(),
        None => "-".to_string(),
    }
}

fn user_cell(row: &Row) -> String {
    match row.user {
        Some(u) => match u.sex.as_str() {
            "m" | "f" => format!("{} ({})", u.name, u.sex),
            _ => u.name.clone(),
        },
        None => "-".to_string(),
    }
}

fn format_line(cells: &[String; 4], widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push_str(" | ");
        }
        line.push_str(cell);
        // Pad to display width so emoji cells stay aligned.
        for _ in UnicodeWidthStr::width(cell.as_str())..widths[i] {
            line.push(' ');
        }
    }
    line.push('\n');
    line
}

fn separator(widths: &[usize]) -> String {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push_str("-+-");
        }
        line.push_str(&"-".repeat(*width));
    }
    line.push('\n');
    line
}
