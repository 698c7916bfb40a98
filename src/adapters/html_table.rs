//! HTML rendering of table payloads.

use askama::Template;

use crate::domain::error::TickerlensError;
use crate::domain::payload::{TableColumn, TablePayload};

struct RowView {
    date: chrono::NaiveDate,
    cells: Vec<String>,
}

#[derive(Template)]
#[template(path = "table.html")]
struct TableTemplate<'a> {
    columns: &'a [TableColumn],
    colspan: usize,
    rows: Vec<RowView>,
}

/// Missing cells render empty.
fn fmt_cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => format!("{:.3}", v),
        None => String::new(),
    }
}

pub fn render_table(table: &TablePayload) -> Result<String, TickerlensError> {
    let template = TableTemplate {
        columns: &table.columns,
        colspan: table.columns.len().max(1),
        rows: table
            .rows
            .iter()
            .map(|r| RowView {
                date: r.date,
                cells: r.values.iter().map(|v| fmt_cell(*v)).collect(),
            })
            .collect(),
    };
    template
        .render()
        .map_err(|e| TickerlensError::Io(std::io::Error::other(e.to_string())))
}
