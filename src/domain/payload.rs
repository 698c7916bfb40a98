//! Render-ready projections of the derived data.
//!
//! Payloads are rebuilt on every recomputation pass and never mutated.

use crate::domain::view_state::{Page, YearRange};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub title: String,
    pub traces: Vec<Trace>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Candlestick {
        name: String,
        x: Vec<NaiveDate>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    },
    Line {
        name: String,
        x: Vec<NaiveDate>,
        /// `None` renders as a gap.
        y: Vec<Option<f64>>,
    },
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Candlestick { name, .. } | Trace::Line { name, .. } => name,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Trace::Candlestick { x, .. } | Trace::Line { x, .. } => x.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumn {
    pub name: String,
    pub id: String,
}

impl TableColumn {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
        }
    }
}

/// `columns[0]` is the date column; `values` line up with `columns[1..]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePayload {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub date: NaiveDate,
    pub values: Vec<Option<f64>>,
}

/// Bounds and marks for the year range control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderConfig {
    pub min: i32,
    pub max: i32,
    pub value: YearRange,
    pub marks: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContent {
    pub page: Page,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Payload {
    Chart(ChartPayload),
    Table(TablePayload),
    Slider(SliderConfig),
    Page(PageContent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_trace_serializes_gaps_as_null() {
        let trace = Trace::Line {
            name: "MA10".into(),
            x: vec![
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ],
            y: vec![None, Some(1.5)],
        };
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["type"], "line");
        assert_eq!(json["x"][0], "2024-01-02");
        assert!(json["y"][0].is_null());
        assert_eq!(json["y"][1], 1.5);
    }

    #[test]
    fn payload_is_tagged_by_kind() {
        let payload = Payload::Slider(SliderConfig {
            min: 2010,
            max: 2012,
            value: YearRange::new(2010, 2012),
            marks: vec![2010, 2011, 2012],
        });
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "slider");
        assert_eq!(json["value"]["min"], 2010);
    }

    #[test]
    fn table_column_id_matches_name() {
        let col = TableColumn::new("UMCSENT");
        assert_eq!(col.id, "UMCSENT");
    }
}
