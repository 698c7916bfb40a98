//! Macro sentiment table shown next to the market charts.
//!
//! Each column (e.g. `UMCSENT`, `CPIAUCSL`) is also kept min-max normalized
//! over the whole table so differently scaled series share one chart axis.

use crate::domain::indicator::normalize::min_max;
use crate::domain::view_state::YearRange;
use chrono::{Datelike, NaiveDate};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentRow {
    pub date: NaiveDate,
    /// One entry per column, `None` where the source cell was blank.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct MacroSentiment {
    columns: Vec<String>,
    rows: Vec<SentimentRow>,
    normalized: Vec<Vec<Option<f64>>>,
}

impl MacroSentiment {
    /// Rows are sorted by date; rows shorter than `columns` are padded with gaps.
    pub fn new(columns: Vec<String>, mut rows: Vec<SentimentRow>) -> Self {
        rows.sort_by_key(|r| r.date);
        for row in &mut rows {
            row.values.resize(columns.len(), None);
        }

        let normalized = (0..columns.len())
            .map(|c| {
                let raw: Vec<Option<f64>> = rows.iter().map(|r| r.values[c]).collect();
                min_max(&raw)
            })
            .collect();

        Self {
            columns,
            rows,
            normalized,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[SentimentRow] {
        &self.rows
    }

    pub fn normalized_column(&self, column: usize) -> &[Option<f64>] {
        &self.normalized[column]
    }

    pub fn year_rows(&self, range: YearRange) -> Range<usize> {
        let start = self.rows.partition_point(|r| r.date.year() < range.min);
        let end = self.rows.partition_point(|r| r.date.year() <= range.max);
        start..end.max(start)
    }
}
