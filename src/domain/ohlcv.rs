//! OHLCV bar and price series representation.

use crate::domain::error::TickerlensError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Daily bars for one instrument, strictly ascending by date.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    /// Sorts the bars and keeps the last record for any duplicated date.
    /// An empty input is reported as unavailable data.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<OhlcvBar>) -> Result<Self, TickerlensError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(TickerlensError::unavailable(symbol, "range yields zero rows"));
        }

        // stable sort, so later duplicates stay after earlier ones
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<OhlcvBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Ok(Self {
            symbol,
            bars: deduped,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }

    /// (first year, last year) covered by the series.
    pub fn year_span(&self) -> (i32, i32) {
        (self.first_date().year(), self.last_date().year())
    }
}
