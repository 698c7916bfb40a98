#![allow(dead_code)]

use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::sync::Arc;
use tickerlens::domain::dashboard::{DashboardData, DashboardSources, load_dashboard};
use tickerlens::domain::error::TickerlensError;
use tickerlens::domain::indicator_helpers::with_standard_set;
pub use tickerlens::domain::ohlcv::{OhlcvBar, PriceSeries};
use tickerlens::domain::sentiment::{MacroSentiment, SentimentRow};
use tickerlens::domain::view_state::ComparisonIndex;
use tickerlens::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TickerlensError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TickerlensError::Database {
                reason: reason.clone(),
            });
        }
        let bars: Vec<OhlcvBar> = self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        PriceSeries::new(symbol, bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TickerlensError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TickerlensError> {
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: NaiveDate, close: f64) -> OhlcvBar {
    OhlcvBar {
        date,
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// Daily bars with a drifting, oscillating close so returns and RSI move.
pub fn generate_bars(start: NaiveDate, count: usize, base: f64) -> Vec<OhlcvBar> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            let close = base + t * 0.05 + 5.0 * (t / 9.0).sin();
            OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000 + (i % 50) as i64 * 10,
            }
        })
        .collect()
}

/// Bars covering every day of `first..=last` years.
pub fn bars_for_years(first: i32, last: i32, base: f64) -> Vec<OhlcvBar> {
    let start = date(first, 1, 1);
    let end = date(last, 12, 31);
    let count = (end - start).num_days() as usize + 1;
    generate_bars(start, count, base)
}

pub fn sample_sentiment(first: i32, last: i32) -> MacroSentiment {
    let rows = (first..=last)
        .flat_map(|y| (1..=12).map(move |m| (y, m)))
        .map(|(y, m)| SentimentRow {
            date: date(y, m, 1),
            values: vec![Some(80.0 + m as f64), Some(200.0 + (y - first) as f64 * 3.0)],
        })
        .collect();
    MacroSentiment::new(vec!["UMCSENT".into(), "CPIAUCSL".into()], rows)
}

pub fn sample_sources() -> DashboardSources {
    DashboardSources {
        primary_symbol: "ADBE".into(),
        primary_name: "Adobe".into(),
        sp_symbol: "^GSPC".into(),
        cac_symbol: "^FCHI".into(),
        default_index: ComparisonIndex::Sp,
        start_date: date(2010, 1, 1),
        end_date: date(2019, 12, 31),
        indicators: with_standard_set(&[]),
    }
}

pub fn sample_data_port() -> MockDataPort {
    MockDataPort::new()
        .with_bars("ADBE", bars_for_years(2010, 2019, 40.0))
        .with_bars("^GSPC", bars_for_years(2010, 2019, 1100.0))
        .with_bars("^FCHI", bars_for_years(2011, 2019, 3500.0))
}

/// Ten years (2010-2019) of primary data, CAC starting a year later.
pub fn sample_dashboard() -> Arc<DashboardData> {
    let data = load_dashboard(
        &sample_data_port(),
        &sample_sources(),
        Some(sample_sentiment(2010, 2019)),
    )
    .unwrap();
    Arc::new(data)
}

pub fn years_of(dates: &[NaiveDate]) -> Vec<i32> {
    let mut years: Vec<i32> = dates.iter().map(|d| d.year()).collect();
    years.dedup();
    years
}
