//! Price series augmented with its computed indicators.
//!
//! A `DerivedSeries` is built once at load time and never mutated; views read
//! it through year-bounded `SeriesWindow`s.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::compute_indicators;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::domain::view_state::YearRange;
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::ops::Range;

#[derive(Debug, Clone)]
pub struct DerivedSeries {
    series: PriceSeries,
    indicators: HashMap<IndicatorType, IndicatorSeries>,
}

impl DerivedSeries {
    pub fn compute(series: PriceSeries, types: &[IndicatorType]) -> Self {
        let indicators = compute_indicators(series.bars(), types);
        Self { series, indicators }
    }

    pub fn symbol(&self) -> &str {
        self.series.symbol()
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        self.series.bars()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn year_span(&self) -> (i32, i32) {
        self.series.year_span()
    }

    pub fn indicator(&self, indicator_type: IndicatorType) -> Option<&IndicatorSeries> {
        self.indicators.get(&indicator_type)
    }

    /// Indices of the rows whose calendar year lies in the range (inclusive).
    /// Bars are sorted, so the matching rows are contiguous.
    pub fn year_rows(&self, range: YearRange) -> Range<usize> {
        let bars = self.bars();
        let start = bars.partition_point(|b| b.date.year() < range.min);
        let end = bars.partition_point(|b| b.date.year() <= range.max);
        start..end.max(start)
    }

    pub fn window(&self, range: YearRange) -> SeriesWindow<'_> {
        SeriesWindow {
            series: self,
            rows: self.year_rows(range),
        }
    }
}

/// A contiguous, year-bounded view into a `DerivedSeries`.
#[derive(Debug, Clone)]
pub struct SeriesWindow<'a> {
    series: &'a DerivedSeries,
    rows: Range<usize>,
}

impl<'a> SeriesWindow<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn bars(&self) -> &'a [OhlcvBar] {
        &self.series.bars()[self.rows.clone()]
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars().iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<Option<f64>> {
        self.bars().iter().map(|b| Some(b.close)).collect()
    }

    /// Values of one indicator over the window; an indicator that was not
    /// computed reads as all gaps.
    pub fn column(&self, indicator_type: IndicatorType) -> Vec<Option<f64>> {
        match self.series.indicator(indicator_type) {
            Some(ind) => self.rows.clone().map(|i| ind.value_at(i)).collect(),
            None => vec![None; self.len()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator_helpers::STANDARD_INDICATORS;
    use proptest::prelude::*;

    fn daily_series(start: &str, days: usize) -> PriceSeries {
        let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
        let bars = (0..days)
            .map(|i| {
                let close = 100.0 + (i % 17) as f64;
                OhlcvBar {
                    date: start + chrono::Duration::days(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000,
                }
            })
            .collect();
        PriceSeries::new("ADBE", bars).unwrap()
    }

    #[test]
    fn single_year_window_only_holds_that_year() {
        let derived = DerivedSeries::compute(daily_series("2010-01-01", 3653), &STANDARD_INDICATORS);
        let window = derived.window(YearRange::new(2015, 2015));

        assert_eq!(window.len(), 365);
        assert!(window.bars().iter().all(|b| b.date.year() == 2015));
    }

    #[test]
    fn window_outside_data_is_empty() {
        let derived = DerivedSeries::compute(daily_series("2010-01-01", 100), &[]);
        let window = derived.window(YearRange::new(2030, 2031));
        assert!(window.is_empty());
        assert!(window.dates().is_empty());
    }

    #[test]
    fn column_reads_indicator_values_at_absolute_rows() {
        let derived = DerivedSeries::compute(
            daily_series("2019-12-20", 30),
            &[IndicatorType::Sma(5)],
        );
        let window = derived.window(YearRange::new(2020, 2020));
        let column = window.column(IndicatorType::Sma(5));
        let sma = derived.indicator(IndicatorType::Sma(5)).unwrap();

        let offset = derived.year_rows(YearRange::new(2020, 2020)).start;
        for (i, v) in column.iter().enumerate() {
            assert_eq!(*v, sma.value_at(offset + i));
        }
    }

    #[test]
    fn missing_indicator_reads_as_gaps() {
        let derived = DerivedSeries::compute(daily_series("2020-01-01", 10), &[]);
        let window = derived.window(YearRange::new(2020, 2020));
        assert_eq!(window.column(IndicatorType::Rsi(14)), vec![None; 10]);
    }

    proptest! {
        #[test]
        fn window_row_count_matches_year_filter(
            days in 1usize..2_000,
            a in 2008i32..2016,
            b in 2008i32..2016,
        ) {
            let derived = DerivedSeries::compute(daily_series("2009-06-15", days), &[]);
            let (min, max) = (a.min(b), a.max(b));
            let expected = derived
                .bars()
                .iter()
                .filter(|bar| (min..=max).contains(&bar.date.year()))
                .count();
            prop_assert_eq!(derived.window(YearRange::new(min, max)).len(), expected);
        }
    }
}
