//! Min-max normalization over a whole loaded series.
//!
//! N[i] = (X[i] - min) / (max - min), with min and max taken over every
//! defined value of the input, not over any later display window.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_normalized_close(bars: &[OhlcvBar]) -> IndicatorSeries {
    let closes: Vec<Option<f64>> = bars.iter().map(|b| Some(b.close)).collect();
    let values = min_max(&closes)
        .into_iter()
        .zip(bars)
        .map(|(value, bar)| IndicatorPoint {
            date: bar.date,
            value,
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::NormalizedClose,
        values,
    }
}

/// Normalizes the defined values into [0, 1]. Missing inputs stay missing;
/// a constant (or empty) input has no range and normalizes to all `None`.
pub fn min_max(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let defined = values.iter().flatten().filter(|v| v.is_finite());
    let (min, max) = defined.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    });

    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return vec![None; values.len()];
    }

    values
        .iter()
        .map(|v| v.filter(|x| x.is_finite()).map(|x| (x - min) / range))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn extremes_map_to_zero_and_one() {
        let series = calculate_normalized_close(&make_bars(&[20.0, 10.0, 30.0, 25.0]));
        assert_eq!(series.value_at(1), Some(0.0));
        assert_eq!(series.value_at(2), Some(1.0));
        assert_eq!(series.value_at(0), Some(0.5));
        assert_eq!(series.value_at(3), Some(0.75));
    }

    #[test]
    fn constant_series_is_undefined() {
        let series = calculate_normalized_close(&make_bars(&[5.0, 5.0, 5.0]));
        assert_eq!(series.values.len(), 3);
        assert_eq!(series.defined_count(), 0);
    }

    #[test]
    fn min_max_keeps_gaps() {
        let out = min_max(&[Some(1.0), None, Some(3.0)]);
        assert_eq!(out, vec![Some(0.0), None, Some(1.0)]);
    }

    #[test]
    fn min_max_of_empty() {
        assert!(min_max(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn normalized_close_is_bounded_with_single_extremes(
            mut prices in prop::collection::vec(1.0f64..1_000.0, 2..100),
        ) {
            // force unique extremes
            let n = prices.len();
            prices[0] = 0.5;
            prices[n - 1] = 2_000.0;
            let series = calculate_normalized_close(&make_bars(&prices));

            let values: Vec<f64> = series.values.iter().map(|p| p.value.unwrap()).collect();
            prop_assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
            prop_assert_eq!(values.iter().filter(|&&v| v == 1.0).count(), 1);
            prop_assert_eq!(values.iter().filter(|&&v| v == 0.0).count(), 1);
        }
    }
}
