//! Simple Moving Average over closes or volumes.
//!
//! SMA(n)[i] = mean(X[i-n+1..=i]).
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    rolling_mean(bars, period, IndicatorType::Sma(period), |b| b.close)
}

pub fn calculate_volume_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    rolling_mean(bars, period, IndicatorType::VolumeSma(period), |b| {
        b.volume as f64
    })
}

fn rolling_mean(
    bars: &[OhlcvBar],
    period: usize,
    indicator_type: IndicatorType,
    field: impl Fn(&OhlcvBar) -> f64,
) -> IndicatorSeries {
    if period == 0 || bars.len() < period {
        return IndicatorSeries::undefined(indicator_type, bars);
    }

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let value = if i + 1 >= period {
                let window = &bars[i + 1 - period..=i];
                Some(window.iter().map(&field).sum::<f64>() / period as f64)
            } else {
                None
            };
            IndicatorPoint {
                date: bar.date,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
