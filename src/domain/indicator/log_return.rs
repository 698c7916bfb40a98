//! Daily log return: ln(C[i] / C[i-1]).
//!
//! Undefined for the first bar and wherever either close is non-positive.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_log_return(bars: &[OhlcvBar]) -> IndicatorSeries {
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let value = if i == 0 {
                None
            } else {
                let prev = bars[i - 1].close;
                (prev > 0.0 && bar.close > 0.0).then(|| (bar.close / prev).ln())
            };
            IndicatorPoint {
                date: bar.date,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::LogReturn,
        values,
    }
}
