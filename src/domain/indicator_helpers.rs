//! Batch indicator computation shared by every loaded instrument.

use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::log_return::calculate_log_return;
use crate::domain::indicator::normalize::calculate_normalized_close;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::{calculate_sma, calculate_volume_sma};
use crate::domain::indicator::{IndicatorSeries, IndicatorType, ParseIndicatorError};
use crate::domain::ohlcv::OhlcvBar;
use std::collections::HashMap;

/// The indicator set the dashboard panels read from.
pub const STANDARD_INDICATORS: [IndicatorType; 11] = [
    IndicatorType::VolumeSma(5),
    IndicatorType::Rsi(3),
    IndicatorType::Rsi(9),
    IndicatorType::Rsi(14),
    IndicatorType::Rsi(30),
    IndicatorType::Sma(10),
    IndicatorType::Sma(30),
    IndicatorType::Sma(50),
    IndicatorType::Ema(10),
    IndicatorType::LogReturn,
    IndicatorType::NormalizedClose,
];

pub fn calculate(bars: &[OhlcvBar], indicator_type: IndicatorType) -> IndicatorSeries {
    match indicator_type {
        IndicatorType::Sma(period) => calculate_sma(bars, period),
        IndicatorType::VolumeSma(period) => calculate_volume_sma(bars, period),
        IndicatorType::Ema(period) => calculate_ema(bars, period),
        IndicatorType::Rsi(period) => calculate_rsi(bars, period),
        IndicatorType::LogReturn => calculate_log_return(bars),
        IndicatorType::NormalizedClose => calculate_normalized_close(bars),
    }
}

/// Computes every requested indicator once; duplicates are computed once.
pub fn compute_indicators(
    bars: &[OhlcvBar],
    types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut out = HashMap::with_capacity(types.len());
    for &ty in types {
        out.entry(ty).or_insert_with(|| calculate(bars, ty));
    }
    out
}

/// Parses a comma-separated indicator list such as `SMA(10),RSI(14),LOGRET`.
pub fn parse_indicator_set(input: &str) -> Result<Vec<IndicatorType>, ParseIndicatorError> {
    let mut types = Vec::new();
    for token in input.split(',').filter(|t| !t.trim().is_empty()) {
        let ty = token.parse::<IndicatorType>()?;
        if !types.contains(&ty) {
            types.push(ty);
        }
    }
    Ok(types)
}

/// Adds the standard set to `extra`, preserving order and dropping duplicates.
pub fn with_standard_set(extra: &[IndicatorType]) -> Vec<IndicatorType> {
    let mut types = STANDARD_INDICATORS.to_vec();
    for ty in extra {
        if !types.contains(ty) {
            types.push(*ty);
        }
    }
    types
}
