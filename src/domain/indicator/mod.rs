//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single dated point, `None` while the indicator is undefined
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values aligned with its bars
//!
//! Every calculation returns one point per input bar. Windows that cannot be
//! filled (period 0, or fewer bars than the period) yield an all-`None` series
//! rather than an error.

pub mod ema;
pub mod log_return;
pub mod normalize;
pub mod rsi;
pub mod sma;

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorType {
    /// Simple moving average of closes.
    Sma(usize),
    /// Simple moving average of volumes.
    VolumeSma(usize),
    Ema(usize),
    Rsi(usize),
    LogReturn,
    NormalizedClose,
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// A series with every point undefined, aligned with `bars`.
    pub fn undefined(indicator_type: IndicatorType, bars: &[OhlcvBar]) -> Self {
        Self {
            indicator_type,
            values: bars
                .iter()
                .map(|b| IndicatorPoint {
                    date: b.date,
                    value: None,
                })
                .collect(),
        }
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(|p| p.value)
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|p| p.value.is_some()).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::VolumeSma(period) => write!(f, "VSMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::LogReturn => write!(f, "LOGRET"),
            IndicatorType::NormalizedClose => write!(f, "NORM"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unrecognised indicator '{0}'")]
pub struct ParseIndicatorError(pub String);

impl FromStr for IndicatorType {
    type Err = ParseIndicatorError;

    /// Parses the `Display` form, case-insensitively: `SMA(10)`, `VSMA(5)`,
    /// `EMA(10)`, `RSI(14)`, `LOGRET`, `NORM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_uppercase();
        let err = || ParseIndicatorError(s.trim().to_string());

        match token.as_str() {
            "LOGRET" => return Ok(IndicatorType::LogReturn),
            "NORM" => return Ok(IndicatorType::NormalizedClose),
            _ => {}
        }

        let (name, rest) = token.split_once('(').ok_or_else(err)?;
        let period: usize = rest
            .strip_suffix(')')
            .ok_or_else(err)?
            .trim()
            .parse()
            .map_err(|_| err())?;

        match name.trim() {
            "SMA" => Ok(IndicatorType::Sma(period)),
            "VSMA" => Ok(IndicatorType::VolumeSma(period)),
            "EMA" => Ok(IndicatorType::Ema(period)),
            "RSI" => Ok(IndicatorType::Rsi(period)),
            _ => Err(err()),
        }
    }
}
