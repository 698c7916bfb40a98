//! CSV file data adapter.
//!
//! Price files live in one directory as `<SYMBOL>.csv` (a leading `^` in
//! index symbols is dropped from the file name) with a
//! `date,open,high,low,close,volume` header. Header names are matched
//! case-insensitively, so extra columns such as `Adj Close` are ignored.

use crate::domain::error::TickerlensError;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::domain::sentiment::{MacroSentiment, SentimentRow};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

const PRICE_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.csv", symbol.trim_start_matches('^')))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<OhlcvBar>, TickerlensError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| {
            TickerlensError::unavailable(symbol, format!("failed to read {}: {}", path.display(), e))
        })?;
        read_price_csv(&content, &path.display().to_string())
    }
}

/// Parses a price CSV body. `source_name` only labels errors.
pub fn read_price_csv(content: &str, source_name: &str) -> Result<Vec<OhlcvBar>, TickerlensError> {
    let malformed = |reason: String| TickerlensError::MalformedData {
        source_name: source_name.to_string(),
        reason,
    };

    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let headers = rdr
        .headers()
        .map_err(|e| malformed(format!("CSV header error: {}", e)))?
        .clone();

    let mut idx = [0usize; 6];
    for (slot, name) in idx.iter_mut().zip(PRICE_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| malformed(format!("missing {} column", name)))?;
    }
    let [date_i, open_i, high_i, low_i, close_i, volume_i] = idx;

    let mut bars = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| malformed(format!("CSV parse error: {}", e)))?;
        let field = |i: usize, name: &str| {
            record
                .get(i)
                .map(str::trim)
                .ok_or_else(|| malformed(format!("row {}: missing {} value", line + 1, name)))
        };
        let number = |i: usize, name: &str| -> Result<f64, TickerlensError> {
            field(i, name)?
                .parse::<f64>()
                .map_err(|e| malformed(format!("row {}: invalid {} value: {}", line + 1, name, e)))
        };

        // rows with a blank close are non-trading placeholders
        if field(close_i, "close")?.is_empty() {
            continue;
        }

        let date = parse_date(field(date_i, "date")?)
            .ok_or_else(|| malformed(format!("row {}: invalid date", line + 1)))?;

        bars.push(OhlcvBar {
            date,
            open: number(open_i, "open")?,
            high: number(high_i, "high")?,
            low: number(low_i, "low")?,
            close: number(close_i, "close")?,
            volume: number(volume_i, "volume")?.round() as i64,
        });
    }

    Ok(bars)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    // timestamps such as `2020-01-02 00:00:00` keep only the date part
    let value = value.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Loads the macro sentiment table: a `DATE` column plus numeric columns.
///
/// When `columns` is empty every non-date column is kept. Blank or
/// non-numeric cells become gaps.
pub fn load_sentiment(path: &Path, columns: &[String]) -> Result<MacroSentiment, TickerlensError> {
    let source_name = path.display().to_string();
    let malformed = |reason: String| TickerlensError::MalformedData {
        source_name: source_name.clone(),
        reason,
    };

    let content = fs::read_to_string(path)?;
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let headers = rdr
        .headers()
        .map_err(|e| malformed(format!("CSV header error: {}", e)))?
        .clone();

    let date_i = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("date"))
        .ok_or_else(|| malformed("missing DATE column".to_string()))?;

    let selected: Vec<(usize, String)> = if columns.is_empty() {
        headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_i)
            .map(|(i, h)| (i, h.trim().to_string()))
            .collect()
    } else {
        columns
            .iter()
            .map(|name| {
                headers
                    .iter()
                    .position(|h| h.trim() == name)
                    .map(|i| (i, name.clone()))
                    .ok_or_else(|| malformed(format!("missing {} column", name)))
            })
            .collect::<Result<_, _>>()?
    };

    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| malformed(format!("CSV parse error: {}", e)))?;
        let date = record
            .get(date_i)
            .and_then(parse_date)
            .ok_or_else(|| malformed(format!("row {}: invalid date", line + 1)))?;
        let values = selected
            .iter()
            .map(|(i, _)| record.get(*i).and_then(|v| v.trim().parse::<f64>().ok()))
            .collect();
        rows.push(SentimentRow { date, values });
    }

    let names = selected.into_iter().map(|(_, name)| name).collect();
    Ok(MacroSentiment::new(names, rows))
}

impl DataPort for CsvAdapter {
    fn fetch(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TickerlensError> {
        let bars = self
            .read_all(symbol)?
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect();
        PriceSeries::new(symbol, bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TickerlensError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut symbols = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TickerlensError> {
        if !self.csv_path(symbol).exists() {
            return Ok(None);
        }
        let bars = self.read_all(symbol)?;
        let first = bars.iter().map(|b| b.date).min();
        let last = bars.iter().map(|b| b.date).max();
        Ok(first.zip(last).map(|(first, last)| (first, last, bars.len())))
    }
}
