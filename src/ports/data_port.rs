//! Price data access port trait.

use crate::domain::error::TickerlensError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `symbol` in `[start_date, end_date]`, ascending.
    ///
    /// Fails with `UnavailableData` when the symbol is unknown or the range
    /// holds no rows.
    fn fetch(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TickerlensError>;

    fn list_symbols(&self) -> Result<Vec<String>, TickerlensError>;

    /// First date, last date and row count, or `None` for an unknown symbol.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TickerlensError>;
}
