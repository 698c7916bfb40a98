//! SQLite data adapter.

use crate::domain::error::TickerlensError;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn query_err(e: rusqlite::Error) -> TickerlensError {
    TickerlensError::DatabaseQuery {
        reason: e.to_string(),
    }
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TickerlensError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| TickerlensError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4).max(1) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool =
            Pool::builder()
                .max_size(pool_size)
                .build(manager)
                .map_err(|e: r2d2::Error| TickerlensError::Database {
                    reason: e.to_string(),
                })?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, TickerlensError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| TickerlensError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, TickerlensError> {
        self.pool
            .get()
            .map_err(|e: r2d2::Error| TickerlensError::Database {
                reason: e.to_string(),
            })
    }

    pub fn initialize_schema(&self) -> Result<(), TickerlensError> {
        self.conn()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS ohlcv (
                    symbol TEXT NOT NULL,
                    date TEXT NOT NULL,
                    open REAL NOT NULL,
                    high REAL NOT NULL,
                    low REAL NOT NULL,
                    close REAL NOT NULL,
                    volume INTEGER NOT NULL,
                    PRIMARY KEY (symbol, date)
                );
                CREATE INDEX IF NOT EXISTS idx_ohlcv_date ON ohlcv(date);",
            )
            .map_err(query_err)
    }

    /// Upserts `bars` for `symbol` in one transaction; returns the row count.
    pub fn insert_bars(&self, symbol: &str, bars: &[OhlcvBar]) -> Result<usize, TickerlensError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;

        for bar in bars {
            tx.execute(
                "INSERT OR REPLACE INTO ohlcv (symbol, date, open, high, low, close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    symbol,
                    bar.date.format("%Y-%m-%d").to_string(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume
                ],
            )
            .map_err(query_err)?;
        }

        tx.commit().map_err(query_err)?;
        Ok(bars.len())
    }
}

impl DataPort for SqliteAdapter {
    fn fetch(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TickerlensError> {
        let conn = self.conn()?;

        let start_str = start_date.format("%Y-%m-%d").to_string();
        let end_str = end_date.format("%Y-%m-%d").to_string();

        let query = "SELECT date, open, high, low, close, volume
                     FROM ohlcv
                     WHERE symbol = ?1 AND date >= ?2 AND date <= ?3
                     ORDER BY date ASC";

        let mut stmt = conn.prepare(query).map_err(query_err)?;

        let rows = stmt
            .query_map(params![symbol, start_str, end_str], |row| {
                let date_str: String = row.get(0)?;
                let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(OhlcvBar {
                    date,
                    open: row.get(1)?,
                    high: row.get(2)?,
                    low: row.get(3)?,
                    close: row.get(4)?,
                    volume: row.get(5)?,
                })
            })
            .map_err(query_err)?;

        let bars = rows.collect::<Result<Vec<_>, _>>().map_err(query_err)?;
        PriceSeries::new(symbol, bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TickerlensError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT symbol FROM ohlcv ORDER BY symbol")
            .map_err(query_err)?;

        let rows = stmt.query_map([], |row| row.get(0)).map_err(query_err)?;
        rows.collect::<Result<Vec<String>, _>>().map_err(query_err)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TickerlensError> {
        let conn = self.conn()?;

        let query = "SELECT MIN(date), MAX(date), COUNT(*) FROM ohlcv WHERE symbol = ?1";

        let result: (Option<String>, Option<String>, i64) = conn
            .query_row(query, params![symbol], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(query_err)?;

        let parse = |s: &str| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e: chrono::ParseError| {
                TickerlensError::Database {
                    reason: e.to_string(),
                }
            })
        };

        match result {
            (Some(min_str), Some(max_str), count) if count > 0 => {
                Ok(Some((parse(&min_str)?, parse(&max_str)?, count as usize)))
            }
            _ => Ok(None),
        }
    }
}
