//! PostgreSQL data adapter.

use crate::domain::error::TickerlensError;
use crate::domain::ohlcv::{OhlcvBar, PriceSeries};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use postgres::NoTls;
use r2d2::{Pool, PooledConnection};
use r2d2_postgres::PostgresConnectionManager;

type Manager = PostgresConnectionManager<NoTls>;

pub struct PostgresAdapter {
    pool: Pool<Manager>,
}

fn query_err(e: postgres::Error) -> TickerlensError {
    TickerlensError::DatabaseQuery {
        reason: e.to_string(),
    }
}

impl PostgresAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TickerlensError> {
        let conninfo =
            config
                .get_string("database", "conninfo")
                .ok_or_else(|| TickerlensError::ConfigMissing {
                    section: "database".into(),
                    key: "conninfo".into(),
                })?;

        let pg_config = conninfo
            .parse::<postgres::Config>()
            .map_err(|e| TickerlensError::ConfigInvalid {
                section: "database".into(),
                key: "conninfo".into(),
                reason: e.to_string(),
            })?;

        let pool_size = config.get_int("database", "pool_size", 4).max(1) as u32;
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(PostgresConnectionManager::new(pg_config, NoTls))
            .map_err(|e: r2d2::Error| TickerlensError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<Manager>, TickerlensError> {
        self.pool
            .get()
            .map_err(|e: r2d2::Error| TickerlensError::Database {
                reason: e.to_string(),
            })
    }
}

impl DataPort for PostgresAdapter {
    fn fetch(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TickerlensError> {
        let query = "SELECT date, \
                            open::double precision, high::double precision, \
                            low::double precision, close::double precision, \
                            volume::bigint \
                     FROM public.ohlcv \
                     WHERE symbol = $1 AND date >= $2 AND date <= $3 \
                     ORDER BY date ASC";

        let rows = self
            .conn()?
            .query(query, &[&symbol, &start_date, &end_date])
            .map_err(query_err)?;

        let bars = rows
            .into_iter()
            .map(|row| OhlcvBar {
                date: row.get(0),
                open: row.get(1),
                high: row.get(2),
                low: row.get(3),
                close: row.get(4),
                volume: row.get(5),
            })
            .collect();

        PriceSeries::new(symbol, bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, TickerlensError> {
        let rows = self
            .conn()?
            .query("SELECT DISTINCT symbol FROM public.ohlcv ORDER BY symbol", &[])
            .map_err(query_err)?;

        Ok(rows.into_iter().map(|row| row.get(0)).collect())
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, TickerlensError> {
        let query = "SELECT MIN(date), MAX(date), COUNT(*) FROM public.ohlcv WHERE symbol = $1";

        let row = self
            .conn()?
            .query_one(query, &[&symbol])
            .map_err(query_err)?;

        let min: Option<NaiveDate> = row.get(0);
        let max: Option<NaiveDate> = row.get(1);
        let count: i64 = row.get(2);

        match (min, max) {
            (Some(min), Some(max)) if count > 0 => Ok(Some((min, max, count as usize))),
            _ => Ok(None),
        }
    }
}
