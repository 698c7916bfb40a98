//! Read-only data shared by every dashboard session.

use crate::domain::derived::DerivedSeries;
use crate::domain::error::TickerlensError;
use crate::domain::indicator::IndicatorType;
use crate::domain::sentiment::MacroSentiment;
use crate::domain::view_state::{ComparisonIndex, YearRange};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use tracing::info;

/// Instruments and date window to load at startup.
#[derive(Debug, Clone)]
pub struct DashboardSources {
    pub primary_symbol: String,
    pub primary_name: String,
    pub sp_symbol: String,
    pub cac_symbol: String,
    pub default_index: ComparisonIndex,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub indicators: Vec<IndicatorType>,
}

#[derive(Debug, Clone)]
pub struct DashboardData {
    pub primary: DerivedSeries,
    pub primary_name: String,
    pub sp: DerivedSeries,
    pub cac: DerivedSeries,
    pub default_index: ComparisonIndex,
    pub sentiment: Option<MacroSentiment>,
}

impl DashboardData {
    pub fn index(&self, which: ComparisonIndex) -> &DerivedSeries {
        match which {
            ComparisonIndex::Sp => &self.sp,
            ComparisonIndex::Cac => &self.cac,
        }
    }

    /// Full year span of the primary instrument; the default filter window.
    pub fn primary_span(&self) -> YearRange {
        let (min, max) = self.primary.year_span();
        YearRange { min, max }
    }
}

/// Fetches every instrument and computes its indicators once.
/// Any missing instrument aborts the load.
pub fn load_dashboard(
    data_port: &dyn DataPort,
    sources: &DashboardSources,
    sentiment: Option<MacroSentiment>,
) -> Result<DashboardData, TickerlensError> {
    let load = |symbol: &str| -> Result<DerivedSeries, TickerlensError> {
        let series = data_port.fetch(symbol, sources.start_date, sources.end_date)?;
        info!(symbol, rows = series.len(), "loaded price series");
        Ok(DerivedSeries::compute(series, &sources.indicators))
    };

    let primary = load(&sources.primary_symbol)?;
    let sp = load(&sources.sp_symbol)?;
    let cac = load(&sources.cac_symbol)?;

    if let Some(table) = &sentiment {
        info!(
            rows = table.rows().len(),
            columns = table.columns().len(),
            "loaded macro sentiment"
        );
    }

    Ok(DashboardData {
        primary,
        primary_name: sources.primary_name.clone(),
        sp,
        cac,
        default_index: sources.default_index,
        sentiment,
    })
}
