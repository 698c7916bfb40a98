//! CLI integration tests for dashboard loading and offline rendering.
//!
//! Tests cover:
//! - Source construction from INI files (build_dashboard_sources)
//! - Data port selection (build_data_port)
//! - Full load from CSV files on disk
//! - Offline render of charts, tables and JSON payloads
//! - SQLite import round trip

mod common;

use common::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use tickerlens::adapters::file_config_adapter::FileConfigAdapter;
use tickerlens::cli::{self, RenderRequest};
use tickerlens::domain::error::TickerlensError;
use tickerlens::domain::indicator::IndicatorType;
use tickerlens::domain::view_state::ComparisonIndex;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn write_price_csv(dir: &Path, file: &str, bars: &[OhlcvBar]) {
    let mut body = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for b in bars {
        body.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.close, b.volume
        ));
    }
    fs::write(dir.join(file), body).unwrap();
}

fn write_sentiment_csv(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("macro.csv");
    let mut body = String::from("DATE,UMCSENT,CPIAUCSL,UNRATE\n");
    for y in 2012..=2014 {
        for m in 1..=12 {
            body.push_str(&format!("{y}-{m:02}-01,{},{},5.0\n", 70 + m, 230 + y - 2012));
        }
    }
    fs::write(&path, body).unwrap();
    path
}

/// A CSV data directory with three years of data for every instrument.
fn csv_fixture() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    write_price_csv(dir.path(), "ADBE.csv", &bars_for_years(2012, 2014, 40.0));
    write_price_csv(dir.path(), "GSPC.csv", &bars_for_years(2012, 2014, 1400.0));
    write_price_csv(dir.path(), "FCHI.csv", &bars_for_years(2012, 2014, 3600.0));
    let sentiment = write_sentiment_csv(dir.path());

    let ini = format!(
        "[data]\nsource = csv\ncsv_dir = {}\nstart_date = 2012-01-01\nend_date = 2014-12-31\n\n\
         [instruments]\nprimary = ADBE\nprimary_name = Adobe\nsp = ^GSPC\ncac = ^FCHI\ndefault_index = CAC\n\n\
         [indicators]\nset = SMA(200)\n\n\
         [sentiment]\npath = {}\ncolumns = UMCSENT,CPIAUCSL\n",
        dir.path().display(),
        sentiment.display()
    );
    (dir, ini)
}

#[test]
fn sources_from_config() {
    let (_dir, ini) = csv_fixture();
    let config = FileConfigAdapter::from_string(&ini).unwrap();
    let sources = cli::build_dashboard_sources(&config, date(2024, 6, 1)).unwrap();

    assert_eq!(sources.primary_symbol, "ADBE");
    assert_eq!(sources.primary_name, "Adobe");
    assert_eq!(sources.sp_symbol, "^GSPC");
    assert_eq!(sources.default_index, ComparisonIndex::Cac);
    assert_eq!(sources.start_date, date(2012, 1, 1));
    assert_eq!(sources.end_date, date(2014, 12, 31));
    assert!(sources.indicators.contains(&IndicatorType::Sma(200)));
    assert!(sources.indicators.contains(&IndicatorType::Rsi(14)));
    assert!(sources.indicators.contains(&IndicatorType::LogReturn));
}

#[test]
fn missing_end_date_defaults_to_today() {
    let config = FileConfigAdapter::from_string(
        "[data]\nstart_date = 2020-01-01\n[instruments]\nprimary = ADBE\nsp = ^GSPC\ncac = ^FCHI\n",
    )
    .unwrap();
    let sources = cli::build_dashboard_sources(&config, date(2024, 6, 1)).unwrap();
    assert_eq!(sources.end_date, date(2024, 6, 1));
    assert_eq!(sources.primary_name, "ADBE");
    assert_eq!(sources.default_index, ComparisonIndex::Sp);
}

#[test]
fn missing_primary_is_reported() {
    let config =
        FileConfigAdapter::from_string("[data]\nstart_date = 2020-01-01\n[instruments]\nsp = ^GSPC\n")
            .unwrap();
    let err = cli::build_dashboard_sources(&config, date(2024, 6, 1)).unwrap_err();
    assert!(matches!(err, TickerlensError::ConfigMissing { ref key, .. } if key == "primary"));
}

#[test]
fn csv_data_port_lists_files() {
    let (_dir, ini) = csv_fixture();
    let config = FileConfigAdapter::from_string(&ini).unwrap();
    let port = cli::build_data_port(&config).unwrap();

    let symbols = port.list_symbols().unwrap();
    assert!(symbols.contains(&"ADBE".to_string()));
    let (first, last, _) = port.get_data_range("^GSPC").unwrap().unwrap();
    assert_eq!(first, date(2012, 1, 1));
    assert_eq!(last, date(2014, 12, 31));
}

#[test]
fn unknown_source_is_rejected() {
    let config = FileConfigAdapter::from_string("[data]\nsource = parquet\n").unwrap();
    assert!(matches!(
        cli::build_data_port(&config),
        Err(TickerlensError::ConfigInvalid { .. })
    ));
}

#[test]
fn sentiment_is_optional() {
    let config = FileConfigAdapter::from_string("[data]\nsource = csv\n").unwrap();
    assert!(cli::load_sentiment_table(&config).unwrap().is_none());
}

#[test]
fn sentiment_columns_are_selected() {
    let (_dir, ini) = csv_fixture();
    let config = FileConfigAdapter::from_string(&ini).unwrap();
    let table = cli::load_sentiment_table(&config).unwrap().unwrap();
    assert_eq!(table.columns(), &["UMCSENT".to_string(), "CPIAUCSL".to_string()]);
    assert_eq!(table.rows().len(), 36);
}

#[test]
fn full_load_from_csv_directory() {
    let (_dir, ini) = csv_fixture();
    let config = FileConfigAdapter::from_string(&ini).unwrap();
    let data = cli::load_dashboard_from_config(&config).unwrap();

    assert_eq!(data.primary_name, "Adobe");
    assert_eq!(data.default_index, ComparisonIndex::Cac);
    assert_eq!(data.primary_span().min, 2012);
    assert_eq!(data.primary_span().max, 2014);
    assert!(data.sentiment.is_some());
}

#[test]
fn full_load_fails_for_missing_file() {
    let (dir, ini) = csv_fixture();
    fs::remove_file(dir.path().join("FCHI.csv")).unwrap();
    let config = FileConfigAdapter::from_string(&ini).unwrap();
    let err = cli::load_dashboard_from_config(&config).unwrap_err();
    assert!(matches!(err, TickerlensError::UnavailableData { .. }));
}

#[test]
fn render_chart_as_svg() {
    let request = RenderRequest {
        target: "primary-graph".into(),
        years: Some("2015".into()),
        ..RenderRequest::default()
    };
    let svg = cli::render_target(sample_dashboard(), &request).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Adobe Stock Analysis"));
}

#[test]
fn render_table_as_html() {
    let request = RenderRequest {
        target: "sentiment-table".into(),
        years: Some("2012-2013".into()),
        ..RenderRequest::default()
    };
    let html = cli::render_target(sample_dashboard(), &request).unwrap();
    assert!(html.contains("<table class=\"data-table\""));
    assert_eq!(html.matches("<tr").count(), 1 + 24);
}

#[test]
fn render_json_applies_index_and_mode() {
    let request = RenderRequest {
        target: "index-graph".into(),
        index: Some("CAC".into()),
        mode: Some("rend".into()),
        json: true,
        ..RenderRequest::default()
    };
    let json = cli::render_target(sample_dashboard(), &request).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["title"], "CAC Index vs Adobe");
    assert_eq!(value["traces"][0]["name"], "CAC LogReturn");
}

#[test]
fn render_slider_falls_back_to_json() {
    let request = RenderRequest {
        target: "year-range-slider".into(),
        ..RenderRequest::default()
    };
    let json = cli::render_target(sample_dashboard(), &request).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["min"], 2010);
    assert_eq!(value["max"], 2019);
}

#[test]
fn render_unknown_target_fails() {
    let request = RenderRequest {
        target: "volume-graph".into(),
        ..RenderRequest::default()
    };
    let err = cli::render_target(sample_dashboard(), &request).unwrap_err();
    assert!(matches!(err, TickerlensError::InvalidEventValue { .. }));
}

#[test]
fn load_config_reads_file() {
    let (_dir, ini) = csv_fixture();
    let file = write_temp_ini(&ini);
    let config = cli::load_config(file.path()).unwrap();
    let sources = cli::build_dashboard_sources(&config, date(2024, 1, 1)).unwrap();
    assert_eq!(sources.cac_symbol, "^FCHI");
}

#[test]
fn load_config_missing_file_fails() {
    assert!(cli::load_config(Path::new("/nonexistent/tickerlens.ini")).is_err());
}

#[cfg(feature = "sqlite")]
#[test]
fn import_then_load_from_sqlite() {
    use tickerlens::adapters::csv_adapter::read_price_csv;
    use tickerlens::adapters::sqlite_adapter::SqliteAdapter;

    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("prices.db");
    let ini = format!(
        "[data]\nsource = sqlite\nstart_date = 2012-01-01\n[sqlite]\npath = {}\n\
         [instruments]\nprimary = ADBE\nsp = ^GSPC\ncac = ^FCHI\n",
        db.display()
    );
    let config = FileConfigAdapter::from_string(&ini).unwrap();

    let adapter = SqliteAdapter::from_config(&config).unwrap();
    adapter.initialize_schema().unwrap();
    for (symbol, base) in [("ADBE", 40.0), ("^GSPC", 1400.0), ("^FCHI", 3600.0)] {
        write_price_csv(dir.path(), "in.csv", &bars_for_years(2012, 2013, base));
        let content = fs::read_to_string(dir.path().join("in.csv")).unwrap();
        let bars = read_price_csv(&content, "in.csv").unwrap();
        assert_eq!(adapter.insert_bars(symbol, &bars).unwrap(), bars.len());
    }

    let data = cli::load_dashboard_from_config(&config).unwrap();
    assert_eq!(data.primary_span().max, 2013);
    let vm = tickerlens::domain::view_model::ViewModel::new(std::sync::Arc::new(data));
    assert_eq!(vm.effective_range().min, 2012);
}
