//! Configuration validation.
//!
//! Checks every dashboard setting up front so startup fails before any data
//! is fetched.

use crate::domain::error::TickerlensError;
use crate::domain::indicator_helpers::parse_indicator_set;
use crate::domain::view_state::ComparisonIndex;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::net::SocketAddr;

pub const DATA_SOURCES: [&str; 3] = ["csv", "sqlite", "postgres"];

pub fn validate_dashboard_config(config: &dyn ConfigPort) -> Result<(), TickerlensError> {
    validate_data_source(config)?;
    validate_dates(config)?;
    validate_instruments(config)?;
    validate_indicators(config)?;
    validate_sentiment(config)?;
    validate_web(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> TickerlensError {
    TickerlensError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn require(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, TickerlensError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(TickerlensError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

/// `[data] source`, defaulting to `csv`.
pub fn data_source(config: &dyn ConfigPort) -> String {
    config
        .get_string("data", "source")
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "csv".to_string())
}

fn validate_data_source(config: &dyn ConfigPort) -> Result<(), TickerlensError> {
    let source = data_source(config);
    match source.as_str() {
        "csv" => require(config, "data", "csv_dir").map(|_| ()),
        "sqlite" => require(config, "sqlite", "path").map(|_| ()),
        "postgres" => require(config, "database", "conninfo").map(|_| ()),
        other => Err(invalid(
            "data",
            "source",
            format!("unknown source '{}', expected one of {}", other, DATA_SOURCES.join(", ")),
        )),
    }
}

/// Parses an optional `YYYY-MM-DD` value.
pub fn parse_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, TickerlensError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid(section, key, format!("invalid {} format, expected YYYY-MM-DD", key))),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TickerlensError> {
    let start_date =
        parse_date(config, "data", "start_date")?.ok_or_else(|| TickerlensError::ConfigMissing {
            section: "data".to_string(),
            key: "start_date".to_string(),
        })?;

    if let Some(end_date) = parse_date(config, "data", "end_date")? {
        if start_date >= end_date {
            return Err(invalid("data", "start_date", "start_date must be before end_date"));
        }
    }
    Ok(())
}

fn validate_instruments(config: &dyn ConfigPort) -> Result<(), TickerlensError> {
    require(config, "instruments", "primary")?;
    require(config, "instruments", "sp")?;
    require(config, "instruments", "cac")?;

    if let Some(key) = config.get_string("instruments", "default_index") {
        if ComparisonIndex::from_key(&key).is_none() {
            return Err(invalid(
                "instruments",
                "default_index",
                format!("unknown index '{}', expected SP or CAC", key.trim()),
            ));
        }
    }
    Ok(())
}

fn validate_indicators(config: &dyn ConfigPort) -> Result<(), TickerlensError> {
    if let Some(set) = config.get_string("indicators", "set") {
        parse_indicator_set(&set).map_err(|e| invalid("indicators", "set", e.to_string()))?;
    }
    Ok(())
}

fn validate_sentiment(config: &dyn ConfigPort) -> Result<(), TickerlensError> {
    if config.get_string("sentiment", "path").is_none() {
        return Ok(());
    }
    if let Some(columns) = config.get_string("sentiment", "columns") {
        if columns.split(',').any(|c| c.trim().is_empty()) {
            return Err(invalid("sentiment", "columns", "empty column name"));
        }
    }
    Ok(())
}

fn validate_web(config: &dyn ConfigPort) -> Result<(), TickerlensError> {
    if let Some(listen) = config.get_string("web", "listen") {
        listen
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| invalid("web", "listen", e.to_string()))?;
    }
    if config.get_int("web", "session_idle_minutes", 60) < 1 {
        return Err(invalid(
            "web",
            "session_idle_minutes",
            "session_idle_minutes must be at least 1",
        ));
    }
    Ok(())
}
