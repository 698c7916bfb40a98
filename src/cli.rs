//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::adapters::chart_svg;
use crate::adapters::csv_adapter::{self, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_table;
use crate::domain::config_validation::{data_source, parse_date, validate_dashboard_config};
use crate::domain::dashboard::{DashboardData, DashboardSources, load_dashboard};
use crate::domain::error::TickerlensError;
use crate::domain::event::{Control, EventValue, Target, UiEvent};
use crate::domain::indicator_helpers::{parse_indicator_set, with_standard_set};
use crate::domain::payload::Payload;
use crate::domain::sentiment::MacroSentiment;
use crate::domain::view_model::ViewModel;
use crate::domain::view_state::ComparisonIndex;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[cfg(feature = "web")]
const DEFAULT_LISTEN: &str = "127.0.0.1:8050";

#[derive(Parser, Debug)]
#[command(name = "tickerlens", about = "Equity and index analysis dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the configured instruments and start the web dashboard
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file without fetching data
    Check {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show stored data ranges for the configured instruments
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Render one dashboard output offline (SVG, HTML table or JSON)
    Render {
        #[arg(short, long)]
        config: PathBuf,
        /// Output id, e.g. primary-graph, index-graph, sentiment-table
        #[arg(short, long)]
        target: String,
        /// Year filter: `2015`, `2012-2016` or `2012,2016`
        #[arg(long)]
        years: Option<String>,
        /// Comparison index key (SP or CAC)
        #[arg(long)]
        index: Option<String>,
        /// Index chart mode: `rend` for log returns, `price` for normalized closes
        #[arg(long)]
        mode: Option<String>,
        /// Emit the raw payload as JSON
        #[arg(long)]
        json: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load a price CSV into the SQLite store
    Import {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        csv: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Serve { config } => run_serve(&config),
        Command::Check { config } => run_check(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::Render {
            config,
            target,
            years,
            index,
            mode,
            json,
            output,
        } => run_render(
            &config,
            &RenderRequest {
                target,
                years,
                index,
                mode,
                json,
            },
            output.as_deref(),
        ),
        Command::Import {
            config,
            symbol,
            csv,
        } => run_import(&config, &symbol, &csv),
    }
}

fn fail(err: TickerlensError) -> ExitCode {
    error!("{err}");
    ExitCode::from(&err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        fail(TickerlensError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    })
}

fn config_string(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn require_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, TickerlensError> {
    config_string(config, section, key).ok_or_else(|| TickerlensError::ConfigMissing {
        section: section.into(),
        key: key.into(),
    })
}

/// Instruments, dates and indicator set from `[data]`, `[instruments]` and
/// `[indicators]`. A missing end date means `today`.
pub fn build_dashboard_sources(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<DashboardSources, TickerlensError> {
    let start_date =
        parse_date(config, "data", "start_date")?.ok_or_else(|| TickerlensError::ConfigMissing {
            section: "data".into(),
            key: "start_date".into(),
        })?;
    let end_date = parse_date(config, "data", "end_date")?.unwrap_or(today);

    let primary_symbol = require_string(config, "instruments", "primary")?;
    let primary_name =
        config_string(config, "instruments", "primary_name").unwrap_or_else(|| primary_symbol.clone());

    let default_index = match config_string(config, "instruments", "default_index") {
        Some(key) => ComparisonIndex::from_key(&key).ok_or_else(|| TickerlensError::ConfigInvalid {
            section: "instruments".into(),
            key: "default_index".into(),
            reason: format!("unknown index '{key}'"),
        })?,
        None => ComparisonIndex::default(),
    };

    let extra = match config_string(config, "indicators", "set") {
        Some(set) => parse_indicator_set(&set).map_err(|e| TickerlensError::ConfigInvalid {
            section: "indicators".into(),
            key: "set".into(),
            reason: e.to_string(),
        })?,
        None => Vec::new(),
    };

    Ok(DashboardSources {
        primary_symbol,
        primary_name,
        sp_symbol: require_string(config, "instruments", "sp")?,
        cac_symbol: require_string(config, "instruments", "cac")?,
        default_index,
        start_date,
        end_date,
        indicators: with_standard_set(&extra),
    })
}

/// The `DataPort` selected by `[data] source`.
pub fn build_data_port(config: &dyn ConfigPort) -> Result<Box<dyn DataPort>, TickerlensError> {
    match data_source(config).as_str() {
        "csv" => {
            let dir = require_string(config, "data", "csv_dir")?;
            Ok(Box::new(CsvAdapter::new(PathBuf::from(dir))))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => Ok(Box::new(
            crate::adapters::sqlite_adapter::SqliteAdapter::from_config(config)?,
        )),
        #[cfg(feature = "postgres")]
        "postgres" => Ok(Box::new(
            crate::adapters::postgres_adapter::PostgresAdapter::from_config(config)?,
        )),
        other => Err(TickerlensError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: format!("source '{other}' is not available in this build"),
        }),
    }
}

/// The macro sentiment table, when `[sentiment] path` is set.
pub fn load_sentiment_table(
    config: &dyn ConfigPort,
) -> Result<Option<MacroSentiment>, TickerlensError> {
    let Some(path) = config_string(config, "sentiment", "path") else {
        return Ok(None);
    };
    let columns: Vec<String> = config_string(config, "sentiment", "columns")
        .map(|s| s.split(',').map(|c| c.trim().to_string()).collect())
        .unwrap_or_default();

    csv_adapter::load_sentiment(Path::new(&path), &columns).map(Some)
}

/// Validates the config, then fetches every instrument and computes indicators.
pub fn load_dashboard_from_config(
    config: &dyn ConfigPort,
) -> Result<DashboardData, TickerlensError> {
    validate_dashboard_config(config)?;
    let today = chrono::Local::now().date_naive();
    let sources = build_dashboard_sources(config, today)?;
    let data_port = build_data_port(config)?;
    let sentiment = load_sentiment_table(config)?;

    info!(
        primary = %sources.primary_symbol,
        start = %sources.start_date,
        end = %sources.end_date,
        indicators = sources.indicators.len(),
        "loading dashboard data"
    );
    load_dashboard(data_port.as_ref(), &sources, sentiment)
}

fn run_serve(config_path: &Path) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::net::SocketAddr;

        info!(config = %config_path.display(), "loading config");
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let data = match load_dashboard_from_config(&config) {
            Ok(d) => d,
            Err(e) => return fail(e),
        };

        let listen = config_string(&config, "web", "listen").unwrap_or_else(|| DEFAULT_LISTEN.into());
        let addr: SocketAddr = match listen.parse() {
            Ok(a) => a,
            Err(e) => {
                return fail(TickerlensError::ConfigInvalid {
                    section: "web".into(),
                    key: "listen".into(),
                    reason: format!("{e}"),
                });
            }
        };
        let idle_minutes = config.get_int("web", "session_idle_minutes", 60).max(1);

        let router = build_router(
            AppState {
                data: Arc::new(data),
            },
            time::Duration::minutes(idle_minutes),
        );

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(r) => r,
            Err(e) => return fail(TickerlensError::Io(e)),
        };
        let served = runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(%addr, "dashboard listening");
            axum::serve(listener, router).await
        });

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(TickerlensError::Io(e)),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        error!("web feature is required for serve");
        ExitCode::from(1)
    }
}

fn run_check(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = validate_dashboard_config(&config) {
        return fail(e);
    }
    let sources = match build_dashboard_sources(&config, chrono::Local::now().date_naive()) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    println!("source:     {}", data_source(&config));
    println!(
        "primary:    {} ({})",
        sources.primary_symbol, sources.primary_name
    );
    println!("indices:    SP={} CAC={}", sources.sp_symbol, sources.cac_symbol);
    println!("default:    {}", sources.default_index);
    println!("window:     {} to {}", sources.start_date, sources.end_date);
    let names: Vec<String> = sources.indicators.iter().map(|t| t.to_string()).collect();
    println!("indicators: {}", names.join(","));
    println!("configuration is valid");
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, symbol: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    let symbols: Vec<String> = match symbol {
        Some(s) => vec![s.to_string()],
        None => ["primary", "sp", "cac"]
            .iter()
            .filter_map(|key| config_string(&config, "instruments", key))
            .collect(),
    };

    for s in &symbols {
        match data_port.get_data_range(s) {
            Ok(Some((first, last, count))) => {
                println!("{s}: {count} bars, {first} to {last}");
            }
            Ok(None) => println!("{s}: no data found"),
            Err(e) => warn!(symbol = %s, "{e}"),
        }
    }

    match data_port.list_symbols() {
        Ok(all) if !all.is_empty() => println!("available: {}", all.join(", ")),
        Ok(_) => println!("available: none"),
        Err(e) => return fail(e),
    }
    ExitCode::SUCCESS
}

/// Options for one offline render.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    pub target: String,
    pub years: Option<String>,
    pub index: Option<String>,
    pub mode: Option<String>,
    pub json: bool,
}

fn parse_years(raw: &str) -> EventValue {
    match EventValue::from_form(raw) {
        EventValue::Text(t) => match t.parse::<i32>() {
            Ok(year) => EventValue::Range(year, year),
            Err(_) => EventValue::Text(t),
        },
        other => other,
    }
}

/// Drives a fresh view model through the requested events and renders one
/// output: SVG for charts, an HTML table for tables, JSON otherwise.
pub fn render_target(
    data: Arc<DashboardData>,
    request: &RenderRequest,
) -> Result<String, TickerlensError> {
    let target =
        Target::from_id(&request.target).ok_or_else(|| TickerlensError::InvalidEventValue {
            control: "target".into(),
            reason: format!("unknown output '{}'", request.target),
        })?;

    let mut vm = ViewModel::new(data);
    if let Some(years) = &request.years {
        vm.handle_event(&UiEvent::new(Control::YearRange, parse_years(years)))?;
    }
    if let Some(index) = &request.index {
        vm.handle_event(&UiEvent::new(Control::IndexSelect, EventValue::Text(index.clone())))?;
    }
    if let Some(mode) = &request.mode {
        vm.handle_event(&UiEvent::new(Control::DisplayMode, EventValue::Text(mode.clone())))?;
    }

    let output = vm.render(target);
    let to_json = |value: &Payload| {
        serde_json::to_string_pretty(value).map_err(|e| TickerlensError::Io(e.into()))
    };
    match (&output.payload, request.json) {
        (payload, true) => to_json(payload),
        (Payload::Chart(chart), false) => Ok(chart_svg::render_chart(chart)),
        (Payload::Table(table), false) => html_table::render_table(table),
        (payload, false) => to_json(payload),
    }
}

fn run_render(config_path: &Path, request: &RenderRequest, output: Option<&Path>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data = match load_dashboard_from_config(&config) {
        Ok(d) => Arc::new(d),
        Err(e) => return fail(e),
    };

    let rendered = match render_target(data, request) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    match output {
        Some(path) => {
            if let Err(e) = fs::write(path, &rendered) {
                return fail(TickerlensError::Io(e));
            }
            info!(path = %path.display(), bytes = rendered.len(), "wrote output");
        }
        None => println!("{rendered}"),
    }
    ExitCode::SUCCESS
}

fn run_import(config_path: &Path, symbol: &str, csv_path: &Path) -> ExitCode {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_adapter::SqliteAdapter;

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let content = match fs::read_to_string(csv_path) {
            Ok(c) => c,
            Err(e) => return fail(TickerlensError::Io(e)),
        };
        let bars = match csv_adapter::read_price_csv(&content, &csv_path.display().to_string()) {
            Ok(b) => b,
            Err(e) => return fail(e),
        };

        let imported = SqliteAdapter::from_config(&config).and_then(|adapter| {
            adapter.initialize_schema()?;
            adapter.insert_bars(symbol, &bars)
        });
        match imported {
            Ok(count) => {
                println!("{symbol}: imported {count} bars");
                ExitCode::SUCCESS
            }
            Err(e) => fail(e),
        }
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (config_path, symbol, csv_path);
        error!("sqlite feature is required for import");
        ExitCode::from(1)
    }
}
