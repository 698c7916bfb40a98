//! Payload builders: pure functions of the shared data and a filter window.

use crate::domain::dashboard::DashboardData;
use crate::domain::derived::SeriesWindow;
use crate::domain::indicator::IndicatorType;
use crate::domain::payload::{
    ChartPayload, PageContent, SliderConfig, TableColumn, TablePayload, TableRow, Trace,
};
use crate::domain::view_state::{ComparisonIndex, DisplayMode, Page, YearRange};

const PRIMARY_OVERLAYS: [(&str, IndicatorType); 4] = [
    ("MA10", IndicatorType::Sma(10)),
    ("MA30", IndicatorType::Sma(30)),
    ("MA50", IndicatorType::Sma(50)),
    ("EMA10", IndicatorType::Ema(10)),
];

const RSI_LINES: [(&str, IndicatorType); 4] = [
    ("RSI3", IndicatorType::Rsi(3)),
    ("RSI9", IndicatorType::Rsi(9)),
    ("RSI14", IndicatorType::Rsi(14)),
    ("RSI30", IndicatorType::Rsi(30)),
];

fn line(name: impl Into<String>, window: &SeriesWindow<'_>, y: Vec<Option<f64>>) -> Trace {
    Trace::Line {
        name: name.into(),
        x: window.dates(),
        y,
    }
}

/// Candlestick plus close and moving-average overlays for the primary equity.
pub fn primary_chart(data: &DashboardData, range: YearRange) -> ChartPayload {
    let window = data.primary.window(range);
    let bars = window.bars();

    let mut traces = vec![
        Trace::Candlestick {
            name: "Candlestick".into(),
            x: window.dates(),
            open: bars.iter().map(|b| b.open).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: bars.iter().map(|b| b.close).collect(),
        },
        line("Close", &window, window.closes()),
    ];
    traces.extend(
        PRIMARY_OVERLAYS
            .iter()
            .map(|(name, ty)| line(*name, &window, window.column(*ty))),
    );

    ChartPayload {
        title: format!("{} Stock Analysis", data.primary_name),
        traces,
    }
}

/// The comparison index and the primary equity on one axis, either as log
/// returns or as min-max normalized closes.
pub fn index_chart(
    data: &DashboardData,
    range: YearRange,
    comparison: ComparisonIndex,
    mode: DisplayMode,
) -> ChartPayload {
    let (field, suffix) = match mode {
        DisplayMode::Return => (IndicatorType::LogReturn, "LogReturn"),
        DisplayMode::Price => (IndicatorType::NormalizedClose, "Close Price"),
    };

    let index_window = data.index(comparison).window(range);
    let primary_window = data.primary.window(range);

    ChartPayload {
        title: format!("{} Index vs {}", comparison.key(), data.primary_name),
        traces: vec![
            line(
                format!("{} {}", comparison.key(), suffix),
                &index_window,
                index_window.column(field),
            ),
            line(
                format!("{} {}", data.primary_name, suffix),
                &primary_window,
                primary_window.column(field),
            ),
        ],
    }
}

pub fn rsi_chart(data: &DashboardData, range: YearRange) -> ChartPayload {
    let window = data.primary.window(range);
    ChartPayload {
        title: format!("{} RSI", data.primary_name),
        traces: RSI_LINES
            .iter()
            .map(|(name, ty)| line(*name, &window, window.column(*ty)))
            .collect(),
    }
}

/// One normalized line per macro column; empty when no table is loaded.
pub fn sentiment_chart(data: &DashboardData, range: YearRange) -> ChartPayload {
    let title = "Normalized Macro Sentiment Analysis by Time".to_string();
    let Some(table) = &data.sentiment else {
        return ChartPayload {
            title,
            traces: Vec::new(),
        };
    };

    let rows = table.year_rows(range);
    let x: Vec<_> = table.rows()[rows.clone()].iter().map(|r| r.date).collect();
    let traces = table
        .columns()
        .iter()
        .enumerate()
        .map(|(c, name)| Trace::Line {
            name: format!("{name}_N"),
            x: x.clone(),
            y: table.normalized_column(c)[rows.clone()].to_vec(),
        })
        .collect();

    ChartPayload { title, traces }
}

/// Raw macro values, one row per retained date.
pub fn sentiment_table(data: &DashboardData, range: YearRange) -> TablePayload {
    let mut columns = vec![TableColumn::new("DATE")];
    let Some(table) = &data.sentiment else {
        return TablePayload {
            columns,
            rows: Vec::new(),
        };
    };

    columns.extend(table.columns().iter().map(TableColumn::new));
    let rows = table.rows()[table.year_rows(range)]
        .iter()
        .map(|r| TableRow {
            date: r.date,
            values: r.values.clone(),
        })
        .collect();

    TablePayload { columns, rows }
}

/// Bounds come from the primary span; `value` is the range currently applied.
pub fn slider_config(data: &DashboardData, range: YearRange) -> SliderConfig {
    let span = data.primary_span();
    SliderConfig {
        min: span.min,
        max: span.max,
        value: range,
        marks: span.years().collect(),
    }
}

pub fn page_content(page: Page) -> PageContent {
    PageContent {
        page,
        title: page.title().to_string(),
    }
}
