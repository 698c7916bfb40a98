//! SVG rendering of chart payloads.
//!
//! Candlesticks draw a wick from low to high and a body from open to close.
//! Line traces are split into separate `<path>` runs wherever a value is
//! missing, so gaps stay visible.

use askama::{Html, MarkupDisplay};

use crate::domain::payload::{ChartPayload, Trace};
use std::fmt::Write;

const CHART_WIDTH: f64 = 900.0;
const CHART_HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 36.0;
const MARGIN_BOTTOM: f64 = 40.0;
const LEGEND_ROW: f64 = 14.0;

const PALETTE: [&str; 8] = [
    "#2563eb", "#f97316", "#16a34a", "#dc2626", "#9333ea", "#0891b2", "#ca8a04", "#db2777",
];
const RISING: &str = "#16a34a";
const FALLING: &str = "#dc2626";

/// Escapes text for use in SVG content and attribute values.
fn escape(text: &str) -> String {
    MarkupDisplay::new_unsafe(text, Html).to_string()
}

fn trace_values(trace: &Trace) -> Box<dyn Iterator<Item = f64> + '_> {
    match trace {
        Trace::Candlestick { high, low, .. } => Box::new(high.iter().chain(low.iter()).copied()),
        Trace::Line { y, .. } => Box::new(y.iter().flatten().copied()),
    }
}

/// Shared x axis: the union of all trace dates, in order.
struct Scale {
    dates: Vec<chrono::NaiveDate>,
    min: f64,
    max: f64,
}

impl Scale {
    fn from_traces(traces: &[Trace]) -> Option<Self> {
        let mut dates: Vec<chrono::NaiveDate> = traces
            .iter()
            .flat_map(|t| match t {
                Trace::Candlestick { x, .. } | Trace::Line { x, .. } => x.iter().copied(),
            })
            .collect();
        dates.sort();
        dates.dedup();

        let (min, max) = traces
            .iter()
            .flat_map(trace_values)
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        if dates.is_empty() || !min.is_finite() {
            return None;
        }
        Some(Self { dates, min, max })
    }

    fn plot_width() -> f64 {
        CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x(&self, date: chrono::NaiveDate) -> f64 {
        let i = self.dates.partition_point(|d| *d < date);
        MARGIN_LEFT + (i as f64 / (self.dates.len() - 1).max(1) as f64) * Self::plot_width()
    }

    fn y(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        let frac = if range > 0.0 {
            (value - self.min) / range
        } else {
            0.5
        };
        MARGIN_TOP + Self::plot_height() - frac * Self::plot_height()
    }

    /// Pixel width of one date slot.
    fn step(&self) -> f64 {
        Self::plot_width() / self.dates.len().max(1) as f64
    }
}

/// Renders a chart payload as a standalone `<svg>` element.
pub fn render_chart(chart: &ChartPayload) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r##"<svg class="chart" width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">"##,
        w = CHART_WIDTH,
        h = CHART_HEIGHT
    );
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    let _ = writeln!(
        svg,
        "  <text x=\"{}\" y=\"20\" text-anchor=\"middle\" font-size=\"14\" fill=\"#111\">{}</text>",
        CHART_WIDTH / 2.0,
        escape(&chart.title)
    );

    let Some(scale) = Scale::from_traces(&chart.traces) else {
        let _ = writeln!(
            svg,
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"12\" fill=\"#666\">No data in the selected range.</text>",
            CHART_WIDTH / 2.0,
            CHART_HEIGHT / 2.0
        );
        svg.push_str("</svg>");
        return svg;
    };

    write_axes(&mut svg, &scale);

    for (i, trace) in chart.traces.iter().enumerate() {
        match trace {
            Trace::Candlestick {
                x,
                open,
                high,
                low,
                close,
                ..
            } => write_candles(&mut svg, &scale, x, open, high, low, close),
            Trace::Line { x, y, .. } => {
                write_line(&mut svg, &scale, x, y, PALETTE[i % PALETTE.len()])
            }
        }
    }

    for (i, trace) in chart.traces.iter().enumerate() {
        let colour = match trace {
            Trace::Candlestick { .. } => RISING,
            Trace::Line { .. } => PALETTE[i % PALETTE.len()],
        };
        let _ = writeln!(
            svg,
            "  <text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"{}\">{}</text>",
            CHART_WIDTH - MARGIN_RIGHT - 120.0,
            MARGIN_TOP + 10.0 + i as f64 * LEGEND_ROW,
            colour,
            escape(trace.name())
        );
    }

    svg.push_str("</svg>");
    svg
}

fn write_axes(svg: &mut String, scale: &Scale) {
    let bottom = CHART_HEIGHT - MARGIN_BOTTOM;
    let _ = writeln!(
        svg,
        "  <line x1=\"{l}\" y1=\"{t}\" x2=\"{l}\" y2=\"{b}\" stroke=\"#ccc\" stroke-width=\"1\"/>",
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = bottom
    );
    let _ = writeln!(
        svg,
        "  <line x1=\"{}\" y1=\"{b}\" x2=\"{}\" y2=\"{b}\" stroke=\"#ccc\" stroke-width=\"1\"/>",
        MARGIN_LEFT,
        CHART_WIDTH - MARGIN_RIGHT,
        b = bottom
    );

    for value in [scale.max, (scale.max + scale.min) / 2.0, scale.min] {
        let _ = writeln!(
            svg,
            "  <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{:.2}</text>",
            MARGIN_LEFT - 5.0,
            scale.y(value) + 3.0,
            value
        );
    }

    let first = scale.dates[0];
    let mid = scale.dates[scale.dates.len() / 2];
    let last = scale.dates[scale.dates.len() - 1];
    for date in [first, mid, last] {
        let _ = writeln!(
            svg,
            "  <text x=\"{:.1}\" y=\"{}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#666\">{}</text>",
            scale.x(date),
            CHART_HEIGHT - MARGIN_BOTTOM / 2.0,
            date
        );
    }
}

fn write_candles(
    svg: &mut String,
    scale: &Scale,
    x: &[chrono::NaiveDate],
    open: &[f64],
    high: &[f64],
    low: &[f64],
    close: &[f64],
) {
    let body = (scale.step() * 0.7).max(1.0);
    svg.push_str("  <g class=\"candles\">\n");
    for (i, date) in x.iter().enumerate() {
        let (o, h, l, c) = (open[i], high[i], low[i], close[i]);
        let colour = if c >= o { RISING } else { FALLING };
        let cx = scale.x(*date);
        let _ = writeln!(
            svg,
            "    <line x1=\"{cx:.1}\" y1=\"{:.1}\" x2=\"{cx:.1}\" y2=\"{:.1}\" stroke=\"{colour}\" stroke-width=\"1\"/>",
            scale.y(h),
            scale.y(l)
        );
        let top = scale.y(o.max(c));
        let height = (scale.y(o.min(c)) - top).max(0.5);
        let _ = writeln!(
            svg,
            "    <rect x=\"{:.1}\" y=\"{top:.1}\" width=\"{body:.1}\" height=\"{height:.1}\" fill=\"{colour}\"/>",
            cx - body / 2.0
        );
    }
    svg.push_str("  </g>\n");
}

fn write_line(
    svg: &mut String,
    scale: &Scale,
    x: &[chrono::NaiveDate],
    y: &[Option<f64>],
    colour: &str,
) {
    let mut path = String::new();
    let mut pen_down = false;
    for (date, value) in x.iter().zip(y) {
        match value.filter(|v| v.is_finite()) {
            Some(v) => {
                let cmd = if pen_down { 'L' } else { 'M' };
                if !path.is_empty() {
                    path.push(' ');
                }
                let _ = write!(path, "{} {:.1} {:.1}", cmd, scale.x(*date), scale.y(v));
                pen_down = true;
            }
            None => pen_down = false,
        }
    }
    if !path.is_empty() {
        let _ = writeln!(
            svg,
            "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>",
            path, colour
        );
    }
}
