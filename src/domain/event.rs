//! UI boundary: input events and output bindings.

use crate::domain::payload::Payload;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dashboard input controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    LoadData,
    YearRange,
    IndexSelect,
    DisplayMode,
    Url,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::LoadData,
        Control::YearRange,
        Control::IndexSelect,
        Control::DisplayMode,
        Control::Url,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Control::LoadData => "load-data-button",
            Control::YearRange => "year-range-slider",
            Control::IndexSelect => "index-select",
            Control::DisplayMode => "radio-analyse",
            Control::Url => "url",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Control::ALL.into_iter().find(|c| c.id() == id)
    }
}

/// Output slots payloads are delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    PrimaryGraph,
    IndexGraph,
    RsiGraph,
    SentimentGraph,
    SentimentTable,
    YearRangeSlider,
    PageContent,
}

impl Target {
    pub fn id(&self) -> &'static str {
        match self {
            Target::PrimaryGraph => "primary-graph",
            Target::IndexGraph => "index-graph",
            Target::RsiGraph => "rsi-graph",
            Target::SentimentGraph => "sentiment-graph",
            Target::SentimentTable => "sentiment-table",
            Target::YearRangeSlider => "year-range-slider",
            Target::PageContent => "page-content",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        [
            Target::PrimaryGraph,
            Target::IndexGraph,
            Target::RsiGraph,
            Target::SentimentGraph,
            Target::SentimentTable,
            Target::YearRangeSlider,
            Target::PageContent,
        ]
        .into_iter()
        .find(|t| t.id() == id)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventValue {
    #[default]
    Null,
    Range(i32, i32),
    Number(f64),
    Text(String),
    /// Any other JSON shape; reducers treat it as unset.
    Other(serde_json::Value),
}

impl EventValue {
    /// Reads a form-encoded value: empty is null, `A,B` or `A-B` with two
    /// integers is a range, anything else is text.
    pub fn from_form(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return EventValue::Null;
        }
        let range = raw
            .split_once(',')
            .or_else(|| raw.split_once('-'))
            .and_then(|(a, b)| Some((a.trim().parse::<i32>().ok()?, b.trim().parse::<i32>().ok()?)));
        match range {
            Some((a, b)) => EventValue::Range(a, b),
            None => EventValue::Text(raw.to_string()),
        }
    }

    /// Reads a year range from a pair of numbers, a `[a, b]` JSON array with
    /// numeric or string bounds, or form text. Fractional bounds are rounded.
    pub fn as_year_pair(&self) -> Option<(i32, i32)> {
        match self {
            EventValue::Range(a, b) => Some((*a, *b)),
            EventValue::Text(raw) => match EventValue::from_form(raw) {
                EventValue::Range(a, b) => Some((a, b)),
                _ => None,
            },
            EventValue::Other(serde_json::Value::Array(items)) => match items.as_slice() {
                [a, b] => Some((json_year(a)?, json_year(b)?)),
                _ => None,
            },
            EventValue::Null | EventValue::Number(_) | EventValue::Other(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            EventValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

fn json_year(value: &serde_json::Value) -> Option<i32> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().and_then(parse_year_f64),
        serde_json::Value::String(s) => parse_year(s),
        _ => None,
    }
}

fn parse_year_f64(v: f64) -> Option<i32> {
    (v.is_finite() && v.abs() < i32::MAX as f64).then(|| v.round() as i32)
}

/// Lenient year parse for form fields: `2015`, ` 2015 ` or `2015.0`.
pub fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    raw.parse::<i32>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().and_then(parse_year_f64))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiEvent {
    pub control_id: String,
    #[serde(default)]
    pub new_value: EventValue,
}

impl UiEvent {
    pub fn new(control: Control, new_value: EventValue) -> Self {
        Self {
            control_id: control.id().to_string(),
            new_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    pub target_id: Target,
    pub payload: Payload,
}
