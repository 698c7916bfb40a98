//! Per-session UI input state.
//!
//! Every field has a total fallback: a missing, inverted or unknown input is
//! corrected rather than rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    /// Builds a range from two bounds in either order.
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    /// Clamps into `span`. A range that does not touch `span` at all falls
    /// back to the whole span.
    pub fn clamp_to(self, span: YearRange) -> YearRange {
        if self.max < span.min || self.min > span.max {
            return span;
        }
        YearRange {
            min: self.min.max(span.min),
            max: self.max.min(span.max),
        }
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.min..=self.max
    }
}

impl From<(i32, i32)> for YearRange {
    fn from((a, b): (i32, i32)) -> Self {
        YearRange::new(a, b)
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Market index the primary equity is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComparisonIndex {
    #[default]
    #[serde(rename = "SP")]
    Sp,
    #[serde(rename = "CAC")]
    Cac,
}

impl ComparisonIndex {
    pub const ALL: [ComparisonIndex; 2] = [ComparisonIndex::Sp, ComparisonIndex::Cac];

    pub fn key(&self) -> &'static str {
        match self {
            ComparisonIndex::Sp => "SP",
            ComparisonIndex::Cac => "CAC",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_uppercase().as_str() {
            "SP" => Some(ComparisonIndex::Sp),
            "CAC" => Some(ComparisonIndex::Cac),
            _ => None,
        }
    }
}

impl fmt::Display for ComparisonIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Daily log returns.
    Return,
    /// Min-max normalized closes.
    #[default]
    Price,
}

impl DisplayMode {
    /// `rend` (the radio value) or `return` select returns; anything else is price.
    pub fn from_value(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "rend" | "return" => DisplayMode::Return,
            _ => DisplayMode::Price,
        }
    }

    pub fn value(&self) -> &'static str {
        match self {
            DisplayMode::Return => "rend",
            DisplayMode::Price => "price",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Analyse,
    Techn,
    Model,
    Calibration,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Analyse, Page::Techn, Page::Model, Page::Calibration];

    /// Routes a URL path; unknown paths land on the analysis page.
    pub fn from_path(path: &str) -> Self {
        match path.trim().trim_end_matches('/').trim_start_matches('/') {
            "techn" => Page::Techn,
            "model" => Page::Model,
            "calibration" => Page::Calibration,
            _ => Page::Analyse,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Page::Analyse => "/",
            Page::Techn => "/techn",
            Page::Model => "/model",
            Page::Calibration => "/calibration",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Analyse => "Analysis",
            Page::Techn => "Technical Analysis",
            Page::Model => "Model",
            Page::Calibration => "Calibration",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    /// `None` until the user picks a range; reads as the full primary span.
    pub year_range: Option<YearRange>,
    pub comparison: ComparisonIndex,
    pub display_mode: DisplayMode,
    pub page: Page,
}

impl ViewState {
    pub fn with_comparison(comparison: ComparisonIndex) -> Self {
        Self {
            comparison,
            ..Self::default()
        }
    }

    /// The range actually used for filtering, given the primary span.
    pub fn effective_range(&self, span: YearRange) -> YearRange {
        self.year_range
            .map(|r| r.clamp_to(span))
            .unwrap_or(span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_range_orders_bounds() {
        assert_eq!(YearRange::new(2020, 2015), YearRange { min: 2015, max: 2020 });
        assert!(YearRange::new(2015, 2020).contains(2017));
        assert!(!YearRange::new(2015, 2020).contains(2021));
    }

    #[test]
    fn clamp_to_trims_overhang() {
        let span = YearRange::new(2010, 2024);
        assert_eq!(YearRange::new(2005, 2012).clamp_to(span), YearRange::new(2010, 2012));
        assert_eq!(YearRange::new(2020, 2030).clamp_to(span), YearRange::new(2020, 2024));
    }

    #[test]
    fn clamp_to_disjoint_range_is_full_span() {
        let span = YearRange::new(2010, 2024);
        assert_eq!(YearRange::new(1990, 1995).clamp_to(span), span);
        assert_eq!(YearRange::new(2030, 2031).clamp_to(span), span);
    }

    #[test]
    fn absent_range_is_full_span() {
        let span = YearRange::new(2010, 2024);
        assert_eq!(ViewState::default().effective_range(span), span);
    }

    #[test]
    fn comparison_keys() {
        assert_eq!(ComparisonIndex::from_key("cac"), Some(ComparisonIndex::Cac));
        assert_eq!(ComparisonIndex::from_key("DAX"), None);
        assert_eq!(ComparisonIndex::Sp.to_string(), "SP");
    }

    #[test]
    fn display_mode_from_value() {
        assert_eq!(DisplayMode::from_value("rend"), DisplayMode::Return);
        assert_eq!(DisplayMode::from_value("Return"), DisplayMode::Return);
        assert_eq!(DisplayMode::from_value("price"), DisplayMode::Price);
        assert_eq!(DisplayMode::from_value("anything"), DisplayMode::Price);
    }

    #[test]
    fn page_routing_falls_back_to_analyse() {
        assert_eq!(Page::from_path("/techn"), Page::Techn);
        assert_eq!(Page::from_path("/model/"), Page::Model);
        assert_eq!(Page::from_path("/"), Page::Analyse);
        assert_eq!(Page::from_path("/nowhere"), Page::Analyse);
    }

    #[test]
    fn view_state_round_trips_through_json() {
        let state = ViewState {
            year_range: Some(YearRange::new(2012, 2018)),
            comparison: ComparisonIndex::Cac,
            display_mode: DisplayMode::Return,
            page: Page::Techn,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"CAC\""));
        assert_eq!(serde_json::from_str::<ViewState>(&json).unwrap(), state);
    }
}
