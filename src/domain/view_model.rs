//! Per-session view model and its event dispatch table.
//!
//! Each binding maps a control to a state reducer and the outputs that
//! subscribe to it. `handle_event` applies the reducer, then runs exactly one
//! recomputation pass per subscribed output, in table order.

use crate::domain::dashboard::DashboardData;
use crate::domain::error::TickerlensError;
use crate::domain::event::{Control, EventValue, Output, Target, UiEvent};
use crate::domain::payload::Payload;
use crate::domain::projection;
use crate::domain::view_state::{ComparisonIndex, DisplayMode, Page, ViewState, YearRange};
use std::sync::Arc;
use tracing::debug;

type Reducer = fn(&ViewState, &EventValue, &DashboardData) -> ViewState;

struct Binding {
    control: Control,
    reduce: Reducer,
    outputs: &'static [Target],
}

static BINDINGS: [Binding; 5] = [
    Binding {
        control: Control::LoadData,
        reduce: reset_range,
        outputs: &[Target::YearRangeSlider],
    },
    Binding {
        control: Control::YearRange,
        reduce: set_year_range,
        outputs: &[
            Target::PrimaryGraph,
            Target::IndexGraph,
            Target::RsiGraph,
            Target::SentimentGraph,
            Target::SentimentTable,
        ],
    },
    Binding {
        control: Control::IndexSelect,
        reduce: set_comparison,
        outputs: &[Target::IndexGraph],
    },
    Binding {
        control: Control::DisplayMode,
        reduce: set_display_mode,
        outputs: &[Target::IndexGraph],
    },
    Binding {
        control: Control::Url,
        reduce: set_page,
        outputs: &[Target::PageContent],
    },
];

/// Outputs recomputed when `control` changes.
pub fn subscribers(control: Control) -> &'static [Target] {
    binding_for(control).outputs
}

fn binding_for(control: Control) -> &'static Binding {
    // every Control variant has exactly one row
    BINDINGS
        .iter()
        .find(|b| b.control == control)
        .unwrap_or(&BINDINGS[0])
}

fn reset_range(state: &ViewState, _value: &EventValue, _data: &DashboardData) -> ViewState {
    ViewState {
        year_range: None,
        ..*state
    }
}

fn set_year_range(state: &ViewState, value: &EventValue, data: &DashboardData) -> ViewState {
    let requested = value.as_year_pair().map(YearRange::from);
    ViewState {
        year_range: requested.map(|r| r.clamp_to(data.primary_span())),
        ..*state
    }
}

fn set_comparison(state: &ViewState, value: &EventValue, data: &DashboardData) -> ViewState {
    let comparison = value
        .as_text()
        .and_then(ComparisonIndex::from_key)
        .unwrap_or(data.default_index);
    ViewState {
        comparison,
        ..*state
    }
}

fn set_display_mode(state: &ViewState, value: &EventValue, _data: &DashboardData) -> ViewState {
    ViewState {
        display_mode: value
            .as_text()
            .map(DisplayMode::from_value)
            .unwrap_or_default(),
        ..*state
    }
}

fn set_page(state: &ViewState, value: &EventValue, _data: &DashboardData) -> ViewState {
    ViewState {
        page: value.as_text().map(Page::from_path).unwrap_or_default(),
        ..*state
    }
}

/// One dashboard session: owns its `ViewState`, shares the loaded data.
#[derive(Debug, Clone)]
pub struct ViewModel {
    data: Arc<DashboardData>,
    state: ViewState,
}

impl ViewModel {
    pub fn new(data: Arc<DashboardData>) -> Self {
        let state = ViewState::with_comparison(data.default_index);
        Self { data, state }
    }

    /// Resumes a session from a previously stored state, re-normalizing the
    /// year range against the current data.
    pub fn with_state(data: Arc<DashboardData>, state: ViewState) -> Self {
        let year_range = state.year_range.map(|r| r.clamp_to(data.primary_span()));
        Self {
            state: ViewState { year_range, ..state },
            data,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    pub fn effective_range(&self) -> YearRange {
        self.state.effective_range(self.data.primary_span())
    }

    pub fn handle_event(&mut self, event: &UiEvent) -> Result<Vec<Output>, TickerlensError> {
        let control = Control::from_id(&event.control_id)
            .ok_or_else(|| TickerlensError::UnknownControl(event.control_id.clone()))?;
        let binding = binding_for(control);

        self.state = (binding.reduce)(&self.state, &event.new_value, &self.data);
        debug!(control = control.id(), state = ?self.state, "view state updated");

        Ok(binding.outputs.iter().map(|&t| self.render(t)).collect())
    }

    /// Recomputes one output from the current state.
    pub fn render(&self, target: Target) -> Output {
        let range = self.effective_range();
        let data = &*self.data;
        let payload = match target {
            Target::PrimaryGraph => Payload::Chart(projection::primary_chart(data, range)),
            Target::IndexGraph => Payload::Chart(projection::index_chart(
                data,
                range,
                self.state.comparison,
                self.state.display_mode,
            )),
            Target::RsiGraph => Payload::Chart(projection::rsi_chart(data, range)),
            Target::SentimentGraph => Payload::Chart(projection::sentiment_chart(data, range)),
            Target::SentimentTable => Payload::Table(projection::sentiment_table(data, range)),
            Target::YearRangeSlider => Payload::Slider(projection::slider_config(data, range)),
            Target::PageContent => Payload::Page(projection::page_content(self.state.page)),
        };
        Output {
            target_id: target,
            payload,
        }
    }

    /// Every output, for a full page load.
    pub fn render_all(&self) -> Vec<Output> {
        [
            Target::YearRangeSlider,
            Target::PageContent,
            Target::PrimaryGraph,
            Target::IndexGraph,
            Target::RsiGraph,
            Target::SentimentGraph,
            Target::SentimentTable,
        ]
        .into_iter()
        .map(|t| self.render(t))
        .collect()
    }
}
