//! HTTP request handlers for web adapter.
//!
//! Every request rebuilds the session's `ViewModel` from the stored
//! `ViewState`, applies at most one event, and stores the state back.

use askama::Template;
use axum::{
    Form, Json,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;
use tower_sessions::Session;

use crate::adapters::{chart_svg, html_table};
use crate::domain::event::{Control, EventValue, Output, Target, UiEvent, parse_year};
use crate::domain::payload::{Payload, SliderConfig};
use crate::domain::view_model::ViewModel;
use crate::domain::view_state::{ComparisonIndex, DisplayMode, Page, ViewState};

use super::templates::{
    BaseTemplate, Choice, NavLink, PageBodyTemplate, Panel, SliderTemplate,
};
use super::{AppState, SESSION_KEY, WebError, is_htmx_request};

async fn load_view_model(state: &AppState, session: &Session) -> Result<ViewModel, WebError> {
    let stored: Option<ViewState> = session.get(SESSION_KEY).await?;
    Ok(match stored {
        Some(view_state) => ViewModel::with_state(Arc::clone(&state.data), view_state),
        None => ViewModel::new(Arc::clone(&state.data)),
    })
}

async fn store_view_model(session: &Session, vm: &ViewModel) -> Result<(), WebError> {
    session.insert(SESSION_KEY, vm.state()).await?;
    Ok(())
}

/// Output slots laid out on each page, top to bottom.
pub fn page_targets(page: Page) -> &'static [Target] {
    match page {
        Page::Analyse => &[
            Target::PrimaryGraph,
            Target::IndexGraph,
            Target::SentimentGraph,
            Target::SentimentTable,
        ],
        Page::Techn => &[Target::PrimaryGraph, Target::RsiGraph],
        Page::Model | Page::Calibration => &[],
    }
}

fn nav_links(current: Page) -> Vec<NavLink> {
    Page::ALL
        .into_iter()
        .map(|page| NavLink {
            path: page.path(),
            title: page.title(),
            active: page == current,
        })
        .collect()
}

fn index_choices(current: ComparisonIndex) -> Vec<Choice> {
    ComparisonIndex::ALL
        .into_iter()
        .map(|index| Choice {
            value: index.key().to_string(),
            label: index.key().to_string(),
            selected: index == current,
        })
        .collect()
}

fn mode_choices(current: DisplayMode) -> Vec<Choice> {
    [(DisplayMode::Return, "Return"), (DisplayMode::Price, "Price")]
        .into_iter()
        .map(|(mode, label)| Choice {
            value: mode.value().to_string(),
            label: label.to_string(),
            selected: mode == current,
        })
        .collect()
}

fn slider_html(slider: &SliderConfig) -> Result<String, WebError> {
    let choices = |selected: i32| -> Vec<Choice> {
        (slider.min..=slider.max)
            .map(|year| Choice {
                value: year.to_string(),
                label: year.to_string(),
                selected: year == selected,
            })
            .collect()
    };
    let template = SliderTemplate {
        start_choices: choices(slider.value.min),
        end_choices: choices(slider.value.max),
        marks: slider.marks.clone(),
    };
    Ok(template.render()?)
}

fn render_panel(vm: &ViewModel, output: &Output) -> Result<Panel, WebError> {
    let body = match &output.payload {
        Payload::Chart(chart) => chart_svg::render_chart(chart),
        Payload::Table(table) => html_table::render_table(table)?,
        Payload::Slider(slider) => slider_html(slider)?,
        Payload::Page(_) => page_body(vm)?,
    };
    Ok(Panel {
        id: output.target_id.id(),
        body,
    })
}

/// The contents of `#page-content` for the session's current page.
pub fn page_body(vm: &ViewModel) -> Result<String, WebError> {
    let state = vm.state();
    let targets = page_targets(state.page);

    let panels = targets
        .iter()
        .map(|&target| render_panel(vm, &vm.render(target)))
        .collect::<Result<Vec<_>, _>>()?;
    let slider = if targets.is_empty() {
        None
    } else {
        Some(render_panel(vm, &vm.render(Target::YearRangeSlider))?)
    };

    let template = PageBodyTemplate {
        heading: state.page.title(),
        subject: &vm.data().primary_name,
        slider,
        index_choices: index_choices(state.comparison),
        mode_choices: mode_choices(state.display_mode),
        panels,
    };
    Ok(template.render()?)
}

/// Re-rendered outputs as HTMX out-of-band swaps, one per target id.
pub fn oob_fragment(vm: &ViewModel, outputs: &[Output]) -> Result<String, WebError> {
    let mut html = String::new();
    for output in outputs {
        let panel = render_panel(vm, output)?;
        let _ = writeln!(
            html,
            "<div id=\"{}\" hx-swap-oob=\"innerHTML\">{}</div>",
            panel.id, panel.body
        );
    }
    Ok(html)
}

fn page_response(vm: &ViewModel, headers: &HeaderMap) -> Result<Response, WebError> {
    let body = page_body(vm)?;
    if is_htmx_request(headers) {
        return Ok(Html(body).into_response());
    }

    let page = vm.state().page;
    let template = BaseTemplate {
        title: page.title(),
        nav: nav_links(page),
        content: &body,
    };
    Ok(Html(template.render()?).into_response())
}

pub async fn page(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, WebError> {
    let mut vm = load_view_model(&state, &session).await?;
    vm.handle_event(&UiEvent::new(
        Control::Url,
        EventValue::Text(uri.path().to_string()),
    ))?;
    store_view_model(&session, &vm).await?;

    page_response(&vm, &headers)
}

/// Unmatched GETs show the analysis page; the session's page is left as is.
pub async fn fallback(
    State(state): State<Arc<AppState>>,
    session: Session,
    method: Method,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    if method != Method::GET {
        return Err(WebError::new(StatusCode::NOT_FOUND, "not found"));
    }
    let mut vm = load_view_model(&state, &session).await?;
    vm.handle_event(&UiEvent::new(
        Control::Url,
        EventValue::Text(Page::Analyse.path().to_string()),
    ))?;

    page_response(&vm, &headers)
}

#[derive(Debug, Deserialize)]
pub struct EventForm {
    pub control_id: String,
    #[serde(default)]
    pub new_value: Option<String>,
    /// The year range control posts its bounds as two fields; unparseable
    /// bounds read as unset.
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl EventForm {
    pub fn into_event(self) -> UiEvent {
        let start = self.start.as_deref().and_then(parse_year);
        let end = self.end.as_deref().and_then(parse_year);
        let new_value = match (start, end) {
            (Some(a), Some(b)) => EventValue::Range(a, b),
            _ => self
                .new_value
                .as_deref()
                .map(EventValue::from_form)
                .unwrap_or_default(),
        };
        UiEvent {
            control_id: self.control_id,
            new_value,
        }
    }
}

pub async fn post_event(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<EventForm>,
) -> Result<Response, WebError> {
    let mut vm = load_view_model(&state, &session).await?;
    let outputs = vm.handle_event(&form.into_event())?;
    store_view_model(&session, &vm).await?;

    Ok(Html(oob_fragment(&vm, &outputs)?).into_response())
}

pub async fn post_event_json(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(event): Json<UiEvent>,
) -> Result<Json<Vec<Output>>, WebError> {
    let mut vm = load_view_model(&state, &session).await?;
    let outputs = vm.handle_event(&event)?;
    store_view_model(&session, &vm).await?;

    Ok(Json(outputs))
}

pub async fn get_state(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ViewState>, WebError> {
    let vm = load_view_model(&state, &session).await?;
    Ok(Json(*vm.state()))
}
