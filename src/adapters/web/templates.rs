//! HTML templates using Askama.

use askama::Template;

pub struct NavLink {
    pub path: &'static str,
    pub title: &'static str,
    pub active: bool,
}

/// One `<option>` or radio button.
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// A rendered output slot; `body` is trusted SVG or table markup.
pub struct Panel {
    pub id: &'static str,
    pub body: String,
}

#[derive(Template)]
#[template(path = "base.html")]
pub struct BaseTemplate<'a> {
    pub title: &'a str,
    pub nav: Vec<NavLink>,
    pub content: &'a str,
}

#[derive(Template)]
#[template(path = "page_body.html")]
pub struct PageBodyTemplate<'a> {
    pub heading: &'a str,
    pub subject: &'a str,
    pub slider: Option<Panel>,
    pub index_choices: Vec<Choice>,
    pub mode_choices: Vec<Choice>,
    pub panels: Vec<Panel>,
}

#[derive(Template)]
#[template(path = "slider.html")]
pub struct SliderTemplate {
    pub start_choices: Vec<Choice>,
    pub end_choices: Vec<Choice>,
    pub marks: Vec<i32>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}
