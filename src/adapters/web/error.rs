//! HTTP error responses for web adapter.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::warn;

use crate::domain::error::TickerlensError;

use super::templates::ErrorTemplate;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &TickerlensError) -> StatusCode {
    match err {
        TickerlensError::UnknownControl(_) | TickerlensError::InvalidEventValue { .. } => {
            StatusCode::BAD_REQUEST
        }
        TickerlensError::UnavailableData { .. } | TickerlensError::MalformedData { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        TickerlensError::ConfigMissing { .. }
        | TickerlensError::ConfigInvalid { .. }
        | TickerlensError::ConfigParse { .. }
        | TickerlensError::Database { .. }
        | TickerlensError::DatabaseQuery { .. }
        | TickerlensError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<TickerlensError> for WebError {
    fn from(err: TickerlensError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl From<tower_sessions::session::Error> for WebError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::internal(format!("session error: {err}"))
    }
}

impl From<askama::Error> for WebError {
    fn from(err: askama::Error) -> Self {
        Self::internal(format!("template error: {err}"))
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = self.status.as_u16(), message = %self.message, "request failed");
        }
        let template = ErrorTemplate {
            message: &self.message,
            status: self.status.as_u16(),
        };
        match template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}
