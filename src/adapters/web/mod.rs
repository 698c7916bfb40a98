//! Web server adapter.
//!
//! Axum server with an HTMX front end. Each browser session keeps its own
//! `ViewState` in the session store; loaded market data is shared.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::domain::dashboard::DashboardData;

/// Session key holding the serialized `ViewState`.
pub const SESSION_KEY: &str = "view_state";

pub struct AppState {
    pub data: Arc<DashboardData>,
}

pub fn build_router(state: AppState, session_idle: time::Duration) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(session_idle));

    Router::new()
        .route("/", get(handlers::page))
        .route("/techn", get(handlers::page))
        .route("/model", get(handlers::page))
        .route("/calibration", get(handlers::page))
        .route("/events", post(handlers::post_event))
        .route("/api/events", post(handlers::post_event_json))
        .route("/api/state", get(handlers::get_state))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(handlers::fallback)
        .layer(sessions)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
