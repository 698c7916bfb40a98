//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod indicator_helpers;
pub mod derived;
pub mod sentiment;
pub mod view_state;
pub mod payload;
pub mod event;
pub mod projection;
pub mod dashboard;
pub mod view_model;
pub mod config_validation;
pub mod error;
