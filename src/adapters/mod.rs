//! Concrete adapter implementations for ports, plus payload renderers.

pub mod chart_svg;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod html_table;
#[cfg(feature = "postgres")]
pub mod postgres_adapter;
#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;
#[cfg(feature = "web")]
pub mod web;
