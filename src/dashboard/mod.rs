//! Dashboard module
//!
//! Renders the records table, the statistics panel and the price and category
//! charts for a selected month.

mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
