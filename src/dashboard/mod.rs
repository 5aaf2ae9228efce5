//! Dashboard module
//!
//! Provides an overview page with stats, the daily balance chart and the
//! latest operations for a month, a rolling window or a custom period.

mod cards;
mod charts;
mod handlers;
mod period_selector;

pub use handlers::{get_dashboard_page, get_stats_endpoint};
