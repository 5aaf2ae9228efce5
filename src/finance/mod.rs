//! Reporting periods and the statistics computed over them.

mod aggregation;
mod period;

pub use aggregation::{
    DailyBalance, PeriodStats, compute_daily_balances, compute_stats, filter_by_month,
    filter_by_period, search,
};
pub use period::{
    DATE_FORMAT, DateRange, MAX_CUSTOM_DAYS, Period, PeriodError, PeriodQuery, next_month,
    previous_month,
};
