//! Statistics derived from a set of operations.
//!
//! Nothing here is stored: every figure is recomputed from the operations
//! that fall within a [DateRange].

use serde::Serialize;
use time::{Date, Month};

use crate::{
    finance::period::DateRange,
    operation::{Operation, OperationKind},
};

/// Totals and headline figures for the operations in a date range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodStats {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all ordinary expenses, not counting sales.
    pub total_expense: f64,
    /// The sum of all sales.
    pub total_sales: f64,
    /// Income minus expenses minus sales.
    pub net_balance: f64,
    /// The biggest single income, the first one wins a tie.
    pub largest_income: Option<Operation>,
    /// The biggest single expense, the first one wins a tie.
    pub largest_expense: Option<Operation>,
    /// The biggest single sale, the first one wins a tie.
    pub largest_sale: Option<Operation>,
    /// Ordinary expenses divided by the number of days in the range.
    pub average_daily_expense: f64,
    /// The net balance as a percentage of income, zero when there is no income.
    pub savings_rate: f64,
    /// The number of operations in the range.
    pub operation_count: usize,
    /// The number of income operations.
    pub income_count: usize,
    /// The number of expense operations.
    pub expense_count: usize,
    /// The number of sale operations.
    pub sale_count: usize,
    /// The mean amount of an operation of any kind, zero when there are none.
    pub average_ticket: f64,
}

/// The running balance at the end of a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBalance {
    /// The calendar day.
    #[serde(serialize_with = "serialize_date")]
    pub date: Date,
    /// The chart label for the day: "05" within a single month, otherwise "05/03".
    pub label: String,
    /// Income minus expenses and sales from the start of the range to the end of this day.
    pub balance: f64,
}

fn serialize_date<S: serde::Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(date)
}

/// The operations dated within `range`, newest first (date, then time of day).
///
/// Filtering an already filtered list gives the same list.
pub fn filter_by_period(operations: &[Operation], range: DateRange) -> Vec<Operation> {
    let mut filtered: Vec<Operation> = operations
        .iter()
        .filter(|operation| range.contains(operation.date))
        .cloned()
        .collect();

    filtered.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));

    filtered
}

/// The operations dated within `month` of `year`, newest first.
pub fn filter_by_month(operations: &[Operation], year: i32, month: Month) -> Vec<Operation> {
    filter_by_period(operations, DateRange::month(year, month))
}

/// Compute the totals and headline figures for the operations within `range`.
///
/// Operations dated outside of `range` are ignored.
pub fn compute_stats(operations: &[Operation], range: DateRange) -> PeriodStats {
    let mut stats = PeriodStats::default();

    for operation in operations
        .iter()
        .filter(|operation| range.contains(operation.date))
    {
        let (total, count, largest) = match operation.kind {
            OperationKind::Income => (
                &mut stats.total_income,
                &mut stats.income_count,
                &mut stats.largest_income,
            ),
            OperationKind::Expense => (
                &mut stats.total_expense,
                &mut stats.expense_count,
                &mut stats.largest_expense,
            ),
            OperationKind::Sale => (
                &mut stats.total_sales,
                &mut stats.sale_count,
                &mut stats.largest_sale,
            ),
        };

        *total += operation.amount;
        *count += 1;

        let is_larger = largest
            .as_ref()
            .is_none_or(|current| operation.amount > current.amount);
        if is_larger {
            *largest = Some(operation.clone());
        }
    }

    stats.operation_count = stats.income_count + stats.expense_count + stats.sale_count;
    stats.net_balance = stats.total_income - stats.total_expense - stats.total_sales;
    stats.average_daily_expense = stats.total_expense / range.days() as f64;
    stats.savings_rate = if stats.total_income == 0.0 {
        0.0
    } else {
        stats.net_balance / stats.total_income * 100.0
    };
    stats.average_ticket = if stats.operation_count == 0 {
        0.0
    } else {
        (stats.total_income + stats.total_expense + stats.total_sales)
            / stats.operation_count as f64
    };

    stats
}

/// The running balance at the end of every day in `range`, oldest first.
///
/// The balance starts at zero on the first day and is carried over days
/// without operations. Operations dated outside of `range` are ignored.
pub fn compute_daily_balances(operations: &[Operation], range: DateRange) -> Vec<DailyBalance> {
    let mut daily_totals = vec![0.0; range.days().max(0) as usize];

    for operation in operations
        .iter()
        .filter(|operation| range.contains(operation.date))
    {
        let day_index = (operation.date - range.start).whole_days() as usize;
        daily_totals[day_index] += operation.signed_amount();
    }

    let single_month = range.is_within_one_month();
    let mut balance = 0.0;

    range
        .dates()
        .zip(daily_totals)
        .map(|(date, total)| {
            balance += total;

            DailyBalance {
                date,
                label: day_label(date, single_month),
                balance,
            }
        })
        .collect()
}

fn day_label(date: Date, single_month: bool) -> String {
    if single_month {
        format!("{:02}", date.day())
    } else {
        format!("{:02}/{:02}", date.day(), u8::from(date.month()))
    }
}

/// The operations whose description or account contains `query`, ignoring case.
///
/// A blank query matches every operation. The order of `operations` is kept.
pub fn search(operations: &[Operation], query: &str) -> Vec<Operation> {
    let query = query.trim().to_lowercase();

    if query.is_empty() {
        return operations.to_vec();
    }

    operations
        .iter()
        .filter(|operation| {
            operation.description.to_lowercase().contains(&query)
                || operation.account.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}
