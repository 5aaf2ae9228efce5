//! Stat cards summarising a period on the dashboard.

use maud::{Markup, html};

use crate::{
    finance::PeriodStats,
    html::{Tone, format_currency, format_percent, stat_card},
};

/// Renders the grid of stat cards for `stats`.
pub(super) fn stat_cards_view(stats: &PeriodStats) -> Markup {
    let largest_income = stats.largest_income.as_ref().map(|operation| {
        (
            format_currency(operation.amount),
            format!("{} on {}", operation.description, operation.date),
        )
    });

    html! {
        section id="stat-cards" class="w-full mx-auto mb-6"
        {
            div class="grid grid-cols-2 md:grid-cols-4 gap-4"
            {
                (stat_card(
                    "total-income",
                    "Income",
                    &format_currency(stats.total_income),
                    Some(&count_detail(stats.income_count)),
                    Tone::Positive,
                ))
                (stat_card(
                    "total-expense",
                    "Expenses",
                    &format_currency(stats.total_expense),
                    Some(&count_detail(stats.expense_count)),
                    Tone::Negative,
                ))
                (stat_card(
                    "total-sales",
                    "Sales",
                    &format_currency(stats.total_sales),
                    Some(&count_detail(stats.sale_count)),
                    Tone::Negative,
                ))
                (stat_card(
                    "net-balance",
                    "Net balance",
                    &format_currency(stats.net_balance),
                    None,
                    Tone::from_value(stats.net_balance),
                ))
                (stat_card(
                    "savings-rate",
                    "Savings rate",
                    &format_percent(stats.savings_rate),
                    Some("Share of income left over"),
                    Tone::from_value(stats.savings_rate),
                ))
                (stat_card(
                    "average-daily-expense",
                    "Average daily expense",
                    &format_currency(stats.average_daily_expense),
                    None,
                    Tone::Neutral,
                ))
                (stat_card(
                    "operation-count",
                    "Operations",
                    &stats.operation_count.to_string(),
                    None,
                    Tone::Neutral,
                ))
                @match largest_income {
                    Some((amount, detail)) => {
                        (stat_card("largest-income", "Largest income", &amount, Some(&detail), Tone::Positive))
                    }
                    None => {
                        (stat_card("largest-income", "Largest income", "None yet", None, Tone::Neutral))
                    }
                }
            }
        }
    }
}

fn count_detail(count: usize) -> String {
    match count {
        1 => "1 operation".to_owned(),
        count => format!("{count} operations"),
    }
}
