//! Defines the route handler for the page that lists a month of operations.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{Date, Month};

use crate::{
    Error, endpoints,
    finance::{Period, PeriodStats, next_month, previous_month, search},
    history::query::HistoryQuery,
    html::{
        BUTTON_SECONDARY_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, Tone, base,
        format_currency, format_percent, month_navigation, stat_card,
    },
    navigation::NavBar,
    operation::{LedgerState, Operation, operation_list},
    profile::UserID,
    timezone::local_today,
};

struct HistoryViewModel<'a> {
    year: i32,
    month: Month,
    /// Why the requested month was replaced by the current month, if it was.
    notice: Option<String>,
    query: &'a HistoryQuery,
    stats: PeriodStats,
    operations: Vec<Operation>,
}

/// Render the operations of one month, optionally narrowed down by a search.
///
/// The summary figures always cover the whole month, the search only narrows
/// the list.
pub async fn get_history_page(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let ((year, month), notice) = match query.selected_month(today) {
        Ok(selected) => (selected, None),
        Err(error) => {
            tracing::warn!("invalid history query {query:?}: {error}");
            (
                (today.year(), today.month()),
                Some(format!("Showing the current month because {error}.")),
            )
        }
    };

    let mut ledger = state.ledger(user_id);
    ledger.fetch_all()?;

    let operations = search(&ledger.operations_in_month(year, month), query.search_text());

    let model = HistoryViewModel {
        year,
        month,
        notice,
        query: &query,
        stats: ledger.monthly_stats(year, month),
        operations,
    };

    Ok(history_view(&model, today).into_response())
}

fn history_view(model: &HistoryViewModel, today: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::HISTORY_VIEW).into_html();
    let month_label = Period::Month {
        year: model.year,
        month: model.month,
    }
    .label();

    let (prev_year, prev_month) = previous_month(model.year, model.month);
    let prev_href = model.query.url_for_month(prev_year, prev_month);
    let next_href = next_month(model.year, model.month, today)
        .map(|(year, month)| model.query.url_for_month(year, month));

    let search_text = model.query.search_text();
    let empty_message = if search_text.is_empty() {
        "No operations in this month.".to_owned()
    } else {
        format!("No operations match \"{search_text}\".")
    };

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "History" }

            @if let Some(notice) = &model.notice {
                p
                    id="period-notice"
                    role="status"
                    class="w-full mb-4 p-3 rounded-lg text-sm text-amber-800 bg-amber-50
                        border border-amber-300 dark:bg-gray-800 dark:text-amber-300
                        dark:border-amber-800"
                {
                    (notice)
                }
            }

            (month_navigation(&month_label, &prev_href, next_href.as_deref()))

            (summary_cards_view(&model.stats))

            form
                id="search-form"
                method="get"
                action=(endpoints::HISTORY_VIEW)
                role="search"
                class="w-full flex gap-2 mb-4"
            {
                input type="hidden" name="year" value=(model.year);
                input type="hidden" name="month" value=(u8::from(model.month));

                input
                    type="search"
                    name="q"
                    value=(search_text)
                    placeholder="Search description or account"
                    aria-label="Search operations"
                    class=(FORM_TEXT_INPUT_STYLE);

                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Search" }
            }

            section id="history-operations" class="w-full mb-8"
            {
                (operation_list(&model.operations, &empty_message))
            }
        }
    };

    base("History", &[], &content)
}

fn summary_cards_view(stats: &PeriodStats) -> Markup {
    let count_and_total = |count: usize, total: f64| format!("{count} × {}", format_currency(total));

    html! {
        section id="summary-cards" class="w-full mx-auto mb-6"
        {
            div class="grid grid-cols-2 md:grid-cols-4 gap-4"
            {
                (stat_card(
                    "operation-count",
                    "Operations",
                    &stats.operation_count.to_string(),
                    None,
                    Tone::Neutral,
                ))
                (stat_card(
                    "income-summary",
                    "Income",
                    &format_currency(stats.total_income),
                    Some(&count_and_total(stats.income_count, stats.total_income)),
                    Tone::Positive,
                ))
                (stat_card(
                    "expense-summary",
                    "Expenses",
                    &format_currency(stats.total_expense),
                    Some(&count_and_total(stats.expense_count, stats.total_expense)),
                    Tone::Negative,
                ))
                (stat_card(
                    "sale-summary",
                    "Sales",
                    &format_currency(stats.total_sales),
                    Some(&count_and_total(stats.sale_count, stats.total_sales)),
                    Tone::Negative,
                ))
                (stat_card(
                    "average-ticket",
                    "Average ticket",
                    &format_currency(stats.average_ticket),
                    None,
                    Tone::Neutral,
                ))
                (stat_card(
                    "period-balance",
                    "Balance",
                    &format_currency(stats.net_balance),
                    None,
                    Tone::from_value(stats.net_balance),
                ))
                (stat_card(
                    "savings-rate",
                    "Savings rate",
                    &format_percent(stats.savings_rate),
                    None,
                    Tone::from_value(stats.savings_rate),
                ))
            }
        }
    }
}
