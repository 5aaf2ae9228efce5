//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for the dashboard page
//! - The JSON endpoint that reports the same figures
//! - HTML view functions for rendering the dashboard UI

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    dashboard::{
        cards::stat_cards_view,
        charts::{DashboardChart, charts_script, charts_view, daily_balance_chart},
        period_selector::period_selector,
    },
    endpoints,
    finance::{
        DATE_FORMAT, DailyBalance, MAX_CUSTOM_DAYS, Period, PeriodError, PeriodQuery, PeriodStats,
    },
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    operation::{LedgerState, Operation, operation_list},
    profile::UserID,
    timezone::local_today,
};

/// How many of the period's operations are listed under the chart.
const RECENT_OPERATIONS_LIMIT: usize = 10;

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    period: Period,
    /// Why the requested period was replaced by the current month, if it was.
    notice: Option<String>,
    stats: PeriodStats,
    charts: [DashboardChart; 1],
    recent_operations: Vec<Operation>,
}

/// Resolve the requested period, falling back to the current month when the
/// query does not describe a valid one.
fn resolve_period(query: &PeriodQuery, today: Date) -> (Period, Option<String>) {
    match query.resolve(today) {
        Ok(period) => (period, None),
        Err(error) => {
            tracing::warn!("invalid period query {query:?}: {error}");
            (
                Period::current_month(today),
                Some(period_notice(&error)),
            )
        }
    }
}

fn period_notice(error: &PeriodError) -> String {
    let reason = match error {
        PeriodError::EndBeforeStart { .. } => {
            "the end date was before the start date".to_owned()
        }
        PeriodError::FutureDate(date) => format!("{date} is in the future"),
        PeriodError::FutureMonth { .. } => "that month has not started yet".to_owned(),
        PeriodError::RangeTooLong { .. } => {
            format!("a custom period can cover at most {MAX_CUSTOM_DAYS} days")
        }
        PeriodError::MissingField(field) => format!("the {field} was missing"),
        PeriodError::InvalidField { field, value } => {
            format!("\"{value}\" is not a valid {field}")
        }
    };

    format!("Showing the current month because {reason}.")
}

/// Display a page with the stats, daily balance and recent operations for a period.
pub async fn get_dashboard_page(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<PeriodQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let (period, notice) = resolve_period(&query, today);

    let mut ledger = state.ledger(user_id);
    let has_operations = !ledger.fetch_all()?.is_empty();

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if !has_operations {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let range = period.range(today);
    let balances = ledger.daily_balances(range);
    let mut recent_operations = ledger.operations_in_period(range);
    recent_operations.truncate(RECENT_OPERATIONS_LIMIT);

    let data = DashboardData {
        period,
        notice,
        stats: ledger.period_stats(range),
        charts: [DashboardChart {
            id: "daily-balance-chart",
            options: daily_balance_chart(&balances, &period.label()).to_string(),
        }],
        recent_operations,
    };

    Ok(dashboard_view(nav_bar, &data, today).into_response())
}

/// The figures reported by the stats endpoint.
#[derive(Debug, Serialize)]
struct StatsResponse {
    period: String,
    start: String,
    end: String,
    stats: PeriodStats,
    daily_balances: Vec<DailyBalance>,
}

/// Report the stats and daily balances for a period as JSON.
///
/// Unlike the dashboard page, an invalid period is rejected with an alert
/// rather than replaced by the current month.
pub async fn get_stats_endpoint(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<PeriodQuery>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let period = match query.resolve(today) {
        Ok(period) => period,
        Err(error) => {
            tracing::warn!("invalid period query {query:?}: {error}");
            return Error::InvalidPeriod(error).into_alert_response();
        }
    };

    let mut ledger = state.ledger(user_id);

    if let Err(error) = ledger.fetch_all() {
        return error.into_alert_response();
    }

    let range = period.range(today);
    let response = StatsResponse {
        period: period.label(),
        start: range.start.format(DATE_FORMAT).unwrap_or_default(),
        end: range.end.format(DATE_FORMAT).unwrap_or_default(),
        stats: ledger.period_stats(range),
        daily_balances: ledger.daily_balances(range),
    };

    Json(response).into_response()
}

/// Renders the dashboard page when the profile has no operations.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_operation_link = link(endpoints::NEW_OPERATION_VIEW, "registering one");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Stats and charts will show up here once you record some operations.
                Start by " (new_operation_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_view(nav_bar: NavBar, data: &DashboardData, today: Date) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div id="dashboard-content" class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { (data.period.label()) }

            @if let Some(notice) = &data.notice {
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

            (period_selector(&data.period, today))

            (stat_cards_view(&data.stats))

            (charts_view(&data.charts))

            section id="recent-operations" class="w-full mx-auto mb-8"
            {
                h3 class="text-xl font-semibold mb-4" { "Recent operations" }

                (operation_list(&data.recent_operations, "No operations in this period."))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&data.charts),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{Query, State},
        http::StatusCode,
    };
    use scraper::{Html, Selector};
    use time::{Duration, OffsetDateTime};

    use crate::{
        finance::PeriodQuery,
        operation::{LedgerState, OperationKind},
        profile::UserID,
        test_utils::{
            add_profile, assert_content_type, assert_element_text_contains, assert_status_ok,
            assert_valid_html, get_ledger_state, insert_test_operation, parse_html_document,
        },
    };

    use super::{get_dashboard_page, get_stats_endpoint};

    fn insert(state: &LedgerState, owner: UserID, kind: OperationKind, amount: f64, days_ago: i64) {
        let date = OffsetDateTime::now_utc().date() - Duration::days(days_ago);
        insert_test_operation(state, owner, kind, amount, "Test operation", date);
    }

    fn seven_days() -> Query<PeriodQuery> {
        Query(PeriodQuery {
            period: Some("7days".to_owned()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let (state, user_id) = get_ledger_state();
        insert(&state, user_id, OperationKind::Income, 100.0, 0);
        insert(&state, user_id, OperationKind::Expense, 40.0, 1);

        let response = get_dashboard_page(State(state), Extension(user_id), seven_days())
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_chart_exists(&html, "daily-balance-chart");
        assert_element_text_contains(&html, "#net-balance", "$60.00");
        assert_element_text_contains(&html, "h2", "Last 7 days");
        assert_eq!(
            html.select(&Selector::parse("#recent-operations li").unwrap())
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn displays_prompt_text_on_no_data() {
        let (state, user_id) = get_ledger_state();

        let response =
            get_dashboard_page(State(state), Extension(user_id), Query(PeriodQuery::default()))
                .await
                .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_element_text_contains(&html, "h2", "Nothing here yet...");
        assert!(
            html.select(&Selector::parse("#daily-balance-chart").unwrap())
                .next()
                .is_none()
        );
    }

    #[tokio::test]
    async fn invalid_period_falls_back_to_current_month() {
        let (state, user_id) = get_ledger_state();
        insert(&state, user_id, OperationKind::Income, 100.0, 0);
        let query = Query(PeriodQuery {
            period: Some("custom".to_owned()),
            start: Some("2025-03-15".to_owned()),
            end: Some("2025-03-01".to_owned()),
            ..Default::default()
        });

        let response = get_dashboard_page(State(state), Extension(user_id), query)
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_element_text_contains(
            &html,
            "#period-notice",
            "the end date was before the start date",
        );
        let today = OffsetDateTime::now_utc().date();
        assert_element_text_contains(&html, "h2", &format!("{} {}", today.month(), today.year()));
    }

    #[tokio::test]
    async fn other_profiles_operations_are_not_counted() {
        let (state, user_id) = get_ledger_state();
        insert(&state, user_id, OperationKind::Income, 100.0, 0);
        let other = add_profile(&state, "Bruno");
        insert(&state, other, OperationKind::Income, 999.0, 0);

        let response = get_dashboard_page(State(state), Extension(user_id), seven_days())
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_element_text_contains(&html, "#total-income", "$100.00");
    }

    #[tokio::test]
    async fn stats_endpoint_returns_json() {
        let (state, user_id) = get_ledger_state();
        insert(&state, user_id, OperationKind::Income, 100.0, 0);
        insert(&state, user_id, OperationKind::Sale, 25.0, 2);

        let response = get_stats_endpoint(State(state), Extension(user_id), seven_days()).await;

        assert_status_ok(&response);
        assert_content_type(&response, "application/json");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["period"], "Last 7 days");
        assert_eq!(json["stats"]["total_income"], 100.0);
        assert_eq!(json["stats"]["total_sales"], 25.0);
        assert_eq!(json["stats"]["net_balance"], 75.0);
        assert_eq!(json["daily_balances"].as_array().unwrap().len(), 8);
        assert_eq!(
            json["end"],
            OffsetDateTime::now_utc().date().to_string().as_str()
        );
    }

    #[tokio::test]
    async fn overly_long_custom_period_falls_back_to_current_month() {
        let (state, user_id) = get_ledger_state();
        insert(&state, user_id, OperationKind::Income, 100.0, 0);
        let query = Query(PeriodQuery {
            period: Some("custom".to_owned()),
            start: Some("0001-01-01".to_owned()),
            end: Some(OffsetDateTime::now_utc().date().to_string()),
            ..Default::default()
        });

        let response = get_dashboard_page(State(state), Extension(user_id), query)
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_element_text_contains(
            &html,
            "#period-notice",
            "a custom period can cover at most 366 days",
        );
    }

    #[tokio::test]
    async fn stats_endpoint_rejects_overly_long_custom_period() {
        let (state, user_id) = get_ledger_state();
        let query = Query(PeriodQuery {
            period: Some("custom".to_owned()),
            start: Some("0001-01-01".to_owned()),
            end: Some(OffsetDateTime::now_utc().date().to_string()),
            ..Default::default()
        });

        let response = get_stats_endpoint(State(state), Extension(user_id), query).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stats_endpoint_rejects_future_month() {
        let (state, user_id) = get_ledger_state();
        let next_year = OffsetDateTime::now_utc().year() + 1;
        let query = Query(PeriodQuery {
            period: Some("month".to_owned()),
            year: Some(next_year.to_string()),
            month: Some("1".to_owned()),
            ..Default::default()
        });

        let response = get_stats_endpoint(State(state), Extension(user_id), query).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{}", chart_id)).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Chart with id '{}' not found",
            chart_id
        );
    }
}
