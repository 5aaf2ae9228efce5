//! Chart generation and rendering for the dashboard.
//!
//! The daily balance chart is generated as JSON configuration for the ECharts
//! library and rendered with an HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::Line,
};
use maud::{Markup, PreEscaped, html};

use crate::{finance::DailyBalance, html::HeadElement};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A line chart of the running balance at the end of each day in the period.
pub(super) fn daily_balance_chart(balances: &[DailyBalance], period_label: &str) -> Chart {
    let (labels, values): (Vec<String>, Vec<f64>) = balances
        .iter()
        .map(|balance| (balance.label.clone(), balance.balance))
        .unzip();

    Chart::new()
        .title(Title::new().text("Daily balance").subtext(period_label))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Balance").data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"$0.00\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Line))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::finance::DailyBalance;

    use super::{DashboardChart, charts_script, daily_balance_chart};

    #[test]
    fn chart_has_one_point_per_day() {
        let balances = vec![
            DailyBalance {
                date: date!(2025 - 03 - 01),
                label: "01".to_owned(),
                balance: 0.0,
            },
            DailyBalance {
                date: date!(2025 - 03 - 02),
                label: "02".to_owned(),
                balance: -12.5,
            },
        ];

        let options = daily_balance_chart(&balances, "March 2025").to_string();

        assert!(options.contains("\"01\""), "want day labels in {options}");
        assert!(options.contains("-12.5"), "want balances in {options}");
        assert!(options.contains("March 2025"));
    }

    #[test]
    fn script_initializes_each_chart() {
        let charts = [DashboardChart {
            id: "daily-balance-chart",
            options: "{}".to_owned(),
        }];

        let crate::html::HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("want an inline script");
        };

        assert!(script.0.contains("document.getElementById(\"daily-balance-chart\")"));
        assert!(script.0.starts_with("document.addEventListener('DOMContentLoaded'"));
    }
}
