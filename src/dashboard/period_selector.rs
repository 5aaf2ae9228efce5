//! The controls for choosing which period the dashboard reports on.

use maud::{Markup, html};
use time::Date;

use crate::{
    endpoints,
    finance::{Period, next_month, previous_month},
    html::{BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, month_navigation},
};

/// The rolling windows offered as one click presets.
pub(super) const ROLLING_PRESETS: [u16; 2] = [7, 15];

const PRESET_STYLE: &str = "px-3 py-1.5 text-sm font-medium rounded-full border \
    border-gray-200 dark:border-gray-600 hover:bg-gray-100 dark:hover:bg-gray-700";

const PRESET_ACTIVE_STYLE: &str = "px-3 py-1.5 text-sm font-medium rounded-full border \
    border-blue-600 bg-blue-50 text-blue-700 dark:border-blue-500 dark:bg-blue-600/20 \
    dark:text-blue-200";

fn dashboard_url(period: &Period) -> String {
    format!("{}?{}", endpoints::DASHBOARD_VIEW, period.query_string())
}

/// Renders the month navigation, the rolling presets and the custom range form.
///
/// Month navigation starts from the selected month, or from the current month
/// when another kind of period is selected.
pub(super) fn period_selector(period: &Period, today: Date) -> Markup {
    let (year, month) = match *period {
        Period::Month { year, month } => (year, month),
        _ => (today.year(), today.month()),
    };
    let is_month = matches!(period, Period::Month { .. });

    let (prev_year, prev_month) = previous_month(year, month);
    let prev_href = dashboard_url(&Period::Month {
        year: prev_year,
        month: prev_month,
    });
    let next_href = next_month(year, month, today)
        .map(|(year, month)| dashboard_url(&Period::Month { year, month }));
    let month_label = Period::Month { year, month }.label();

    let current_month = Period::current_month(today);
    let (custom_start, custom_end) = match *period {
        Period::Custom { start, end } => (start, end),
        _ => {
            let range = period.range(today);
            (range.start, range.end)
        }
    };

    html! {
        section id="period-selector" class="w-full mx-auto mb-6 space-y-4"
        {
            @if is_month {
                (month_navigation(&month_label, &prev_href, next_href.as_deref()))
            }

            div class="flex flex-wrap justify-center gap-2"
            {
                a
                    href=(dashboard_url(&current_month))
                    class=(if *period == current_month { PRESET_ACTIVE_STYLE } else { PRESET_STYLE })
                    aria-current=[(*period == current_month).then_some("true")]
                { "This month" }

                @for days in ROLLING_PRESETS {
                    @let preset = Period::LastDays(days);
                    a
                        href=(dashboard_url(&preset))
                        class=(if *period == preset { PRESET_ACTIVE_STYLE } else { PRESET_STYLE })
                        aria-current=[(*period == preset).then_some("true")]
                    { (preset.label()) }
                }
            }

            form
                id="custom-period-form"
                method="get"
                action=(endpoints::DASHBOARD_VIEW)
                class="flex flex-wrap items-end justify-center gap-4"
            {
                input type="hidden" name="period" value="custom";

                div
                {
                    label for="start" class=(FORM_LABEL_STYLE) { "From" }
                    input
                        type="date"
                        id="start"
                        name="start"
                        max=(today)
                        value=(custom_start)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="end" class=(FORM_LABEL_STYLE) { "To" }
                    input
                        type="date"
                        id="end"
                        name="end"
                        max=(today)
                        value=(custom_end)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Apply" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::{Month, macros::date};

    use crate::finance::Period;

    use super::period_selector;

    fn render(period: Period) -> Html {
        Html::parse_fragment(&period_selector(&period, date!(2025 - 03 - 20)).into_string())
    }

    #[test]
    fn current_month_has_no_next_link() {
        let html = render(Period::Month {
            year: 2025,
            month: Month::March,
        });

        let prev = html
            .select(&Selector::parse("a[rel=prev]").unwrap())
            .next()
            .unwrap();
        assert_eq!(
            prev.value().attr("href"),
            Some("/dashboard?period=month&year=2025&month=2")
        );
        assert!(
            html.select(&Selector::parse("a[rel=next]").unwrap())
                .next()
                .is_none()
        );
    }

    #[test]
    fn past_month_links_to_following_month() {
        let html = render(Period::Month {
            year: 2024,
            month: Month::December,
        });

        let next = html
            .select(&Selector::parse("a[rel=next]").unwrap())
            .next()
            .unwrap();
        assert_eq!(
            next.value().attr("href"),
            Some("/dashboard?period=month&year=2025&month=1")
        );
    }

    #[test]
    fn presets_mark_the_selected_window() {
        let html = render(Period::LastDays(7));

        let active: Vec<_> = html
            .select(&Selector::parse("a[aria-current=true]").unwrap())
            .map(|link| link.value().attr("href").unwrap_or_default().to_owned())
            .collect();
        assert_eq!(active, vec!["/dashboard?period=7days".to_owned()]);
        assert!(
            html.select(&Selector::parse("#month-navigation").unwrap())
                .next()
                .is_none()
        );
    }

    #[test]
    fn custom_form_is_prefilled_with_selected_range() {
        let html = render(Period::Custom {
            start: date!(2025 - 03 - 01),
            end: date!(2025 - 03 - 15),
        });

        let start = html
            .select(&Selector::parse("#custom-period-form input[name=start]").unwrap())
            .next()
            .unwrap();
        let end = html
            .select(&Selector::parse("#custom-period-form input[name=end]").unwrap())
            .next()
            .unwrap();
        assert_eq!(start.value().attr("value"), Some("2025-03-01"));
        assert_eq!(end.value().attr("value"), Some("2025-03-15"));
        assert_eq!(end.value().attr("max"), Some("2025-03-20"));
    }
}
