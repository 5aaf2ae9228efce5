//! Reporting periods: calendar months, rolling windows ending today, and
//! custom date ranges.

use serde::{Deserialize, Serialize};
use time::{
    Date, Duration, Month, format_description::BorrowedFormatItem, macros::format_description,
};

/// The format used for dates in query strings and HTML date inputs, e.g. "2025-03-15".
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The longest rolling window that can be requested.
const MAX_ROLLING_DAYS: u16 = 366;

/// The most days a custom period may cover, counting both ends.
pub const MAX_CUSTOM_DAYS: i64 = 366;

/// The reasons a period cannot be built from user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    /// A custom range where the end comes before the start.
    #[error("the end date {end} is before the start date {start}")]
    EndBeforeStart {
        /// The requested first day.
        start: Date,
        /// The requested last day.
        end: Date,
    },

    /// A date after today.
    #[error("{0} is in the future")]
    FutureDate(Date),

    /// A custom range covering more than [MAX_CUSTOM_DAYS] days.
    #[error("the period from {start} to {end} is longer than {max} days", max = MAX_CUSTOM_DAYS)]
    RangeTooLong {
        /// The requested first day.
        start: Date,
        /// The requested last day.
        end: Date,
    },

    /// A month after the current month.
    #[error("{month} {year} has not started yet")]
    FutureMonth {
        /// The requested year.
        year: i32,
        /// The requested month.
        month: Month,
    },

    /// A query parameter that is required for the chosen period was missing.
    #[error("the {0} field is required")]
    MissingField(&'static str),

    /// A query parameter could not be parsed.
    #[error("\"{value}\" is not a valid {field}")]
    InvalidField {
        /// The name of the query parameter.
        field: &'static str,
        /// The value that was given.
        value: String,
    },
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

impl DateRange {
    /// Create a range from `start` to `end`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns [PeriodError::EndBeforeStart] if `end` is before `start`.
    pub fn new(start: Date, end: Date) -> Result<Self, PeriodError> {
        if end < start {
            return Err(PeriodError::EndBeforeStart { start, end });
        }

        Ok(Self { start, end })
    }

    /// The range covering every day of `month` in `year`.
    pub fn month(year: i32, month: Month) -> Self {
        let start = first_day_of_month(year, month);
        let end = start
            .replace_day(last_day_of_month(year, month))
            .unwrap_or(start);

        Self { start, end }
    }

    /// The number of days in the range, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).whole_days() + 1
    }

    /// Whether `date` falls within the range.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether the range starts and ends in the same calendar month.
    pub fn is_within_one_month(&self) -> bool {
        self.start.year() == self.end.year() && self.start.month() == self.end.month()
    }

    /// Every day in the range, in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = Date> {
        let end = self.end;

        std::iter::successors(Some(self.start), move |date| {
            date.next_day().filter(|next| *next <= end)
        })
    }
}

/// The span of time that statistics are reported over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// A calendar month.
    Month {
        /// The calendar year.
        year: i32,
        /// The month of the year.
        month: Month,
    },
    /// The last `n` days, from `today - n` up to and including today.
    LastDays(u16),
    /// A user chosen range of dates.
    Custom {
        /// The first day of the period.
        start: Date,
        /// The last day of the period.
        end: Date,
    },
}

impl Period {
    /// The month containing `today`.
    pub fn current_month(today: Date) -> Self {
        Period::Month {
            year: today.year(),
            month: today.month(),
        }
    }

    /// A calendar month that has already started.
    ///
    /// # Errors
    ///
    /// Returns [PeriodError::InvalidField] if `year` is outside the supported
    /// calendar, or [PeriodError::FutureMonth] if the month starts after `today`.
    pub fn month(year: i32, month: Month, today: Date) -> Result<Self, PeriodError> {
        if Date::from_calendar_date(year, month, 1).is_err() {
            return Err(PeriodError::InvalidField {
                field: "year",
                value: year.to_string(),
            });
        }

        if is_after_current_month(year, month, today) {
            return Err(PeriodError::FutureMonth { year, month });
        }

        Ok(Period::Month { year, month })
    }

    /// A custom range of days that ends no later than `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if `end` is before `start`, either date is after `today`,
    /// or the range covers more than [MAX_CUSTOM_DAYS] days.
    pub fn custom(start: Date, end: Date, today: Date) -> Result<Self, PeriodError> {
        if start > today {
            return Err(PeriodError::FutureDate(start));
        }

        if end > today {
            return Err(PeriodError::FutureDate(end));
        }

        let range = DateRange::new(start, end)?;

        if range.days() > MAX_CUSTOM_DAYS {
            return Err(PeriodError::RangeTooLong { start, end });
        }

        Ok(Period::Custom {
            start: range.start,
            end: range.end,
        })
    }

    /// The dates covered by the period, relative to `today` for rolling windows.
    pub fn range(&self, today: Date) -> DateRange {
        match *self {
            Period::Month { year, month } => DateRange::month(year, month),
            Period::LastDays(days) => DateRange {
                start: today.saturating_sub(Duration::days(days.into())),
                end: today,
            },
            Period::Custom { start, end } => DateRange { start, end },
        }
    }

    /// A short label for headings, e.g. "March 2025", "Last 7 days" or "01/03 - 15/03".
    pub fn label(&self) -> String {
        match *self {
            Period::Month { year, month } => format!("{month} {year}"),
            Period::LastDays(days) => format!("Last {days} days"),
            Period::Custom { start, end } => {
                format!("{} - {}", day_month_label(start), day_month_label(end))
            }
        }
    }

    /// The query parameters that select this period, see [PeriodQuery].
    pub fn to_query(&self) -> PeriodQuery {
        match *self {
            Period::Month { year, month } => PeriodQuery {
                period: Some("month".to_owned()),
                year: Some(year.to_string()),
                month: Some(u8::from(month).to_string()),
                ..Default::default()
            },
            Period::LastDays(days) => PeriodQuery {
                period: Some(format!("{days}days")),
                ..Default::default()
            },
            Period::Custom { start, end } => PeriodQuery {
                period: Some("custom".to_owned()),
                start: Some(start.to_string()),
                end: Some(end.to_string()),
                ..Default::default()
            },
        }
    }

    /// The URL encoded query string that selects this period.
    pub fn query_string(&self) -> String {
        serde_urlencoded::to_string(self.to_query())
            .inspect_err(|error| {
                tracing::error!("Could not encode period {self:?} as a query string: {error}")
            })
            .unwrap_or_default()
    }
}

/// The calendar month before `month` in `year`.
pub fn previous_month(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::January => (year - 1, Month::December),
        month => (year, month.previous()),
    }
}

/// The calendar month after `month` in `year`, or `None` if it starts after `today`.
pub fn next_month(year: i32, month: Month, today: Date) -> Option<(i32, Month)> {
    let (next_year, next_month) = match month {
        Month::December => (year + 1, Month::January),
        month => (year, month.next()),
    };

    if is_after_current_month(next_year, next_month, today) {
        None
    } else {
        Some((next_year, next_month))
    }
}

fn is_after_current_month(year: i32, month: Month, today: Date) -> bool {
    (year, u8::from(month)) > (today.year(), u8::from(today.month()))
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn first_day_of_month(year: i32, month: Month) -> Date {
    Date::from_calendar_date(year, month, 1).unwrap_or(Date::MIN)
}

fn day_month_label(date: Date) -> String {
    format!("{:02}/{:02}", date.day(), u8::from(date.month()))
}

/// The query string parameters that select a [Period].
///
/// The fields are kept as text so that blank form inputs do not cause the
/// request to be rejected before the page can explain what went wrong.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodQuery {
    /// One of "month", "7days", "15days" (or any "<n>days") and "custom".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    /// The calendar year for a month period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// The month number, 1 to 12, for a month period.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    /// The first day of a custom period, e.g. "2025-03-01".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// The last day of a custom period, e.g. "2025-03-15".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl PeriodQuery {
    /// Build the selected period.
    ///
    /// An empty query selects the current month, as does "month" without a
    /// year and month.
    ///
    /// # Errors
    ///
    /// Returns an error if a field is missing or malformed, or the period
    /// would include days after `today`.
    pub fn resolve(&self, today: Date) -> Result<Period, PeriodError> {
        match non_blank(&self.period) {
            None | Some("month") => self.resolve_month(today),
            Some("custom") => {
                let start = parse_date_field("start", &self.start)?;
                let end = parse_date_field("end", &self.end)?;

                Period::custom(start, end, today)
            }
            Some(preset) => parse_rolling_days(preset).map(Period::LastDays),
        }
    }

    fn resolve_month(&self, today: Date) -> Result<Period, PeriodError> {
        match (non_blank(&self.year), non_blank(&self.month)) {
            (None, None) => Ok(Period::current_month(today)),
            (Some(year), Some(month)) => {
                let year: i32 = year.parse().map_err(|_| PeriodError::InvalidField {
                    field: "year",
                    value: year.to_owned(),
                })?;
                let month = month
                    .parse::<u8>()
                    .ok()
                    .and_then(|number| Month::try_from(number).ok())
                    .ok_or_else(|| PeriodError::InvalidField {
                        field: "month",
                        value: month.to_owned(),
                    })?;

                Period::month(year, month, today)
            }
            (None, Some(_)) => Err(PeriodError::MissingField("year")),
            (Some(_), None) => Err(PeriodError::MissingField("month")),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_date_field(field: &'static str, value: &Option<String>) -> Result<Date, PeriodError> {
    let text = non_blank(value).ok_or(PeriodError::MissingField(field))?;

    Date::parse(text, DATE_FORMAT).map_err(|_| PeriodError::InvalidField {
        field,
        value: text.to_owned(),
    })
}

fn parse_rolling_days(preset: &str) -> Result<u16, PeriodError> {
    preset
        .strip_suffix("days")
        .and_then(|days| days.parse::<u16>().ok())
        .filter(|days| (1..=MAX_ROLLING_DAYS).contains(days))
        .ok_or_else(|| PeriodError::InvalidField {
            field: "period",
            value: preset.to_owned(),
        })
}
