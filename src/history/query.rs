//! The query string for the history page: a month and an optional search.

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    endpoints,
    finance::{Period, PeriodError, PeriodQuery},
};

/// The month and search text selected on the history page.
///
/// As with [PeriodQuery], the fields are kept as text so a malformed value
/// can be explained on the page instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// The calendar year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// The month number, 1 to 12.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    /// Text to look for in descriptions and account names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl HistoryQuery {
    /// The selected month, or the current month if none was given.
    ///
    /// # Errors
    ///
    /// Returns an error if only one of year and month is given, either is
    /// malformed, or the month is after the current month.
    pub fn selected_month(&self, today: Date) -> Result<(i32, Month), PeriodError> {
        let query = PeriodQuery {
            period: Some("month".to_owned()),
            year: self.year.clone(),
            month: self.month.clone(),
            ..Default::default()
        };

        match query.resolve(today)? {
            Period::Month { year, month } => Ok((year, month)),
            _ => Ok((today.year(), today.month())),
        }
    }

    /// The trimmed search text, empty if there is none.
    pub fn search_text(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or_default()
    }

    /// The URL of the history page for `month` of `year` that keeps the search text.
    pub fn url_for_month(&self, year: i32, month: Month) -> String {
        let search_text = self.search_text();
        let query = HistoryQuery {
            year: Some(year.to_string()),
            month: Some(u8::from(month).to_string()),
            q: (!search_text.is_empty()).then(|| search_text.to_owned()),
        };

        let query_string = serde_urlencoded::to_string(&query)
            .inspect_err(|error| {
                tracing::error!("Could not encode history query {query:?}: {error}")
            })
            .unwrap_or_default();

        format!("{}?{query_string}", endpoints::HISTORY_VIEW)
    }
}
