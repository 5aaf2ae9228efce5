//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crate::{
    alert::Alert, finance::PeriodError, internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// No profile has been selected, or the selected profile cookie could
    /// not be read.
    #[error("no active profile")]
    NoActiveProfile,

    /// An operation was rejected by the database because one of its fields
    /// broke a table constraint, e.g. a non-positive amount.
    #[error("the operation is invalid: {0}")]
    InvalidOperation(String),

    /// An empty string was used as a profile name.
    #[error("profile name cannot be empty")]
    EmptyProfileName,

    /// The requested reporting period could not be built.
    #[error("invalid period: {0}")]
    InvalidPeriod(#[from] PeriodError),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete an operation that does not exist
    #[error("tried to delete an operation that is not in the database")]
    DeleteMissingOperation,

    /// Tried to update an operation that does not exist
    #[error("tried to update an operation that is not in the database")]
    UpdateMissingOperation,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 275 occurs when a CHECK constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(desc))
                if sql_error.extended_code == 275 =>
            {
                Error::InvalidOperation(desc)
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::InvalidOperation(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid operation".to_owned(),
                    details,
                },
            ),
            Error::InvalidPeriod(error) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid period".to_owned(),
                    details: format!("Could not show the stats because {error}."),
                },
            ),
            Error::EmptyProfileName => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid profile name".to_owned(),
                    details: "Enter a name for the profile.".to_owned(),
                },
            ),
            Error::NoActiveProfile => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "No profile selected".to_owned(),
                    details: "Select a profile before recording operations.".to_owned(),
                },
            ),
            Error::UpdateMissingOperation => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update operation".to_owned(),
                    details: "The operation could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingOperation => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete operation".to_owned(),
                    details: "The operation could not be found. \
                    Try refreshing the page to see if the operation has already been deleted."
                        .to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "The requested resource could not be found.".to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use rusqlite::Connection;

    use crate::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let error = Error::from(rusqlite::Error::QueryReturnedNoRows);

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn check_constraint_maps_to_invalid_operation() {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute("CREATE TABLE t (amount REAL NOT NULL CHECK (amount > 0))", ())
            .unwrap();

        let error = connection
            .execute("INSERT INTO t (amount) VALUES (-1)", ())
            .map_err(Error::from)
            .unwrap_err();

        assert!(
            matches!(error, Error::InvalidOperation(_)),
            "want InvalidOperation, got {error:?}"
        );
    }

    #[test]
    fn missing_operation_alerts_use_not_found_status() {
        assert_eq!(
            Error::DeleteMissingOperation.into_alert_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::UpdateMissingOperation.into_alert_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
