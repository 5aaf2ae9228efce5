//! Defines the endpoint for registering a new operation.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    endpoints,
    operation::{
        form::{FormTarget, OperationForm, operation_form},
        ledger::LedgerState,
    },
    profile::UserID,
    timezone::local_today,
};

/// A route handler for registering a new operation, redirects to the dashboard on success.
///
/// Invalid input is answered with the form and a message next to each
/// field that needs fixing, and nothing is stored.
pub async fn create_operation_endpoint(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<OperationForm>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let data = match form.validate(today) {
        Ok(data) => data,
        Err(errors) => {
            tracing::warn!("rejected new operation for profile {user_id}: {errors:?}");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                operation_form(FormTarget::Create, &form, &errors, today),
            )
                .into_response();
        }
    };

    let mut ledger = state.ledger(user_id);

    if let Err(error) = ledger.add(&data) {
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use time::{Duration, OffsetDateTime};

    use crate::{
        endpoints,
        operation::{
            OperationKind, backend::select_operations, create_endpoint::create_operation_endpoint,
            form::OperationForm,
        },
        test_utils::{
            assert_form_error_message, assert_hx_redirect, get_ledger_state, must_get_form,
            parse_html_fragment,
        },
    };

    fn form() -> OperationForm {
        OperationForm {
            kind: "income".to_owned(),
            amount: "5500".to_owned(),
            description: "Salary".to_owned(),
            account: "Nubank".to_owned(),
            date: OffsetDateTime::now_utc().date().to_string(),
            time: "09:00".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_create_operation() {
        let (state, user_id) = get_ledger_state();

        let response =
            create_operation_endpoint(State(state.clone()), Extension(user_id), Form(form()))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        let connection = state.db_connection.lock().unwrap();
        let operations = select_operations(user_id, &connection).unwrap();
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0].kind, OperationKind::Income);
        assert_eq!(operations[0].amount, 5500.0);
        assert_eq!(operations[0].owner, user_id);
    }

    #[tokio::test]
    async fn invalid_form_stores_nothing() {
        let (state, user_id) = get_ledger_state();
        let form = OperationForm {
            amount: "0".to_owned(),
            description: " ".to_owned(),
            ..form()
        };

        let response =
            create_operation_endpoint(State(state.clone()), Extension(user_id), Form(form)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "amount", "The amount must be greater than zero");
        assert_form_error_message(&form, "description", "Enter a description");
        let connection = state.db_connection.lock().unwrap();
        assert!(select_operations(user_id, &connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn future_date_is_rejected() {
        let (state, user_id) = get_ledger_state();
        let tomorrow = OffsetDateTime::now_utc().date() + Duration::days(1);
        let form = OperationForm {
            date: tomorrow.to_string(),
            ..form()
        };

        let response =
            create_operation_endpoint(State(state.clone()), Extension(user_id), Form(form)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        assert_form_error_message(
            &must_get_form(&html),
            "date",
            "The date cannot be in the future",
        );
        let connection = state.db_connection.lock().unwrap();
        assert!(select_operations(user_id, &connection).unwrap().is_empty());
    }
}
