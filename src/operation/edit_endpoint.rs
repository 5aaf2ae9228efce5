//! Defines the endpoint for changing an existing operation.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    Error, endpoints,
    operation::{
        core::OperationId,
        form::{FormTarget, OperationForm, operation_form},
        ledger::LedgerState,
    },
    profile::UserID,
    timezone::local_today,
};

/// A route handler for replacing the fields of an operation, redirects to the history page on success.
pub async fn edit_operation_endpoint(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
    Path(operation_id): Path<OperationId>,
    Form(form): Form<OperationForm>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let data = match form.validate(today) {
        Ok(data) => data,
        Err(errors) => {
            tracing::warn!("rejected changes to operation {operation_id}: {errors:?}");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                operation_form(FormTarget::Edit(operation_id), &form, &errors, today),
            )
                .into_response();
        }
    };

    let mut ledger = state.ledger(user_id);

    match ledger.update(operation_id, &data.into()) {
        Ok(0) => Error::UpdateMissingOperation.into_alert_response(),
        Ok(_) => (
            HxRedirect(endpoints::HISTORY_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}
