//! Defines the endpoint for deleting an operation.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    alert::Alert,
    operation::{core::OperationId, ledger::LedgerState},
    profile::UserID,
};

/// A route handler for deleting an operation.
///
/// On success the response is a short confirmation and a 200 status so htmx
/// removes the row that made the request.
pub async fn delete_operation_endpoint(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
    Path(operation_id): Path<OperationId>,
) -> Response {
    let mut ledger = state.ledger(user_id);

    match ledger.delete(operation_id) {
        Ok(0) => Error::DeleteMissingOperation.into_alert_response(),
        Ok(_) => Alert::SuccessSimple {
            message: "Operation deleted".to_owned(),
        }
        .into_response(),
        Err(error) => error.into_alert_response(),
    }
}
