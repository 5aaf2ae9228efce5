//! Defines the route handler for the page for editing an existing operation.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    operation::{
        core::OperationId,
        form::{FormErrors, FormTarget, OperationForm, operation_form},
        ledger::LedgerState,
    },
    profile::UserID,
    timezone::local_today,
};

fn edit_operation_view(id: OperationId, values: &OperationForm, max_date: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_OPERATION_VIEW).into_html();
    let form = operation_form(
        FormTarget::Edit(id),
        values,
        &FormErrors::default(),
        max_date,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="w-full text-xl font-bold mb-4" { "Edit Operation" }

            (form)
        }
    };

    base("Edit Operation", &[dollar_input_styles()], &content)
}

/// Renders the page for editing the operation `operation_id`, prefilled with its current values.
///
/// Responds with the 404 page when the active profile has no such operation.
pub async fn get_edit_operation_page(
    State(state): State<LedgerState>,
    Extension(user_id): Extension<UserID>,
    Path(operation_id): Path<OperationId>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let mut ledger = state.ledger(user_id);

    let operation = ledger
        .fetch_all()?
        .iter()
        .find(|operation| operation.id == operation_id)
        .ok_or(Error::NotFound)?;

    let values = OperationForm::from(operation);

    Ok(edit_operation_view(operation_id, &values, today).into_response())
}
