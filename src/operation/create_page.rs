//! Defines the route handler for the page for registering a new operation.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    operation::{
        form::{FormErrors, FormTarget, OperationForm, operation_form},
        ledger::LedgerState,
    },
    timezone::local_now,
};

fn new_operation_view(values: &OperationForm, max_date: Date) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_OPERATION_VIEW).into_html();
    let form = operation_form(FormTarget::Create, values, &FormErrors::default(), max_date);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="w-full text-xl font-bold mb-4" { "New Operation" }

            (form)
        }
    };

    base("New Operation", &[dollar_input_styles()], &content)
}

/// Renders the page for registering an operation, prefilled with the current date and time.
pub async fn get_new_operation_page(State(state): State<LedgerState>) -> Result<Response, Error> {
    let now = local_now(&state.local_timezone)?;
    let values = OperationForm::new_defaults(now.date(), now.time());

    Ok(new_operation_view(&values, now.date()).into_response())
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use scraper::Selector;
    use time::OffsetDateTime;

    use crate::{
        ACCOUNT_LABELS, endpoints,
        operation::create_page::get_new_operation_page,
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_form_submit_button,
            assert_hx_endpoint, assert_status_ok, assert_valid_html, get_ledger_state,
            must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_page() {
        let (state, _) = get_ledger_state();

        let response = get_new_operation_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::OPERATIONS_API, "hx-post");
        assert_form_input(&form, "kind", "radio");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "description", "text");
        assert_form_input(&form, "time", "time");
        let today = OffsetDateTime::now_utc().date().to_string();
        assert_form_input_with_value(&form, "date", "date", &today);
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn account_select_lists_every_account() {
        let (state, _) = get_ledger_state();

        let response = get_new_operation_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        let options = html
            .select(&Selector::parse("select[name=account] option").unwrap())
            .count();
        // One placeholder plus one option per account.
        assert_eq!(options, ACCOUNT_LABELS.len() + 1);
    }
}
