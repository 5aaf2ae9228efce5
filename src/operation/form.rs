//! The operation form shared by the register and edit pages, and its validation.

use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, Time};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    finance::DATE_FORMAT,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
    operation::core::{
        ACCOUNT_LABELS, Operation, OperationData, OperationId, OperationKind, format_time,
        parse_time,
    },
};

/// The longest description allowed, counted in user-perceived characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

/// The raw values submitted by the operation form.
///
/// Every field is kept as text so that the form can be shown again with the
/// user's input and a message next to each field that needs fixing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OperationForm {
    /// "income", "expense" or "sale".
    pub kind: String,
    /// The amount in dollars.
    pub amount: String,
    /// What the operation was for.
    pub description: String,
    /// One of [ACCOUNT_LABELS].
    pub account: String,
    /// The date formatted as "YYYY-MM-DD".
    pub date: String,
    /// The time of day formatted as "HH:MM".
    pub time: String,
}

/// A message for each form field that failed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    /// Problem with the kind.
    pub kind: Option<&'static str>,
    /// Problem with the amount.
    pub amount: Option<&'static str>,
    /// Problem with the description.
    pub description: Option<&'static str>,
    /// Problem with the account.
    pub account: Option<&'static str>,
    /// Problem with the date.
    pub date: Option<&'static str>,
    /// Problem with the time.
    pub time: Option<&'static str>,
}

impl OperationForm {
    /// The starting values for a new operation: an expense dated now.
    pub fn new_defaults(today: Date, now: Time) -> Self {
        Self {
            kind: OperationKind::Expense.as_str().to_owned(),
            date: today.to_string(),
            time: format_time(now),
            ..Default::default()
        }
    }

    /// Check every field and convert the form into operation data.
    ///
    /// `today` is the current date in the local timezone.
    ///
    /// # Errors
    ///
    /// Returns a message for every field that is missing or invalid.
    pub fn validate(&self, today: Date) -> Result<OperationData, FormErrors> {
        let kind = self
            .kind
            .trim()
            .parse::<OperationKind>()
            .map_err(|_| "Choose the kind of operation");

        let amount = match self.amount.trim() {
            "" => Err("Enter an amount"),
            text => match text.parse::<f64>() {
                Ok(amount) if !amount.is_finite() || amount <= 0.0 => {
                    Err("The amount must be greater than zero")
                }
                Ok(amount) if !is_whole_cents(amount) => {
                    Err("The amount can have at most two decimal places")
                }
                Ok(amount) => Ok(amount),
                Err(_) => Err("The amount must be a number"),
            },
        };

        let description = self.description.trim();
        let description = if description.is_empty() {
            Err("Enter a description")
        } else if description.graphemes(true).count() > MAX_DESCRIPTION_LENGTH {
            Err("The description must be at most 100 characters")
        } else {
            Ok(description.to_owned())
        };

        let account = match self.account.trim() {
            "" => Err("Select an account"),
            account if ACCOUNT_LABELS.contains(&account) => Ok(account.to_owned()),
            _ => Err("Select one of the listed accounts"),
        };

        let date = match self.date.trim() {
            "" => Err("Enter a date"),
            text => match Date::parse(text, DATE_FORMAT) {
                Ok(date) if date > today => Err("The date cannot be in the future"),
                Ok(date) => Ok(date),
                Err(_) => Err("Enter a valid date"),
            },
        };

        let time = match self.time.trim() {
            "" => Err("Enter a time"),
            text => parse_time(text).map_err(|_| "Enter a valid time"),
        };

        match (kind, amount, description, account, date, time) {
            (Ok(kind), Ok(amount), Ok(description), Ok(account), Ok(date), Ok(time)) => {
                Ok(OperationData {
                    kind,
                    amount,
                    description,
                    account,
                    date,
                    time,
                })
            }
            (kind, amount, description, account, date, time) => Err(FormErrors {
                kind: kind.err(),
                amount: amount.err(),
                description: description.err(),
                account: account.err(),
                date: date.err(),
                time: time.err(),
            }),
        }
    }
}

/// Whether `amount` is a whole number of cents, allowing for float rounding.
fn is_whole_cents(amount: f64) -> bool {
    let cents = amount * 100.0;

    (cents - cents.round()).abs() < 1e-6
}

impl From<&Operation> for OperationForm {
    fn from(operation: &Operation) -> Self {
        Self {
            kind: operation.kind.as_str().to_owned(),
            amount: format!("{:.2}", operation.amount),
            description: operation.description.clone(),
            account: operation.account.clone(),
            date: operation.date.to_string(),
            time: format_time(operation.time),
        }
    }
}

/// Where the operation form is submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    /// POST a new operation.
    Create,
    /// PUT changes to an existing operation.
    Edit(OperationId),
}

/// Render the operation form with `values` and any validation `errors`.
///
/// A failed submission that returns 422 replaces the form in place, other
/// errors are shown as an alert.
pub fn operation_form(
    target: FormTarget,
    values: &OperationForm,
    errors: &FormErrors,
    max_date: Date,
) -> Markup {
    let spinner = loading_spinner();
    let (hx_post, hx_put, submit_text) = match target {
        FormTarget::Create => (
            Some(endpoints::OPERATIONS_API.to_owned()),
            None,
            "Save operation",
        ),
        FormTarget::Edit(id) => (
            None,
            Some(format_endpoint(endpoints::OPERATION, id)),
            "Save changes",
        ),
    };

    html! {
        form
            id="operation-form"
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target-422="#operation-form"
            hx-target-error="#alert-container"
            hx-swap="outerHTML"
            class="w-full space-y-4 md:space-y-6"
        {
            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Kind" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for kind in OperationKind::ALL {
                        div class="flex items-center gap-3"
                        {
                            input
                                name="kind"
                                id={ "operation-kind-" (kind) }
                                type="radio"
                                value=(kind)
                                checked[values.kind == kind.as_str()]
                                required
                                tabindex="0"
                                class=(FORM_RADIO_INPUT_STYLE);

                            label
                                for={ "operation-kind-" (kind) }
                                class=(FORM_RADIO_LABEL_STYLE)
                            {
                                (kind.label())
                            }
                        }
                    }
                }

                (field_error(errors.kind))
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                // w-full needed to ensure input takes the full width when prefilled with a value
                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        value=(values.amount)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (field_error(errors.amount))
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="Description"
                    maxlength=(MAX_DESCRIPTION_LENGTH)
                    value=(values.description)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error(errors.description))
            }

            div
            {
                label for="account" class=(FORM_LABEL_STYLE) { "Account" }

                select
                    name="account"
                    id="account"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Select an account" }

                    @for account in ACCOUNT_LABELS {
                        option value=(account) selected[values.account == account] { (account) }
                    }
                }

                (field_error(errors.account))
            }

            div class="grid grid-cols-2 gap-4"
            {
                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        name="date"
                        id="date"
                        type="date"
                        max=(max_date)
                        value=(values.date)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);

                    (field_error(errors.date))
                }

                div
                {
                    label for="time" class=(FORM_LABEL_STYLE) { "Time" }

                    input
                        name="time"
                        id="time"
                        type="time"
                        value=(values.time)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);

                    (field_error(errors.time))
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (spinner) }
                " " (submit_text)
            }
        }
    }
}

fn field_error(error: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = error {
            p class=(FORM_ERROR_STYLE) { (message) }
        }
    }
}
