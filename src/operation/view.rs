//! Renders lists of operations.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{edit_delete_action_links, format_currency},
    operation::core::{Operation, OperationKind, format_time},
};

const LIST_STYLE: &str = "w-full divide-y divide-gray-200 dark:divide-gray-700 \
    bg-white dark:bg-gray-800 rounded-lg shadow-md";

const LIST_ITEM_STYLE: &str = "flex items-center justify-between gap-4 px-4 py-3";

const KIND_BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold rounded-full";

fn kind_badge_class(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Income => "text-green-800 bg-green-100 dark:bg-green-900 dark:text-green-300",
        OperationKind::Expense => "text-red-800 bg-red-100 dark:bg-red-900 dark:text-red-300",
        OperationKind::Sale => {
            "text-amber-800 bg-amber-100 dark:bg-amber-900 dark:text-amber-300"
        }
    }
}

fn amount_class(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Income => "text-green-700 dark:text-green-300",
        OperationKind::Expense | OperationKind::Sale => "text-red-700 dark:text-red-300",
    }
}

/// Render `operations` as a list with edit and delete actions, or `empty_message` if there are none.
pub fn operation_list(operations: &[Operation], empty_message: &str) -> Markup {
    html! {
        @if operations.is_empty() {
            p
                id="operation-list-empty"
                class="w-full px-4 py-6 text-center text-gray-600 dark:text-gray-400"
            {
                (empty_message)
            }
        } @else {
            ul id="operation-list" class=(LIST_STYLE)
            {
                @for operation in operations {
                    (operation_list_item(operation))
                }
            }
        }
    }
}

fn operation_list_item(operation: &Operation) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_OPERATION_VIEW, operation.id);
    let delete_url = format_endpoint(endpoints::OPERATION, operation.id);
    let confirm_message = format!(
        "Are you sure you want to delete the operation '{}'? This cannot be undone.",
        operation.description
    );

    html! {
        li class=(LIST_ITEM_STYLE) data-operation-id=(operation.id)
        {
            div class="min-w-0 flex-1"
            {
                div class="flex items-center gap-2"
                {
                    span class={ (KIND_BADGE_STYLE) " " (kind_badge_class(operation.kind)) }
                    {
                        (operation.kind.label())
                    }
                    span class="truncate font-medium" title=(operation.description)
                    {
                        (operation.description)
                    }
                }

                div class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                {
                    (operation.account) " · "
                    time datetime=(operation.date) { (operation.date) } " "
                    (format_time(operation.time))
                }
            }

            div class="flex flex-col items-end gap-1"
            {
                span class={ "tabular-nums whitespace-nowrap " (amount_class(operation.kind)) }
                {
                    (format_currency(operation.signed_amount()))
                }

                div class="flex gap-4 text-sm"
                {
                    (edit_delete_action_links(&edit_url, &delete_url, &confirm_message, "closest li"))
                }
            }
        }
    }
}
