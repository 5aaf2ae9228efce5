//! Operations are the income, expenses and sales recorded against a profile.
//!
//! This module contains everything related to operations:
//! - The `Operation` model and the SQLite storage behind the `OperationBackend` trait
//! - The `Ledger` snapshot that reloads after every change
//! - The operation form, list and the route handlers that use them

mod backend;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod ledger;
mod view;

pub use backend::{OperationBackend, SqliteBackend};
pub use core::{
    ACCOUNT_LABELS, Operation, OperationData, OperationId, OperationKind, OperationPatch,
    create_operation_table,
};
pub use create_endpoint::create_operation_endpoint;
pub use create_page::get_new_operation_page;
pub use delete_endpoint::delete_operation_endpoint;
pub use edit_endpoint::edit_operation_endpoint;
pub use edit_page::get_edit_operation_page;
pub use ledger::{Ledger, LedgerState};
pub use view::operation_list;

#[cfg(test)]
pub use backend::{insert_operation, select_operations};
