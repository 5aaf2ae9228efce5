use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::{Date, macros::time};

use crate::{
    db::initialize,
    operation::{LedgerState, Operation, OperationData, OperationKind, insert_operation},
    profile::{UserID, create_profile},
};

/// A ledger state over an in-memory database with a single profile, using UTC as the local timezone.
pub(crate) fn get_ledger_state() -> (LedgerState, UserID) {
    let connection = Connection::open_in_memory().unwrap();
    initialize(&connection).unwrap();
    let profile = create_profile("Ana", None, &connection).unwrap();

    (
        LedgerState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        },
        profile.id,
    )
}

/// Add another profile to the database behind `state`.
pub(crate) fn add_profile(state: &LedgerState, name: &str) -> UserID {
    let connection = state.db_connection.lock().unwrap();
    create_profile(name, None, &connection).unwrap().id
}

/// Store an operation for `owner` at noon on `date` in the "Nubank" account.
pub(crate) fn insert_test_operation(
    state: &LedgerState,
    owner: UserID,
    kind: OperationKind,
    amount: f64,
    description: &str,
    date: Date,
) -> Operation {
    let connection = state.db_connection.lock().unwrap();
    insert_operation(
        owner,
        &OperationData {
            kind,
            amount,
            description: description.to_owned(),
            account: "Nubank".to_owned(),
            date,
            time: time!(12:00),
        },
        &connection,
    )
    .unwrap()
}
