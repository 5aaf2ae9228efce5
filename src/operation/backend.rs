//! The storage contract for operations and its SQLite implementation.
//!
//! Every call is scoped by the owning profile, so one profile can never
//! read or change another profile's operations.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, params};
use time::OffsetDateTime;

use crate::{
    Error,
    operation::core::{
        OPERATION_COLUMNS, Operation, OperationData, OperationId, OperationPatch, RowsAffected,
        format_time, map_row_to_operation,
    },
    profile::UserID,
};

/// Handles the storage of operations.
pub trait OperationBackend {
    /// Get every operation owned by `owner`, newest first (date, then time of day).
    fn select(&self, owner: UserID) -> Result<Vec<Operation>, Error>;

    /// Store a new operation for `owner` and return it with its server assigned fields.
    fn insert(&self, owner: UserID, data: &OperationData) -> Result<Operation, Error>;

    /// Apply `patch` to the operation `id` if it is owned by `owner`.
    ///
    /// Returns the number of rows changed, which is zero if there is no such
    /// operation for `owner`.
    fn update(
        &self,
        owner: UserID,
        id: OperationId,
        patch: &OperationPatch,
    ) -> Result<RowsAffected, Error>;

    /// Delete the operation `id` if it is owned by `owner`.
    ///
    /// Returns the number of rows deleted, which is zero if there is no such
    /// operation for `owner`.
    fn delete(&self, owner: UserID, id: OperationId) -> Result<RowsAffected, Error>;
}

/// Stores operations in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteBackend {
    /// Create a backend that shares `connection` with the rest of the app.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl OperationBackend for SqliteBackend {
    fn select(&self, owner: UserID) -> Result<Vec<Operation>, Error> {
        select_operations(owner, &*self.lock()?)
    }

    fn insert(&self, owner: UserID, data: &OperationData) -> Result<Operation, Error> {
        insert_operation(owner, data, &*self.lock()?)
    }

    fn update(
        &self,
        owner: UserID,
        id: OperationId,
        patch: &OperationPatch,
    ) -> Result<RowsAffected, Error> {
        update_operation(owner, id, patch, &*self.lock()?)
    }

    fn delete(&self, owner: UserID, id: OperationId) -> Result<RowsAffected, Error> {
        delete_operation(owner, id, &*self.lock()?)
    }
}

/// Get every operation owned by `owner`, ordered by date then time of day, newest first.
///
/// Operations recorded at the same minute are ordered by ID, newest first.
pub fn select_operations(owner: UserID, connection: &Connection) -> Result<Vec<Operation>, Error> {
    connection
        .prepare(&format!(
            "SELECT {OPERATION_COLUMNS} FROM operation \
            WHERE owner_id = :owner_id \
            ORDER BY date DESC, time DESC, id DESC"
        ))?
        .query_map(&[(":owner_id", &owner.as_i64())], map_row_to_operation)?
        .map(|maybe_operation| maybe_operation.map_err(Error::from))
        .collect()
}

/// Get a single operation owned by `owner`.
///
/// # Errors
///
/// Returns [Error::NotFound] if `id` does not exist or belongs to another profile.
pub fn get_operation(
    owner: UserID,
    id: OperationId,
    connection: &Connection,
) -> Result<Operation, Error> {
    connection
        .query_one(
            &format!("SELECT {OPERATION_COLUMNS} FROM operation WHERE id = ?1 AND owner_id = ?2"),
            params![id, owner.as_i64()],
            map_row_to_operation,
        )
        .map_err(Error::from)
}

/// Insert a new operation for `owner`.
///
/// # Errors
///
/// Returns [Error::InvalidOperation] if the amount is not positive.
pub fn insert_operation(
    owner: UserID,
    data: &OperationData,
    connection: &Connection,
) -> Result<Operation, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO operation \
            (owner_id, kind, amount, description, account, date, time, created_at, updated_at) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![
            owner.as_i64(),
            data.kind,
            data.amount,
            data.description,
            data.account,
            data.date,
            format_time(data.time),
            now,
        ],
    )?;

    let id = connection.last_insert_rowid();

    get_operation(owner, id, connection)
}

/// Apply `patch` to the operation `id` owned by `owner` and bump its update time.
///
/// The owner of an operation is never changed.
pub fn update_operation(
    owner: UserID,
    id: OperationId,
    patch: &OperationPatch,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE operation \
            SET \
                kind = COALESCE(?1, kind), \
                amount = COALESCE(?2, amount), \
                description = COALESCE(?3, description), \
                account = COALESCE(?4, account), \
                date = COALESCE(?5, date), \
                time = COALESCE(?6, time), \
                updated_at = ?7 \
            WHERE id = ?8 AND owner_id = ?9",
            params![
                patch.kind,
                patch.amount,
                patch.description,
                patch.account,
                patch.date,
                patch.time.map(format_time),
                OffsetDateTime::now_utc(),
                id,
                owner.as_i64(),
            ],
        )
        .map_err(Error::from)
}

/// Delete the operation `id` owned by `owner`.
pub fn delete_operation(
    owner: UserID,
    id: OperationId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM operation WHERE id = ?1 AND owner_id = ?2",
            params![id, owner.as_i64()],
        )
        .map_err(Error::from)
}
