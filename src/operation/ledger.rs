//! An in-memory snapshot of one profile's operations that is reloaded after every change.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use time::Month;

use crate::{
    AppState, Error,
    finance::{
        DailyBalance, DateRange, PeriodStats, compute_daily_balances, compute_stats,
        filter_by_month, filter_by_period,
    },
    operation::{
        backend::{OperationBackend, SqliteBackend},
        core::{Operation, OperationData, OperationId, OperationPatch, RowsAffected},
    },
    profile::UserID,
};

/// The state needed by route handlers that read or change operations.
#[derive(Debug, Clone)]
pub struct LedgerState {
    /// The database connection for managing operations.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for LedgerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl LedgerState {
    /// An empty ledger for `owner` backed by the app's database.
    pub fn ledger(&self, owner: UserID) -> Ledger<SqliteBackend> {
        Ledger::new(SqliteBackend::new(self.db_connection.clone()), owner)
    }
}

/// The operations of one profile, as last loaded from the backend.
///
/// Changes are never applied to the snapshot directly. Each successful
/// change is followed by a full reload, so the snapshot always mirrors
/// what the backend holds.
#[derive(Debug)]
pub struct Ledger<B> {
    backend: B,
    owner: UserID,
    operations: Vec<Operation>,
    is_loading: bool,
}

/// Sets the loading flag and clears it again when dropped, whichever way the call exits.
struct LoadingGuard<'a>(&'a mut bool);

impl<'a> LoadingGuard<'a> {
    fn new(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

impl<B: OperationBackend> Ledger<B> {
    /// Create an empty ledger for `owner`. Call [Ledger::fetch_all] to load it.
    pub fn new(backend: B, owner: UserID) -> Self {
        Self {
            backend,
            owner,
            operations: Vec::new(),
            is_loading: false,
        }
    }

    /// Replace the snapshot with every operation the owner has, newest first.
    ///
    /// # Errors
    ///
    /// Returns the backend error and keeps the previous snapshot if loading fails.
    pub fn fetch_all(&mut self) -> Result<&[Operation], Error> {
        let _loading = LoadingGuard::new(&mut self.is_loading);

        match self.backend.select(self.owner) {
            Ok(operations) => {
                tracing::debug!(
                    "loaded {} operations for profile {}",
                    operations.len(),
                    self.owner
                );
                self.operations = operations;
            }
            Err(error) => {
                tracing::error!(
                    "could not load operations for profile {}: {error}",
                    self.owner
                );
                return Err(error);
            }
        }

        Ok(&self.operations)
    }

    /// Record a new operation and reload.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the operation or the reload fails.
    pub fn add(&mut self, data: &OperationData) -> Result<Operation, Error> {
        let operation = {
            let _loading = LoadingGuard::new(&mut self.is_loading);
            self.backend
                .insert(self.owner, data)
                .inspect_err(|error| tracing::error!("could not add operation: {error}"))?
        };

        tracing::info!(
            "added {} operation {} for profile {}",
            operation.kind,
            operation.id,
            self.owner
        );
        self.fetch_all()?;

        Ok(operation)
    }

    /// Change the operation `id` and reload.
    ///
    /// Returns the number of operations changed, which is zero if the owner has no
    /// operation `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change or the reload fails.
    pub fn update(
        &mut self,
        id: OperationId,
        patch: &OperationPatch,
    ) -> Result<RowsAffected, Error> {
        let rows_affected = {
            let _loading = LoadingGuard::new(&mut self.is_loading);
            self.backend
                .update(self.owner, id, patch)
                .inspect_err(|error| tracing::error!("could not update operation {id}: {error}"))?
        };

        tracing::info!("updated {rows_affected} operation(s) with ID {id}");
        self.fetch_all()?;

        Ok(rows_affected)
    }

    /// Remove the operation `id` and reload.
    ///
    /// Returns the number of operations removed, which is zero if the owner has no
    /// operation `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the reload fails.
    pub fn delete(&mut self, id: OperationId) -> Result<RowsAffected, Error> {
        let rows_affected = {
            let _loading = LoadingGuard::new(&mut self.is_loading);
            self.backend
                .delete(self.owner, id)
                .inspect_err(|error| tracing::error!("could not delete operation {id}: {error}"))?
        };

        tracing::info!("deleted {rows_affected} operation(s) with ID {id}");
        self.fetch_all()?;

        Ok(rows_affected)
    }

    /// Whether a backend call is in progress.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The current snapshot, newest first.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The operations dated within `month` of `year`, newest first.
    pub fn operations_in_month(&self, year: i32, month: Month) -> Vec<Operation> {
        filter_by_month(&self.operations, year, month)
    }

    /// The operations dated within `range`, newest first.
    pub fn operations_in_period(&self, range: DateRange) -> Vec<Operation> {
        filter_by_period(&self.operations, range)
    }

    /// The statistics for `month` of `year`.
    pub fn monthly_stats(&self, year: i32, month: Month) -> PeriodStats {
        compute_stats(&self.operations, DateRange::month(year, month))
    }

    /// The statistics for `range`.
    pub fn period_stats(&self, range: DateRange) -> PeriodStats {
        compute_stats(&self.operations, range)
    }

    /// The running balance at the end of each day in `range`.
    pub fn daily_balances(&self, range: DateRange) -> Vec<DailyBalance> {
        compute_daily_balances(&self.operations, range)
    }
}
