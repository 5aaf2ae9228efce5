//! The operation model: one income, expense or sale event owned by a profile.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef},
};
use serde::{Deserialize, Serialize, Serializer};
use time::{
    Date, OffsetDateTime, Time, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::profile::UserID;

/// The database ID of an operation.
pub type OperationId = i64;

/// The number of rows changed by an update or delete.
pub type RowsAffected = usize;

/// The bank or account labels an operation can be booked against.
pub const ACCOUNT_LABELS: [&str; 11] = [
    "Banco do Brasil",
    "Itaú",
    "Nubank",
    "Caixa",
    "Bradesco",
    "C6 Bank",
    "Inter",
    "Santander",
    "Original",
    "PicPay",
    "Other",
];

/// Time of day format used for storage and display, e.g. "09:30".
pub const TIME_FORMAT: &[BorrowedFormatItem] = format_description!("[hour]:[minute]");

/// What kind of money movement an operation records.
///
/// A sale is money leaving the books like an expense, but it is totalled
/// separately so it can be reported on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
    /// Money going out that is reported as a sale.
    Sale,
}

impl OperationKind {
    /// All kinds, in the order they are offered to the user.
    pub const ALL: [OperationKind; 3] = [
        OperationKind::Income,
        OperationKind::Expense,
        OperationKind::Sale,
    ];

    /// The string stored in the database and used in forms.
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Income => "income",
            OperationKind::Expense => "expense",
            OperationKind::Sale => "sale",
        }
    }

    /// A human readable label.
    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Income => "Income",
            OperationKind::Expense => "Expense",
            OperationKind::Sale => "Sale",
        }
    }

    /// +1 for money coming in and -1 for money going out.
    pub fn sign(self) -> f64 {
        match self {
            OperationKind::Income => 1.0,
            OperationKind::Expense | OperationKind::Sale => -1.0,
        }
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error returned when a string is not one of the operation kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a valid operation kind")]
pub struct InvalidOperationKind(pub String);

impl FromStr for OperationKind {
    type Err = InvalidOperationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(OperationKind::Income),
            "expense" => Ok(OperationKind::Expense),
            "sale" => Ok(OperationKind::Sale),
            other => Err(InvalidOperationKind(other.to_owned())),
        }
    }
}

impl ToSql for OperationKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for OperationKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// A recorded income, expense or sale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    /// The ID assigned by the database.
    pub id: OperationId,
    /// The profile that owns the operation.
    pub owner: UserID,
    /// Whether the money came in, went out, or went out as a sale.
    pub kind: OperationKind,
    /// The amount of money, always positive.
    pub amount: f64,
    /// Free text describing the operation.
    pub description: String,
    /// The bank or account label, see [ACCOUNT_LABELS].
    pub account: String,
    /// The calendar date the operation happened on.
    #[serde(serialize_with = "serialize_display")]
    pub date: Date,
    /// The time of day, to the minute.
    #[serde(serialize_with = "serialize_time")]
    pub time: Time,
    /// When the operation was first stored.
    #[serde(skip)]
    pub created_at: OffsetDateTime,
    /// When the operation was last changed.
    #[serde(skip)]
    pub updated_at: OffsetDateTime,
}

impl Operation {
    /// The amount with a sign: positive for income, negative for expenses and sales.
    pub fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }
}

/// The fields of an operation that the user provides.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationData {
    /// Whether the money came in, went out, or went out as a sale.
    pub kind: OperationKind,
    /// The amount of money, must be positive.
    pub amount: f64,
    /// Free text describing the operation.
    pub description: String,
    /// The bank or account label.
    pub account: String,
    /// The calendar date the operation happened on.
    pub date: Date,
    /// The time of day, to the minute.
    pub time: Time,
}

/// A partial update to an operation. Fields set to `None` are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationPatch {
    /// The new kind.
    pub kind: Option<OperationKind>,
    /// The new amount, must be positive.
    pub amount: Option<f64>,
    /// The new description.
    pub description: Option<String>,
    /// The new account label.
    pub account: Option<String>,
    /// The new date.
    pub date: Option<Date>,
    /// The new time of day.
    pub time: Option<Time>,
}

impl From<OperationData> for OperationPatch {
    fn from(data: OperationData) -> Self {
        Self {
            kind: Some(data.kind),
            amount: Some(data.amount),
            description: Some(data.description),
            account: Some(data.account),
            date: Some(data.date),
            time: Some(data.time),
        }
    }
}

/// Format a time of day as "HH:MM".
pub fn format_time(time: Time) -> String {
    time.format(TIME_FORMAT)
        .unwrap_or_else(|_| format!("{:02}:{:02}", time.hour(), time.minute()))
}

/// Parse a time of day from "HH:MM".
pub fn parse_time(text: &str) -> Result<Time, time::error::Parse> {
    Time::parse(text.trim(), TIME_FORMAT)
}

fn serialize_display<T: Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn serialize_time<S: Serializer>(time: &Time, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_time(*time))
}

/// Create the operation table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_operation_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS operation (
                id INTEGER PRIMARY KEY,
                owner_id INTEGER NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense', 'sale')),
                amount REAL NOT NULL CHECK (amount > 0),
                description TEXT NOT NULL,
                account TEXT NOT NULL,
                date TEXT NOT NULL,
                time TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(owner_id) REFERENCES profile(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Covers the owner filter and the newest-first ordering used by every fetch.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_operation_owner_date
            ON operation(owner_id, date DESC, time DESC)",
        (),
    )?;

    Ok(())
}

/// The columns selected by [map_row_to_operation], in order.
pub const OPERATION_COLUMNS: &str =
    "id, owner_id, kind, amount, description, account, date, time, created_at, updated_at";

/// Build an [Operation] from a row selected with [OPERATION_COLUMNS].
///
/// # Errors
///
/// Returns an error if a column is missing or the time of day is not "HH:MM".
pub fn map_row_to_operation(row: &Row) -> Result<Operation, rusqlite::Error> {
    let time_text: String = row.get(7)?;
    let time = parse_time(&time_text).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(error))
    })?;

    Ok(Operation {
        id: row.get(0)?,
        owner: UserID::new(row.get(1)?),
        kind: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        account: row.get(5)?,
        date: row.get(6)?,
        time,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
