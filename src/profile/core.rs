//! Code for creating the profile table and fetching profiles from the database.

use std::fmt::Display;

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A newtype wrapper for integer profile IDs.
///
/// Every operation is owned by exactly one profile, and every query against
/// the operation table is scoped by this ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A person whose operations are tracked separately from everyone else's.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    /// The profile's ID in the application database.
    pub id: UserID,
    /// The display name.
    pub name: String,
    /// An optional contact email.
    pub email: Option<String>,
}

/// Create the profile table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_profile_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS profile (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new profile into the database.
///
/// Leading and trailing whitespace is removed from `name` and `email`, and a
/// blank email is stored as `None`.
///
/// # Errors
///
/// Returns:
/// - [Error::EmptyProfileName] if `name` is blank.
/// - [Error::SqlError] if an SQL related error occurred.
pub fn create_profile(
    name: &str,
    email: Option<&str>,
    connection: &Connection,
) -> Result<Profile, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::EmptyProfileName);
    }

    let email = email
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_owned);

    connection.execute(
        "INSERT INTO profile (name, email) VALUES (?1, ?2)",
        params![name, email],
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(Profile {
        id,
        name: name.to_owned(),
        email,
    })
}

/// Get the profile with `id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no profile has the ID `id`.
pub fn get_profile(id: UserID, connection: &Connection) -> Result<Profile, Error> {
    connection
        .query_one(
            "SELECT id, name, email FROM profile WHERE id = ?1",
            params![id.as_i64()],
            map_row_to_profile,
        )
        .map_err(Error::from)
}

/// Get every profile ordered by name.
///
/// # Errors
///
/// Returns [Error::SqlError] if an SQL related error occurred.
pub fn get_all_profiles(connection: &Connection) -> Result<Vec<Profile>, Error> {
    connection
        .prepare("SELECT id, name, email FROM profile ORDER BY name COLLATE NOCASE ASC, id ASC")?
        .query_map([], map_row_to_profile)?
        .map(|maybe_profile| maybe_profile.map_err(Error::from))
        .collect()
}

fn map_row_to_profile(row: &Row) -> Result<Profile, rusqlite::Error> {
    Ok(Profile {
        id: UserID::new(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        profile::core::{UserID, create_profile, get_all_profiles, get_profile},
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn create_profile_trims_fields() {
        let connection = get_test_connection();

        let profile = create_profile("  Ana  ", Some("  "), &connection).unwrap();

        assert_eq!(profile.name, "Ana");
        assert_eq!(profile.email, None);
        assert_eq!(get_profile(profile.id, &connection), Ok(profile));
    }

    #[test]
    fn create_profile_rejects_blank_name() {
        let connection = get_test_connection();

        assert_eq!(
            create_profile("   ", None, &connection),
            Err(Error::EmptyProfileName)
        );
    }

    #[test]
    fn get_missing_profile_returns_not_found() {
        let connection = get_test_connection();

        assert_eq!(
            get_profile(UserID::new(42), &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn profiles_are_ordered_by_name() {
        let connection = get_test_connection();
        create_profile("carla", None, &connection).unwrap();
        create_profile("Bruno", Some("bruno@example.com"), &connection).unwrap();
        create_profile("ana", None, &connection).unwrap();

        let names: Vec<String> = get_all_profiles(&connection)
            .unwrap()
            .into_iter()
            .map(|profile| profile.name)
            .collect();

        assert_eq!(names, vec!["ana", "Bruno", "carla"]);
    }
}
