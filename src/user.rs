//! Code for creating the user table and fetching users from the database.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
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

/// The kind of account a user logs in with.
///
/// Only employees send bills. Admins can see the bills of every employee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum UserType {
    /// An employee that sends bills.
    Employee,
    /// An administrator that reviews bills.
    Admin,
}

impl UserType {
    /// The name of the user type as stored in the database and the session.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Employee => "Employee",
            UserType::Admin => "Admin",
        }
    }
}

impl Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Employee" => Ok(UserType::Employee),
            "Admin" => Ok(UserType::Admin),
            other => Err(format!("unknown user type \"{other}\"")),
        }
    }
}

impl ToSql for UserType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for UserType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// A user of the application.
///
/// The caller should ensure that `id` and `email` are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The email address the user logs in with.
    pub email: String,
    /// Whether the user is an employee or an admin.
    pub user_type: UserType,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                type TEXT NOT NULL,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateEmail] if `email` is already registered,
/// - [Error::SqlError] if another SQL related error occurred.
pub fn create_user(
    email: &str,
    user_type: UserType,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (email, type, password) VALUES (?1, ?2, ?3)",
        (email, user_type, password_hash.as_ref()),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        email: email.to_owned(),
        user_type,
        password_hash,
    })
}

/// Get the user from the database registered with `email`.
///
/// # Errors
///
/// This function will return an error if:
/// - `email` does not belong to a registered user ([Error::NotFound]).
/// - there was an error trying to access the store.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, email, type, password FROM user WHERE email = :email")?
        .query_row(&[(":email", email)], map_user_row)
        .map_err(|error| error.into())
}

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        email: row.get(1)?,
        user_type: row.get(2)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}
