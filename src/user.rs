//! Code for creating the user table and reading and updating user profiles.

use std::{fmt::Display, str::FromStr};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors.
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

/// The gender a user chose on their profile.
///
/// Stored and displayed with its pt-BR label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "Masculino")]
    Masculino,
    #[serde(rename = "Feminino")]
    Feminino,
    #[serde(rename = "Outro")]
    Outro,
    #[default]
    #[serde(rename = "Prefiro não dizer")]
    PrefiroNaoDizer,
}

impl Gender {
    /// All genders in the order they are listed in forms.
    pub const ALL: [Gender; 4] = [
        Gender::Masculino,
        Gender::Feminino,
        Gender::Outro,
        Gender::PrefiroNaoDizer,
    ];

    /// The pt-BR label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Masculino => "Masculino",
            Gender::Feminino => "Feminino",
            Gender::Outro => "Outro",
            Gender::PrefiroNaoDizer => "Prefiro não dizer",
        }
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|gender| gender.as_str() == s)
            .ok_or_else(|| Error::InvalidForm(format!("gênero desconhecido \"{s}\"")))
    }
}

/// The data needed to register a new user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The address the user logs in with.
    pub email: EmailAddress,
    /// The name shown in the app.
    pub display_name: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// A user of the application and their profile.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The address the user logs in with.
    pub email: EmailAddress,
    /// The name shown in the app.
    pub display_name: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// A link to the user's photo.
    pub photo_url: Option<String>,
    /// The user's age in years.
    pub age: Option<u8>,
    /// The user's birth date.
    pub birth_date: Option<Date>,
    /// The user's gender.
    pub gender: Gender,
    /// A short text about the user.
    pub bio: Option<String>,
    /// When the user registered.
    pub created_at: OffsetDateTime,
    /// Whether the user has been through the profile setup page.
    pub profile_completed: bool,
}

/// The fields asked for on the profile setup page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSetup {
    pub age: Option<u8>,
    pub birth_date: Option<Date>,
    pub photo_url: Option<String>,
}

/// The fields that can be changed on the profile tab.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub display_name: String,
    pub birth_date: Option<Date>,
    pub gender: Gender,
    pub photo_url: Option<String>,
    pub bio: Option<String>,
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
                email TEXT UNIQUE NOT NULL,
                display_name TEXT NOT NULL,
                password TEXT NOT NULL,
                photo_url TEXT,
                age INTEGER,
                birth_date TEXT,
                gender TEXT NOT NULL,
                bio TEXT,
                created_at TEXT NOT NULL,
                profile_completed INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    Ok(())
}

const USER_COLUMNS: &str = "id, email, display_name, password, photo_url, age, birth_date, \
    gender, bio, created_at, profile_completed";

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_email: String = row.get(1)?;
    let raw_password_hash: String = row.get(3)?;
    let raw_gender: String = row.get(7)?;
    let gender = Gender::from_str(&raw_gender).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(error))
    })?;

    Ok(User {
        id: UserID::new(row.get(0)?),
        email: EmailAddress::new_unchecked(raw_email),
        display_name: row.get(2)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        photo_url: row.get(4)?,
        age: row.get(5)?,
        birth_date: row.get(6)?,
        gender,
        bio: row.get(8)?,
        created_at: row.get(9)?,
        profile_completed: row.get(10)?,
    })
}

/// Create and insert a new user into the database.
///
/// The new user has not completed their profile yet.
///
/// # Errors
///
/// Returns [Error::DuplicateEmail] if the e-mail is already registered, or a
/// [Error::SqlError] if another SQL related error occurred.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    let user = connection
        .prepare(&format!(
            "INSERT INTO user (email, display_name, password, gender, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {USER_COLUMNS}"
        ))?
        .query_row(
            (
                new_user.email.as_str(),
                new_user.display_name.trim(),
                new_user.password_hash.as_ref(),
                Gender::default().as_str(),
                OffsetDateTime::now_utc(),
            ),
            map_user_row,
        )?;

    Ok(user)
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user registered with `email`.
///
/// The comparison ignores case.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user registered with `email`.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!(
            "SELECT {USER_COLUMNS} FROM user WHERE email = :email COLLATE NOCASE"
        ))?
        .query_row(&[(":email", &email.trim())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the number of users in the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn count_users(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM user;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Save the profile setup fields and mark the profile as completed.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn complete_profile(
    user_id: UserID,
    setup: ProfileSetup,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .prepare(&format!(
            "UPDATE user SET age = ?1, birth_date = ?2, photo_url = ?3, profile_completed = 1
             WHERE id = ?4
             RETURNING {USER_COLUMNS}"
        ))?
        .query_row(
            (setup.age, setup.birth_date, setup.photo_url, user_id.as_i64()),
            map_user_row,
        )
        .map_err(|error| error.into())
}

/// Update the fields shown on the profile tab.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn update_profile(
    user_id: UserID,
    update: ProfileUpdate,
    connection: &Connection,
) -> Result<User, Error> {
    connection
        .prepare(&format!(
            "UPDATE user SET display_name = ?1, birth_date = ?2, gender = ?3, photo_url = ?4,
                bio = ?5
             WHERE id = ?6
             RETURNING {USER_COLUMNS}"
        ))?
        .query_row(
            (
                update.display_name.trim(),
                update.birth_date,
                update.gender.as_str(),
                update.photo_url,
                update.bio,
                user_id.as_i64(),
            ),
            map_user_row,
        )
        .map_err(|error| error.into())
}

/// Replace the password hash of the user.
///
/// # Errors
///
/// Returns [Error::NotFound] if `user_id` does not belong to a registered user.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}
