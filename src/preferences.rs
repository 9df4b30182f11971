//! Per-user display preferences: the colour theme and the base font size.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRefresh;
use rusqlite::{Connection, OptionalExtension};
use serde::Deserialize;

use crate::{AppState, Error, user::UserID};

/// The colour theme of the pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The class to put on the `<html>` element for tailwind's dark mode.
    pub fn css_class(&self) -> &'static str {
        match self {
            Theme::Light => "",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::InvalidForm(format!("tema desconhecido \"{other}\""))),
        }
    }
}

/// The base font size of the pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl FontSize {
    pub const ALL: [FontSize; 3] = [FontSize::Sm, FontSize::Md, FontSize::Lg];

    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Sm => "sm",
            FontSize::Md => "md",
            FontSize::Lg => "lg",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            FontSize::Sm => "font-size-sm",
            FontSize::Md => "font-size-md",
            FontSize::Lg => "font-size-lg",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FontSize::Sm => "A-",
            FontSize::Md => "A",
            FontSize::Lg => "A+",
        }
    }
}

impl FromStr for FontSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sm" => Ok(FontSize::Sm),
            "md" => Ok(FontSize::Md),
            "lg" => Ok(FontSize::Lg),
            other => Err(Error::InvalidForm(format!(
                "tamanho de fonte desconhecido \"{other}\""
            ))),
        }
    }
}

/// How a user wants the pages to look.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub font_size: FontSize,
}

pub fn create_preferences_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user_preferences (
            user_id INTEGER PRIMARY KEY,
            theme TEXT NOT NULL,
            font_size TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

/// Get the preferences for `user_id`, or the defaults if none were saved.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails, or [Error::InvalidForm] if
/// the stored values are not recognised.
pub fn get_preferences(user_id: UserID, connection: &Connection) -> Result<Preferences, Error> {
    let row: Option<(String, String)> = connection
        .prepare("SELECT theme, font_size FROM user_preferences WHERE user_id = :user_id")?
        .query_row(&[(":user_id", &user_id.as_i64())], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .optional()?;

    match row {
        Some((theme, font_size)) => Ok(Preferences {
            theme: theme.parse()?,
            font_size: font_size.parse()?,
        }),
        None => Ok(Preferences::default()),
    }
}

/// Insert or replace the preferences for `user_id`.
pub fn save_preferences(
    user_id: UserID,
    preferences: Preferences,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO user_preferences (user_id, theme, font_size) VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id) DO UPDATE SET theme = excluded.theme, font_size = excluded.font_size",
        (
            user_id.as_i64(),
            preferences.theme.as_str(),
            preferences.font_size.as_str(),
        ),
    )?;

    Ok(())
}

/// The state needed to read and save preferences.
#[derive(Debug, Clone)]
pub struct PreferencesState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PreferencesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Switch between the light and dark theme and refresh the page.
pub async fn toggle_theme_endpoint(
    State(state): State<PreferencesState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    update_preferences(&state, user_id, |preferences| Preferences {
        theme: preferences.theme.toggled(),
        ..preferences
    })
}

#[derive(Debug, Deserialize)]
pub struct FontSizeForm {
    pub font_size: FontSize,
}

/// Set the base font size and refresh the page.
pub async fn set_font_size_endpoint(
    State(state): State<PreferencesState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<FontSizeForm>,
) -> Response {
    update_preferences(&state, user_id, |preferences| Preferences {
        font_size: form.font_size,
        ..preferences
    })
}

fn update_preferences(
    state: &PreferencesState,
    user_id: UserID,
    update: impl FnOnce(Preferences) -> Preferences,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let preferences = match get_preferences(user_id, &connection) {
        Ok(preferences) => preferences,
        Err(error) => {
            tracing::error!("could not get preferences for user {user_id}: {error}");
            return error.into_alert_response();
        }
    };

    match save_preferences(user_id, update(preferences), &connection) {
        Ok(()) => (HxRefresh(true), StatusCode::OK).into_response(),
        Err(error) => {
            tracing::error!("could not save preferences for user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}
