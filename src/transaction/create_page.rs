//! Defines the route handler for the page for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    preferences::get_preferences,
    timezone::get_local_offset,
    transaction::{
        core::{TransactionType, get_description_suggestions},
        form::TransactionForm,
        view::{FormAction, transaction_form_page},
    },
    user::UserID,
};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
    /// The database connection for the description suggestions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the form for a new transaction, filled with today's date and the
/// current local time.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;
    let now = OffsetDateTime::now_utc().to_offset(local_timezone);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let suggestions = get_description_suggestions(user_id, TransactionType::Expense, &connection)
        .inspect_err(|error| {
            tracing::error!("Failed to retrieve description suggestions: {error}")
        })?;
    let preferences = get_preferences(user_id, &connection)?;

    Ok(transaction_form_page(
        &TransactionForm::new_default(now),
        &suggestions,
        FormAction::Create,
        preferences,
        None,
    )
    .into_response())
}
