//! Econo is a web app for tracking personal income and expenses.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod balance;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod export;
mod feedback;
mod filters;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod password;
mod preferences;
mod profile;
mod receipt_scanner;
mod routing;
mod timezone;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use feedback::{
    Feedback, FeedbackKind, FeedbackStatus, NewFeedback, create_feedback, list_feedback,
    set_feedback_status,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::{PasswordHash, ValidatedPassword};
pub use receipt_scanner::{
    GeminiReceiptScanner, ReceiptScanner, ScannedItem, ScannedReceipt, UnavailableReceiptScanner,
};
pub use routing::build_router;
pub use timezone::{DEFAULT_TIMEZONE, get_local_offset};
pub use transaction::{
    NewTransaction, PaymentType, TransactionItem, TransactionType, create_transaction,
};
pub use user::{
    Gender, NewUser, ProfileSetup, User, UserID, complete_profile, count_users, create_user,
    get_user_by_email, update_password,
};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundPage};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The e-mail and password combination did not match a registered user.
    #[error("invalid e-mail or password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The auth token cookie could not be parsed or the new expiry could not
    /// be computed.
    #[error("invalid auth token: {0}")]
    InvalidToken(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string is not a valid e-mail address.
    #[error("\"{0}\" is not a valid e-mail address")]
    InvalidEmail(String),

    /// Another user already registered with the e-mail address.
    #[error("the e-mail address is already in use")]
    DuplicateEmail,

    /// A form field held a value that could not be used.
    ///
    /// The string names the offending field and why it was rejected.
    #[error("invalid form: {0}")]
    InvalidForm(String),

    /// The multipart form could not be parsed.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The feedback message was empty or only whitespace.
    #[error("feedback message cannot be empty")]
    EmptyFeedback,

    /// The receipt could not be read by the AI service.
    #[error("receipt scan failed: {0}")]
    ReceiptScanFailed(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The CSV export could not be written.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to update feedback that does not exist
    #[error("tried to update feedback that is not in the database")]
    UpdateMissingFeedback,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundPage.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Fuso horário inválido",
                fix: &format!(
                    "Não foi possível usar o fuso horário \"{timezone}\". Verifique as \
                    configurações do servidor."
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Fuso horário inválido".to_owned(),
                    details: format!(
                        "Não foi possível usar o fuso horário \"{timezone}\". Verifique as \
                        configurações do servidor."
                    ),
                },
            ),
            Error::InvalidForm(reason) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Erro ao processar.".to_owned(),
                    details: reason,
                },
            ),
            Error::MultipartError(_) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Erro ao processar.".to_owned(),
                },
            ),
            Error::EmptyFeedback => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Escreva uma mensagem antes de enviar.".to_owned(),
                },
            ),
            Error::ReceiptScanFailed(_) => (
                StatusCode::BAD_GATEWAY,
                Alert::ErrorSimple {
                    message: "Erro na IA.".to_owned(),
                },
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Erro ao processar.".to_owned(),
                    details: "A transação não foi encontrada.".to_owned(),
                },
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Erro ao excluir transação.".to_owned(),
                    details: "A transação não foi encontrada. Atualize a página para ver se \
                        ela já foi excluída."
                        .to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Ocorreu um erro ao processar sua solicitação.".to_owned(),
                        details: "Tente novamente mais tarde.".to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
