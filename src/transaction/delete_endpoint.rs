use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    Error,
    alert::{Alert, Notice},
    database_id::TransactionId,
    endpoints,
    transaction::{core::delete_transaction, create_endpoint::TransactionState},
    user::UserID,
};

/// A route handler for deleting a transaction.
///
/// On success the dashboard is reloaded so the balance cards and the list
/// both reflect the deletion.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, user_id, &connection) {
        Ok(()) => (
            HxRedirect(Notice::TransacaoExcluida.append_to(endpoints::DASHBOARD_VIEW)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::DeleteMissingTransaction) => {
            tracing::warn!("User {user_id} tried to delete missing transaction {transaction_id}");
            Error::DeleteMissingTransaction.into_alert_response()
        }
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Erro ao excluir transação.".to_owned(),
                    details: "Tente novamente mais tarde.".to_owned(),
                }
                .into_html(),
            )
                .into_response()
        }
    }
}
